//! Process-wide render configuration, built once at startup

use std::path::PathBuf;

use crate::error::Result;
use crate::layout::{content_frame, Frame, Length, Margins, PageDimensions};
use crate::pdf::{FontSet, ImageAsset};
use crate::style::StyleSheet;

/// Where to find startup resources and how to size pages
#[derive(Debug, Clone)]
pub struct ConfigOptions {
    /// Directory searched for the DejaVu font files
    pub fonts_dir: PathBuf,
    /// Illustration shown next to the intro text
    pub image_path: PathBuf,
    pub page: PageDimensions,
    pub margins: Margins,
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            fonts_dir: PathBuf::from("fonts"),
            image_path: PathBuf::from("assets/illustration.png"),
            page: PageDimensions::a4(),
            margins: Margins::standard(),
        }
    }
}

/// Immutable configuration shared by every render
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub page: PageDimensions,
    pub margins: Margins,
    /// Content frame derived from page and margins
    pub frame: Frame,
    pub fonts: FontSet,
    pub illustration: ImageAsset,
    pub styles: StyleSheet,
}

impl RenderConfig {
    /// Resolve fonts and load the illustration
    ///
    /// Missing fonts fall back to standard PDF fonts; a missing illustration
    /// is an error.
    pub fn load(options: &ConfigOptions) -> Result<Self> {
        let fonts = FontSet::load(&options.fonts_dir);
        let illustration = ImageAsset::load(&options.image_path)?;
        Ok(Self::new(options.page, options.margins, fonts, illustration))
    }

    pub fn new(
        page: PageDimensions,
        margins: Margins,
        fonts: FontSet,
        illustration: ImageAsset,
    ) -> Self {
        Self {
            page,
            margins,
            frame: content_frame(&page, &margins),
            fonts,
            illustration,
            styles: StyleSheet::default(),
        }
    }

    /// Baseline of the page number footer, measured from the bottom edge
    pub fn footer_baseline(&self) -> f32 {
        Length::from_cm(1.0).pt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_missing_illustration_fails_load() {
        let options = ConfigOptions {
            fonts_dir: PathBuf::from("/nonexistent/fonts"),
            image_path: PathBuf::from("/nonexistent/illustration.png"),
            ..Default::default()
        };
        assert!(matches!(RenderConfig::load(&options), Err(Error::AssetNotFound(_))));
    }

    #[test]
    fn test_footer_sits_below_frame() {
        let rgba = image::RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 255]));
        let config = RenderConfig::new(
            PageDimensions::a4(),
            Margins::standard(),
            FontSet::builtin(),
            ImageAsset::from_rgba(rgba),
        );
        assert!(config.footer_baseline() < config.frame.y);
    }
}
