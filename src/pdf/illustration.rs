//! The static illustration drawn in the intro block

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::error::{Error, Result};

/// A decoded image held as 8-bit RGB plus an optional alpha channel
#[derive(Debug, Clone)]
pub struct ImageAsset {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

impl ImageAsset {
    /// Load an image from disk. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::AssetNotFound(path.to_path_buf()));
        }

        let decoded = image::open(path)?;
        Ok(Self::from_rgba(decoded.to_rgba8()))
    }

    /// Build from already decoded pixels
    pub fn from_rgba(rgba: image::RgbaImage) -> Self {
        let (width, height) = rgba.dimensions();
        let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

        let rgb = rgba
            .pixels()
            .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
            .collect();
        let alpha = has_alpha.then(|| rgba.pixels().map(|p| p.0[3]).collect());

        Self {
            width,
            height,
            rgb,
            alpha,
        }
    }

    /// Pixel dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Write the image (and its soft mask, if any) as image XObjects
    pub fn embed(&self, doc: &mut Document) -> ObjectId {
        let mut dict = image_dict(self.width, self.height, b"DeviceRGB");

        if let Some(alpha) = &self.alpha {
            let mask = image_dict(self.width, self.height, b"DeviceGray");
            let mask_id = doc.add_object(Object::Stream(Stream::new(mask, alpha.clone())));
            dict.set("SMask", Object::Reference(mask_id));
        }

        doc.add_object(Object::Stream(Stream::new(dict, self.rgb.clone())))
    }
}

fn image_dict(width: u32, height: u32, color_space: &[u8]) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(i64::from(width)));
    dict.set("Height", Object::Integer(i64::from(height)));
    dict.set("ColorSpace", Object::Name(color_space.to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_asset_is_an_error() {
        let result = ImageAsset::load(Path::new("/nonexistent/illustration.png"));
        assert!(matches!(result, Err(Error::AssetNotFound(_))));
    }

    #[test]
    fn test_opaque_image_has_no_mask() {
        let rgba = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        let asset = ImageAsset::from_rgba(rgba);
        assert_eq!(asset.dimensions(), (3, 2));
        assert_eq!(asset.rgb.len(), 18);
        assert!(asset.alpha.is_none());
    }

    #[test]
    fn test_translucent_image_gets_soft_mask() {
        let mut rgba = image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 255]));
        rgba.put_pixel(1, 1, image::Rgba([0, 0, 0, 128]));
        let asset = ImageAsset::from_rgba(rgba);

        let mut doc = Document::with_version("1.5");
        let id = asset.embed(&mut doc);
        let stream = doc.get_object(id).unwrap().as_stream().unwrap();
        assert!(stream.dict.get(b"SMask").is_ok());
    }
}
