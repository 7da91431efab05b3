//! Text styles used by the document template

/// RGB color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const DARK_GRAY: Color = Color::rgb(0.3, 0.3, 0.3);
    pub const GRAY: Color = Color::rgb(0.5, 0.5, 0.5);
    pub const LIGHT_GRAY: Color = Color::rgb(0.83, 0.83, 0.83);
    pub const SLATE_BLUE: Color = Color::rgb(0.2, 0.2, 0.6);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Logical font roles. The core never names a concrete font file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontRole {
    Body,
    Heading,
    Mono,
    MonoBold,
}

/// Horizontal alignment of paragraph lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
}

/// Named styles a paragraph block can refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKind {
    Normal,
    Heading,
    Mono,
    MonoHeader,
}

/// Paragraph style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphStyle {
    pub font: FontRole,
    /// Font size in points
    pub font_size: f32,
    /// Distance between baselines in points
    pub leading: f32,
    pub color: Color,
    pub alignment: Alignment,
    /// Extra space below the paragraph in points
    pub space_after: f32,
}

/// The complete set of styles for one document template
#[derive(Debug, Clone)]
pub struct StyleSheet {
    pub normal: ParagraphStyle,
    pub heading: ParagraphStyle,
    pub mono: ParagraphStyle,
    pub mono_header: ParagraphStyle,
    /// Page number footer
    pub footer: ParagraphStyle,
    /// Thin separator under each debug block
    pub rule_color: Color,
    pub rule_thickness: f32,
}

impl StyleSheet {
    /// Look up the style a paragraph block was tagged with
    pub fn get(&self, kind: StyleKind) -> &ParagraphStyle {
        match kind {
            StyleKind::Normal => &self.normal,
            StyleKind::Heading => &self.heading,
            StyleKind::Mono => &self.mono,
            StyleKind::MonoHeader => &self.mono_header,
        }
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        let normal = ParagraphStyle {
            font: FontRole::Body,
            font_size: 10.0,
            leading: 12.0,
            color: Color::BLACK,
            alignment: Alignment::Left,
            space_after: 0.0,
        };
        let mono = ParagraphStyle {
            font: FontRole::Mono,
            font_size: 8.0,
            color: Color::SLATE_BLUE,
            ..normal
        };

        Self {
            normal,
            heading: ParagraphStyle {
                font: FontRole::Heading,
                font_size: 18.0,
                leading: 22.0,
                color: Color::DARK_GRAY,
                alignment: Alignment::Center,
                space_after: 18.0,
            },
            mono,
            mono_header: ParagraphStyle {
                font: FontRole::MonoBold,
                color: Color::BLACK,
                ..mono
            },
            footer: ParagraphStyle {
                font: FontRole::Body,
                font_size: 9.0,
                leading: 11.0,
                color: Color::GRAY,
                alignment: Alignment::Center,
                space_after: 0.0,
            },
            rule_color: Color::LIGHT_GRAY,
            rule_thickness: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_and_content_styles_differ() {
        let sheet = StyleSheet::default();
        let label = sheet.get(StyleKind::MonoHeader);
        let content = sheet.get(StyleKind::Mono);

        assert_eq!(label.font, FontRole::MonoBold);
        assert_eq!(content.font, FontRole::Mono);
        assert_ne!(label.color, content.color);
        assert_eq!(label.font_size, content.font_size);
    }
}
