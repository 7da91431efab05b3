//! Drawing surface for one page at a time
//!
//! The canvas records drawing operations into a [`PageState`]. What happens to
//! a page once the layout engine is done with it is decided by a
//! [`PageFinalizer`](super::numbering::PageFinalizer).

use crate::pdf::fonts::FontSet;
use crate::style::{Color, FontRole};

/// One recorded drawing operation, in page coordinates (points, origin bottom-left)
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Text with its baseline starting at (x, y)
    Text {
        font: FontRole,
        size: f32,
        color: Color,
        x: f32,
        y: f32,
        text: String,
    },
    /// Stroked straight line
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Color,
    },
    /// The illustration scaled into the given box
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// Everything needed to resume drawing a page
#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    /// 1-based page number
    pub page_number: usize,
    pub ops: Vec<DrawOp>,
    font: FontRole,
    font_size: f32,
    fill: Color,
}

impl PageState {
    fn new(page_number: usize) -> Self {
        Self {
            page_number,
            ops: Vec::new(),
            font: FontRole::Body,
            font_size: 10.0,
            fill: Color::BLACK,
        }
    }

    /// Seal the page for output
    pub fn finish(self) -> FinishedPage {
        FinishedPage {
            number: self.page_number,
            ops: self.ops,
        }
    }
}

/// A page that will be written to the document as-is
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedPage {
    pub number: usize,
    pub ops: Vec<DrawOp>,
}

impl FinishedPage {
    /// All text drawn on the page, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

pub struct Canvas<'a> {
    fonts: &'a FontSet,
    width: f32,
    state: PageState,
}

impl<'a> Canvas<'a> {
    pub fn new(fonts: &'a FontSet, width: f32) -> Self {
        Self {
            fonts,
            width,
            state: PageState::new(1),
        }
    }

    pub fn page_width(&self) -> f32 {
        self.width
    }

    /// Number of the page currently being drawn
    pub fn page_number(&self) -> usize {
        self.state.page_number
    }

    /// Whether anything was drawn on the current page
    pub fn is_blank(&self) -> bool {
        self.state.ops.is_empty()
    }

    pub fn set_font(&mut self, font: FontRole, size: f32) {
        self.state.font = font;
        self.state.font_size = size;
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.state.fill = color;
    }

    /// Width of `text` in the current font, in points
    pub fn string_width(&self, text: &str) -> f32 {
        self.fonts
            .font(self.state.font)
            .text_width(text, self.state.font_size)
    }

    /// Draw text with its left end at `x`
    pub fn draw_string(&mut self, x: f32, y: f32, text: &str) {
        self.state.ops.push(DrawOp::Text {
            font: self.state.font,
            size: self.state.font_size,
            color: self.state.fill,
            x,
            y,
            text: text.to_string(),
        });
    }

    /// Draw text horizontally centered on `x`
    pub fn draw_centred_string(&mut self, x: f32, y: f32, text: &str) {
        let width = self.string_width(text);
        self.draw_string(x - width / 2.0, y, text);
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Color) {
        self.state.ops.push(DrawOp::Line {
            from,
            to,
            width,
            color,
        });
    }

    pub fn draw_image(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.state.ops.push(DrawOp::Image {
            x,
            y,
            width,
            height,
        });
    }

    /// Take the current page's state and start the next page
    pub fn take_page(&mut self) -> PageState {
        let next = PageState::new(self.state.page_number + 1);
        std::mem::replace(&mut self.state, next)
    }

    /// Make a previously taken page current again
    pub fn restore(&mut self, state: PageState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_page_advances_numbering() {
        let fonts = FontSet::builtin();
        let mut canvas = Canvas::new(&fonts, 600.0);
        canvas.draw_string(10.0, 10.0, "first");

        let first = canvas.take_page();
        assert_eq!(first.page_number, 1);
        assert_eq!(first.ops.len(), 1);
        assert_eq!(canvas.page_number(), 2);
        assert!(canvas.is_blank());
    }

    #[test]
    fn test_restore_resumes_page_state() {
        let fonts = FontSet::builtin();
        let mut canvas = Canvas::new(&fonts, 600.0);
        canvas.set_font(FontRole::Mono, 8.0);
        canvas.set_fill_color(Color::SLATE_BLUE);
        canvas.draw_string(10.0, 10.0, "kept");
        let saved = canvas.take_page();

        canvas.restore(saved.clone());
        canvas.draw_string(20.0, 20.0, "added");
        let page = canvas.take_page().finish();

        assert_eq!(page.number, 1);
        assert_eq!(page.texts().collect::<Vec<_>>(), vec!["kept", "added"]);
        assert!(matches!(
            page.ops[1],
            DrawOp::Text { font: FontRole::Mono, size, color, .. } if size == 8.0 && color == Color::SLATE_BLUE
        ));
    }

    #[test]
    fn test_centred_string() {
        let fonts = FontSet::builtin();
        let mut canvas = Canvas::new(&fonts, 600.0);
        canvas.set_font(FontRole::Mono, 10.0);
        canvas.draw_centred_string(300.0, 50.0, "abcd");

        // Courier: 4 chars * 6pt
        match &canvas.take_page().ops[0] {
            DrawOp::Text { x, .. } => assert!((x - 288.0).abs() < 0.001),
            other => panic!("unexpected op {:?}", other),
        }
    }
}
