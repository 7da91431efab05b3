//! Page finalization strategies
//!
//! The layout engine calls [`PageFinalizer::show_page`] each time a page is
//! full and [`PageFinalizer::save`] once the story is exhausted.
//!
//! [`NumberedPages`] defers finalization: pages are snapshotted during layout
//! and only stamped with "Page i of N" and emitted once N is known.

use crate::pdf::canvas::{Canvas, FinishedPage, PageState};
use crate::style::ParagraphStyle;

/// Decides what happens to a page once layout moves past it
pub trait PageFinalizer {
    /// The current page is complete; the canvas must be ready for the next one afterwards
    fn show_page(&mut self, canvas: &mut Canvas<'_>);

    /// Layout is done; return every page in output order
    fn save(self, canvas: &mut Canvas<'_>) -> Vec<FinishedPage>;
}

/// Emits each page as soon as it is complete
#[derive(Debug, Default)]
pub struct ImmediatePages {
    pages: Vec<FinishedPage>,
}

impl PageFinalizer for ImmediatePages {
    fn show_page(&mut self, canvas: &mut Canvas<'_>) {
        self.pages.push(canvas.take_page().finish());
    }

    fn save(self, _canvas: &mut Canvas<'_>) -> Vec<FinishedPage> {
        self.pages
    }
}

/// Snapshots pages during layout and stamps the page count on replay
#[derive(Debug)]
pub struct NumberedPages {
    snapshots: Vec<PageState>,
    style: ParagraphStyle,
    baseline: f32,
}

impl NumberedPages {
    /// `baseline` is the footer's distance from the bottom edge, in points
    pub fn new(style: ParagraphStyle, baseline: f32) -> Self {
        Self {
            snapshots: Vec::new(),
            style,
            baseline,
        }
    }

    /// Number of pages captured so far
    pub fn captured(&self) -> usize {
        self.snapshots.len()
    }

    fn draw_page_number(&self, canvas: &mut Canvas<'_>, total: usize) {
        let text = page_label(canvas.page_number(), total);
        canvas.set_font(self.style.font, self.style.font_size);
        canvas.set_fill_color(self.style.color);
        let center = canvas.page_width() / 2.0;
        canvas.draw_centred_string(center, self.baseline, &text);
    }
}

impl PageFinalizer for NumberedPages {
    fn show_page(&mut self, canvas: &mut Canvas<'_>) {
        self.snapshots.push(canvas.take_page());
    }

    fn save(mut self, canvas: &mut Canvas<'_>) -> Vec<FinishedPage> {
        let snapshots = std::mem::take(&mut self.snapshots);
        let total = snapshots.len();
        let mut pages = Vec::with_capacity(total);

        for state in snapshots {
            canvas.restore(state);
            self.draw_page_number(canvas, total);
            pages.push(canvas.take_page().finish());
        }

        pages
    }
}

/// Footer text for page `index` of `total`
pub fn page_label(index: usize, total: usize) -> String {
    format!("Page {} of {}", index, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fonts::FontSet;
    use crate::style::StyleSheet;

    fn fill_pages<F: PageFinalizer>(finalizer: &mut F, canvas: &mut Canvas<'_>, count: usize) {
        for i in 0..count {
            canvas.draw_string(50.0, 700.0, &format!("content {}", i + 1));
            finalizer.show_page(canvas);
        }
    }

    #[test]
    fn test_every_page_gets_total() {
        let fonts = FontSet::builtin();
        let mut canvas = Canvas::new(&fonts, 595.0);
        let mut numbering = NumberedPages::new(StyleSheet::default().footer, 28.35);

        fill_pages(&mut numbering, &mut canvas, 4);
        assert_eq!(numbering.captured(), 4);
        let pages = numbering.save(&mut canvas);

        assert_eq!(pages.len(), 4);
        for (i, page) in pages.iter().enumerate() {
            let texts: Vec<&str> = page.texts().collect();
            assert_eq!(page.number, i + 1);
            // capture order is output order
            assert_eq!(texts[0], format!("content {}", i + 1));
            assert_eq!(texts.last().copied(), Some(page_label(i + 1, 4).as_str()));
        }
    }

    #[test]
    fn test_footer_is_centered_at_baseline() {
        let fonts = FontSet::builtin();
        let mut canvas = Canvas::new(&fonts, 600.0);
        let style = StyleSheet::default().footer;
        let mut numbering = NumberedPages::new(style, 28.0);

        numbering.show_page(&mut canvas);
        let pages = numbering.save(&mut canvas);

        let label = page_label(1, 1);
        let width = fonts.font(style.font).text_width(&label, style.font_size);
        match &pages[0].ops[0] {
            crate::pdf::canvas::DrawOp::Text { x, y, color, .. } => {
                assert!((x - (300.0 - width / 2.0)).abs() < 0.001);
                assert_eq!(*y, 28.0);
                assert_eq!(*color, style.color);
            }
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_immediate_pages_have_no_footer() {
        let fonts = FontSet::builtin();
        let mut canvas = Canvas::new(&fonts, 595.0);
        let mut immediate = ImmediatePages::default();

        fill_pages(&mut immediate, &mut canvas, 2);
        let pages = immediate.save(&mut canvas);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].texts().collect::<Vec<_>>(), vec!["content 2"]);
    }
}
