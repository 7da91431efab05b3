//! Layout engine: flows a story through one frame per page
//!
//! Blocks are placed top to bottom. Paragraphs split across pages line by
//! line; every other block moves to the next page whole. A page break only
//! happens when the next block does not fit, so there is never a trailing
//! blank page, and the final open page is always handed to the finalizer.

use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::layout::Frame;
use crate::pdf::canvas::{Canvas, FinishedPage};
use crate::pdf::fonts::LoadedFont;
use crate::pdf::numbering::PageFinalizer;
use crate::pdf::writer;
use crate::story::{Block, ImageBlock, Paragraph, Table, VAlign};
use crate::style::{Alignment, ParagraphStyle};

/// Single-frame document template
pub struct DocTemplate<'a> {
    config: &'a RenderConfig,
}

impl<'a> DocTemplate<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self { config }
    }

    /// Lay out `story` and return the pages produced by `finalizer`
    pub fn layout<F: PageFinalizer>(&self, story: &[Block], finalizer: F) -> Result<Vec<FinishedPage>> {
        let mut canvas = Canvas::new(&self.config.fonts, self.config.page.width.pt());

        let mut flow = Flow {
            config: self.config,
            frame: self.config.frame,
            cursor: self.config.frame.top(),
            finalizer,
        };

        for block in story {
            flow.place(&mut canvas, block)?;
        }

        let Flow { mut finalizer, .. } = flow;
        finalizer.show_page(&mut canvas);
        Ok(finalizer.save(&mut canvas))
    }

    /// Lay out `story` and serialize the result to PDF bytes
    pub fn build<F: PageFinalizer>(&self, story: &[Block], finalizer: F) -> Result<Vec<u8>> {
        let pages = self.layout(story, finalizer)?;
        writer::write_pdf(self.config, &pages)
    }
}

struct Flow<'a, F> {
    config: &'a RenderConfig,
    frame: Frame,
    /// Top of the free space on the current page
    cursor: f32,
    finalizer: F,
}

impl<F: PageFinalizer> Flow<'_, F> {
    fn remaining(&self) -> f32 {
        self.cursor - self.frame.y
    }

    fn at_top(&self) -> bool {
        self.cursor >= self.frame.top()
    }

    fn new_page(&mut self, canvas: &mut Canvas<'_>) {
        self.finalizer.show_page(canvas);
        self.cursor = self.frame.top();
    }

    /// Move to a fresh page unless `height` fits here; fail if it can never fit
    fn ensure_room(&mut self, canvas: &mut Canvas<'_>, height: f32, what: &str) -> Result<()> {
        if height > self.frame.height {
            return Err(Error::Layout(format!(
                "{} of height {:.1}pt does not fit in a frame of height {:.1}pt",
                what, height, self.frame.height
            )));
        }
        if height > self.remaining() {
            self.new_page(canvas);
        }
        Ok(())
    }

    fn place(&mut self, canvas: &mut Canvas<'_>, block: &Block) -> Result<()> {
        match block {
            Block::Paragraph(paragraph) => self.place_paragraph(canvas, paragraph),
            Block::Spacer(height) => {
                // A spacer never starts a page; it is clipped at the frame bottom
                self.cursor = (self.cursor - height).max(self.frame.y);
                Ok(())
            }
            Block::Rule => {
                let config = self.config;
                let styles = &config.styles;
                let thickness = styles.rule_thickness;
                if thickness > self.frame.height {
                    return Err(Error::Layout(format!(
                        "rule of thickness {:.1}pt does not fit in a frame of height {:.1}pt",
                        thickness, self.frame.height
                    )));
                }
                // Rules stay on the page of the content above them
                let y = (self.cursor - thickness / 2.0).max(self.frame.y);
                canvas.line(
                    (self.frame.x, y),
                    (self.frame.x + self.frame.width, y),
                    thickness,
                    styles.rule_color,
                );
                self.cursor = (self.cursor - thickness).max(self.frame.y);
                Ok(())
            }
            Block::Image(image) => {
                self.ensure_room(canvas, image.height, "image")?;
                let x = self.frame.x + (self.frame.width - image.width) / 2.0;
                canvas.draw_image(x, self.cursor - image.height, image.width, image.height);
                self.cursor -= image.height;
                Ok(())
            }
            Block::Table(table) => self.place_table(canvas, table),
        }
    }

    fn place_paragraph(&mut self, canvas: &mut Canvas<'_>, paragraph: &Paragraph) -> Result<()> {
        let config = self.config;
        let style = config.styles.get(paragraph.style);
        let font = config.fonts.font(style.font);
        let lines = wrap_text(&paragraph.text, font, style.font_size, self.frame.width);

        let mut pending = lines.as_slice();
        while !pending.is_empty() {
            let fitting = (self.remaining() / style.leading).floor() as usize;
            if fitting == 0 {
                if self.at_top() {
                    return Err(Error::Layout(format!(
                        "line of height {:.1}pt does not fit in an empty frame",
                        style.leading
                    )));
                }
                self.new_page(canvas);
                continue;
            }

            let (now, later) = pending.split_at(fitting.min(pending.len()));
            draw_lines(canvas, style, font, now, self.frame.x, self.frame.width, self.cursor);
            self.cursor -= now.len() as f32 * style.leading;
            pending = later;
        }

        self.cursor = (self.cursor - style.space_after).max(self.frame.y);
        Ok(())
    }

    fn place_table(&mut self, canvas: &mut Canvas<'_>, table: &Table) -> Result<()> {
        if table.cells.is_empty() {
            return Ok(());
        }

        let pad = table.padding;
        let cell_width = self.frame.width / table.cells.len() as f32;
        let inner_width = cell_width - pad.left - pad.right;

        let mut contents = Vec::with_capacity(table.cells.len());
        for cell in &table.cells {
            contents.push(self.measure_cell(cell, inner_width)?);
        }
        let content_height = contents.iter().map(|c| c.height()).fold(0.0, f32::max);
        let row_height = content_height + pad.top + pad.bottom;

        self.ensure_room(canvas, row_height, "table row")?;

        for (i, content) in contents.iter().enumerate() {
            let x = self.frame.x + i as f32 * cell_width + pad.left;
            let slack = content_height - content.height();
            let top = self.cursor
                - pad.top
                - match table.valign {
                    VAlign::Top => 0.0,
                    VAlign::Middle => slack / 2.0,
                    VAlign::Bottom => slack,
                };

            match content {
                CellContent::Lines { style, lines } => {
                    let font = self.config.fonts.font(style.font);
                    draw_lines(canvas, style, font, lines, x, inner_width, top);
                }
                CellContent::Image(image) => {
                    canvas.draw_image(x, top - image.height, image.width, image.height);
                }
                CellContent::Empty(_) => {}
            }
        }

        self.cursor -= row_height;
        Ok(())
    }

    fn measure_cell(&self, cell: &Block, width: f32) -> Result<CellContent> {
        match cell {
            Block::Paragraph(paragraph) => {
                let style = *self.config.styles.get(paragraph.style);
                let font = self.config.fonts.font(style.font);
                let lines = wrap_text(&paragraph.text, font, style.font_size, width);
                Ok(CellContent::Lines { style, lines })
            }
            Block::Image(image) => Ok(CellContent::Image(*image)),
            Block::Spacer(height) => Ok(CellContent::Empty(*height)),
            Block::Rule | Block::Table(_) => Err(Error::Layout(
                "table cells may only hold paragraphs, images or spacers".to_string(),
            )),
        }
    }
}

enum CellContent {
    Lines {
        style: ParagraphStyle,
        lines: Vec<String>,
    },
    Image(ImageBlock),
    Empty(f32),
}

impl CellContent {
    fn height(&self) -> f32 {
        match self {
            CellContent::Lines { style, lines } => lines.len() as f32 * style.leading,
            CellContent::Image(image) => image.height,
            CellContent::Empty(height) => *height,
        }
    }
}

/// Draw already wrapped lines with the first line's top at `top`
fn draw_lines(
    canvas: &mut Canvas<'_>,
    style: &ParagraphStyle,
    font: &LoadedFont,
    lines: &[String],
    x: f32,
    width: f32,
    top: f32,
) {
    canvas.set_font(style.font, style.font_size);
    canvas.set_fill_color(style.color);

    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let baseline = top - i as f32 * style.leading - style.font_size;
        let line_x = match style.alignment {
            Alignment::Left => x,
            Alignment::Center => x + (width - font.text_width(line, style.font_size)) / 2.0,
        };
        canvas.draw_string(line_x, baseline, line);
    }
}

/// Break text into lines no wider than `max_width`
///
/// `\n` forces a break. Lines break at regular spaces only; a word wider than
/// the whole line is broken between characters. An empty text gives one
/// empty line.
pub fn wrap_text(text: &str, font: &LoadedFont, font_size: f32, max_width: f32) -> Vec<String> {
    let width_of = |s: &str| font.text_width(s, font_size);
    let mut lines = Vec::new();

    for forced in text.split('\n') {
        let mut current = String::new();

        for word in forced.split(' ') {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if width_of(&candidate) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            // The word alone may still be too wide
            for ch in word.chars() {
                current.push(ch);
                if width_of(&current) > max_width && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(ch);
                }
            }
        }

        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Margins, PageDimensions};
    use crate::pdf::canvas::DrawOp;
    use crate::pdf::fonts::{BuiltinFont, FontSet};
    use crate::pdf::illustration::ImageAsset;
    use crate::pdf::numbering::ImmediatePages;
    use crate::story::CellPadding;
    use crate::style::StyleKind;

    fn courier() -> LoadedFont {
        LoadedFont::Builtin(BuiltinFont::Courier)
    }

    fn test_config() -> RenderConfig {
        let rgba = image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 255]));
        RenderConfig::new(
            PageDimensions::a4(),
            Margins::standard(),
            FontSet::builtin(),
            ImageAsset::from_rgba(rgba),
        )
    }

    /// Mono lines that fill the first page to within one leading of the bottom
    fn full_page(config: &RenderConfig) -> Vec<Block> {
        let leading = config.styles.mono.leading;
        let count = (config.frame.height / leading).floor() as usize;
        assert!(config.frame.height - count as f32 * leading < leading);
        (0..count)
            .map(|i| Block::paragraph(format!("line {}", i), StyleKind::Mono))
            .collect()
    }

    /// Baseline of the only text drawn on the first page
    fn first_text_y(pages: &[FinishedPage]) -> f32 {
        pages[0]
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { y, .. } => Some(*y),
                _ => None,
            })
            .unwrap()
    }

    fn table_with(valign: VAlign) -> Vec<Block> {
        vec![Block::Table(Table {
            cells: vec![
                Block::paragraph("left", StyleKind::Normal),
                Block::Image(ImageBlock {
                    width: 20.0,
                    height: 40.0,
                }),
            ],
            valign,
            padding: CellPadding {
                left: 0.0,
                right: 0.0,
                top: 0.0,
                bottom: 0.0,
            },
        })]
    }

    #[test]
    fn test_trailing_spacer_does_not_add_a_page() {
        let config = test_config();
        let mut story = full_page(&config);
        story.push(Block::Spacer(8.0));

        let pages = DocTemplate::new(&config)
            .layout(&story, ImmediatePages::default())
            .unwrap();
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_block_tail_stays_on_full_page() {
        let config = test_config();
        let mut story = full_page(&config);
        story.extend([Block::Spacer(4.0), Block::Rule, Block::Spacer(8.0)]);

        let pages = DocTemplate::new(&config)
            .layout(&story, ImmediatePages::default())
            .unwrap();
        assert_eq!(pages.len(), 1);
        let rule = pages[0].ops.iter().find_map(|op| match op {
            DrawOp::Line { from, .. } => Some(from.1),
            _ => None,
        });
        assert_eq!(rule, Some(config.frame.y));
    }

    #[test]
    fn test_content_after_clipped_spacer_starts_next_page() {
        let config = test_config();
        let mut story = full_page(&config);
        story.push(Block::Spacer(8.0));
        story.push(Block::paragraph("next", StyleKind::Mono));

        let pages = DocTemplate::new(&config)
            .layout(&story, ImmediatePages::default())
            .unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].texts().collect::<Vec<_>>(), vec!["next"]);
    }

    #[test]
    fn test_oversized_image_is_rejected() {
        let config = test_config();
        let story = vec![Block::Image(ImageBlock {
            width: 10.0,
            height: config.frame.height + 1.0,
        })];

        let result = DocTemplate::new(&config).layout(&story, ImmediatePages::default());
        assert!(matches!(result, Err(Error::Layout(_))));
    }

    #[test]
    fn test_table_cell_vertical_alignment() {
        let config = test_config();
        let top = config.frame.top();
        let font_size = config.styles.normal.font_size;
        // Text cell is 12pt tall next to a 40pt image: 28pt of slack
        for (valign, offset) in [(VAlign::Top, 0.0), (VAlign::Middle, 14.0), (VAlign::Bottom, 28.0)] {
            let pages = DocTemplate::new(&config)
                .layout(&table_with(valign), ImmediatePages::default())
                .unwrap();
            let expected = top - offset - font_size;
            assert!((first_text_y(&pages) - expected).abs() < 0.001, "{:?}", valign);
        }
    }

    #[test]
    fn test_wrap_keeps_short_text() {
        // Courier at 10pt: 6pt per character
        assert_eq!(wrap_text("hello world", &courier(), 10.0, 100.0), vec!["hello world"]);
    }

    #[test]
    fn test_wrap_breaks_at_spaces() {
        let lines = wrap_text("aaaa bbbb cccc", &courier(), 10.0, 60.0);
        assert_eq!(lines, vec!["aaaa bbbb", "cccc"]);
    }

    #[test]
    fn test_wrap_honours_forced_breaks() {
        let lines = wrap_text("one\n\ntwo", &courier(), 10.0, 100.0);
        assert_eq!(lines, vec!["one", "", "two"]);
    }

    #[test]
    fn test_wrap_splits_long_words_by_character() {
        let lines = wrap_text("abcdefghij", &courier(), 10.0, 24.0);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_nbsp_does_not_break() {
        let text = "ab\u{a0}cd ef";
        let lines = wrap_text(text, &courier(), 10.0, 36.0);
        assert_eq!(lines, vec!["ab\u{a0}cd", "ef"]);
    }

    #[test]
    fn test_empty_text_gives_one_line() {
        assert_eq!(wrap_text("", &courier(), 10.0, 100.0), vec![String::new()]);
    }
}
