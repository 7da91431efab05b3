//! Content blocks and the debug block builder

use crate::echo::EchoValue;
use crate::format::format_value;
use crate::style::StyleKind;

/// Space between the last content line and the separator, in points
const RULE_SPACE_BEFORE: f32 = 4.0;
/// Space after the separator, in points
const RULE_SPACE_AFTER: f32 = 8.0;

/// One renderable unit of a story
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Text laid out with a named style; `\n` forces a line break
    Paragraph(Paragraph),
    /// Vertical gap in points
    Spacer(f32),
    /// Thin full-width separator line
    Rule,
    /// The configured illustration, drawn at the given size in points
    Image(ImageBlock),
    /// One row of equal-width cells
    Table(Table),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub style: StyleKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageBlock {
    pub width: f32,
    pub height: f32,
}

/// Vertical placement of cell content inside a table row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

/// Padding around the content of each table cell, in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPadding {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub cells: Vec<Block>,
    pub valign: VAlign,
    pub padding: CellPadding,
}

impl Block {
    pub fn paragraph(text: impl Into<String>, style: StyleKind) -> Self {
        Block::Paragraph(Paragraph {
            text: text.into(),
            style,
        })
    }

    /// Text of a paragraph block
    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Paragraph(p) => Some(&p.text),
            _ => None,
        }
    }
}

/// Build the labelled dump of one value
///
/// Emits the bold label, one monospaced paragraph per formatted line, a small
/// spacer, a rule and a larger spacer: `1 + lines + 3` blocks in total.
pub fn build_block(label: &str, value: &EchoValue) -> Vec<Block> {
    let lines = format_value(value);
    let mut blocks = Vec::with_capacity(lines.len() + 4);

    blocks.push(Block::paragraph(label, StyleKind::MonoHeader));
    blocks.extend(
        lines
            .into_iter()
            .map(|line| Block::paragraph(line, StyleKind::Mono)),
    );
    blocks.push(Block::Spacer(RULE_SPACE_BEFORE));
    blocks.push(Block::Rule);
    blocks.push(Block::Spacer(RULE_SPACE_AFTER));

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_shape() {
        let value = EchoValue::Structured(json!({"a": "x".repeat(60), "b": "y".repeat(60)}));
        let lines = format_value(&value);
        let blocks = build_block("Label", &value);

        assert_eq!(blocks.len(), lines.len() + 4);
        assert_eq!(blocks[0], Block::paragraph("Label", StyleKind::MonoHeader));
        for (block, line) in blocks[1..=lines.len()].iter().zip(&lines) {
            assert_eq!(block, &Block::paragraph(line.clone(), StyleKind::Mono));
        }
        assert_eq!(
            &blocks[lines.len() + 1..],
            &[Block::Spacer(4.0), Block::Rule, Block::Spacer(8.0)]
        );
    }

    #[test]
    fn test_empty_value_has_one_content_line() {
        let blocks = build_block("Request body", &EchoValue::from(""));
        assert_eq!(blocks.len(), 5);
        assert_eq!(blocks[1].text(), Some(""));
    }
}
