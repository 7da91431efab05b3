//! Story assembly: the ordered blocks of one echo document

pub mod block;

pub use block::{build_block, Block, CellPadding, ImageBlock, Paragraph, Table, VAlign};

use crate::echo::RequestEcho;
use crate::layout::Length;
use crate::style::StyleKind;

pub const HEADERS_LABEL: &str = "Request headers";
pub const BODY_LABEL: &str = "Request body";
pub const PARSED_LABEL: &str = "Request body parsed as structured data";

const HEADING: &str = "Hello!";

const INTRO_TEXT: &str = "This service is under development.\n\n\
But since you are here...\n\
The picture on the right is just for decoration.\n\n\
Below is debug information\n\
for developers.";

/// The static opening of every document: heading, then text beside the illustration
pub fn intro() -> Vec<Block> {
    let illustration = Block::Image(ImageBlock {
        width: Length::from_cm(7.0).pt(),
        height: Length::from_cm(5.0).pt(),
    });

    vec![
        Block::paragraph(HEADING, StyleKind::Heading),
        Block::Spacer(12.0),
        Block::Table(Table {
            cells: vec![Block::paragraph(INTRO_TEXT, StyleKind::Normal), illustration],
            valign: VAlign::Top,
            padding: CellPadding {
                left: 4.0,
                right: 4.0,
                top: 3.0,
                bottom: 3.0,
            },
        }),
        Block::Spacer(20.0),
    ]
}

/// Assemble the full story for one request
///
/// A body that is not JSON does not fail assembly; the third block shows why
/// it could not be parsed.
pub fn assemble(request: &RequestEcho) -> Vec<Block> {
    let mut story = intro();
    story.extend(build_block(HEADERS_LABEL, &request.headers_value()));
    story.extend(build_block(BODY_LABEL, &request.body_value()));
    story.extend(build_block(PARSED_LABEL, &request.parsed_body()));
    story
}
