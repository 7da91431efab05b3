//! PDF rendering: fonts, the illustration, the canvas, page finalizers,
//! the layout engine and the lopdf writer

pub mod canvas;
pub mod flow;
pub mod fonts;
pub mod illustration;
pub mod numbering;
pub mod writer;

// Re-export commonly used items
pub use canvas::{Canvas, DrawOp, FinishedPage, PageState};
pub use flow::{wrap_text, DocTemplate};
pub use fonts::{FontSet, LoadedFont};
pub use illustration::ImageAsset;
pub use numbering::{page_label, ImmediatePages, NumberedPages, PageFinalizer};
pub use writer::write_pdf;
