//! Error types for the PDF echo library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the PDF echo library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF assembly error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Illustration could not be decoded
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Required asset not found
    #[error("Asset not found: {}", .0.display())]
    AssetNotFound(PathBuf),

    /// Font error
    #[error("Font error: {0}")]
    Font(String),

    /// A block the layout engine cannot place
    #[error("Layout error: {0}")]
    Layout(String),

    /// General error
    #[error("{0}")]
    General(String),
}
