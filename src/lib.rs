//! PDF Echo Library
//!
//! Renders what a client sent to a service as a readable, paginated PDF.
//! This library provides functionality to:
//! - Format request headers and bodies into display lines
//! - Assemble the echo document from typed content blocks
//! - Flow blocks across fixed-size pages
//! - Stamp "Page X of N" footers in a second pass over captured pages
//! - Serve the result as a base64 document inside a JSON envelope
//!
//! # Example
//!
//! ```no_run
//! use pdf_echo::config::{ConfigOptions, RenderConfig};
//! use pdf_echo::echo::RequestEcho;
//! use pdf_echo::render::render;
//!
//! let config = RenderConfig::load(&ConfigOptions::default()).expect("Failed to load config");
//! let request = RequestEcho::new([("host", "localhost")], r#"{"a":1}"#);
//!
//! let pdf = render(&config, &request).expect("Failed to render");
//! std::fs::write("echo.pdf", pdf).expect("Failed to write");
//! ```

pub mod config;
pub mod echo;
pub mod error;
pub mod format;
pub mod layout;
pub mod pdf;
pub mod render;
pub mod server;
pub mod story;
pub mod style;

// Re-export commonly used items
pub use error::{Error, Result};
