//! PDF encoder for filled reports, built on the `lopdf` object model.
//!
//! Each filled page becomes one PDF page drawn with the standard Type1
//! Helvetica faces, so no font data is embedded.

mod error;
mod helpers;
mod renderer;

pub use error::RenderError;
pub use helpers::{encode_win_ansi, text_width};
pub use renderer::LopdfRenderer;
