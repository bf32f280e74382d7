//! Foundation types shared by every crate of the inventory report service.
//!
//! - [`Item`]: the single persisted entity, and the row type of every report
//! - [`ExportFormat`]: the closed set of output formats with their response metadata
//! - [`FilledReport`]: a paginated report bound to data, ready for an exporter

pub mod format;
pub mod geometry;
pub mod item;
pub mod report;

pub use format::{ExportFormat, UnsupportedFormat};
pub use geometry::{PageFormat, Size};
pub use item::Item;
pub use report::{Align, BandStyle, Cell, ColumnLayout, FilledPage, FilledReport};
