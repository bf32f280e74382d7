//! Inventory CRUD service with multi-format report export.
//!
//! Items are stored through an [`repository::ItemRepository`]. Reports run
//! through [`report::ReportService`], which resolves the JSON template,
//! compiles it (optionally cached), fills it with items and encodes it as
//! PDF, XLSX, CSV, DOCX, PPTX or an HTML fragment.

pub mod api;
pub mod config;
pub mod error;
pub mod report;
pub mod repository;
pub mod seed;
pub mod state;

pub use config::Config;
pub use error::{ReportError, ServiceError};
pub use report::ReportService;
pub use state::AppState;
