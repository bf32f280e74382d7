//! JSON report templates.
//!
//! This crate covers the first three stages of report export:
//!
//! 1. **Resolve**: load the template bytes through a [`ResourceProvider`] ([`TemplateResolver`])
//! 2. **Compile**: validate the JSON template and pre-parse its text expressions ([`ReportCompiler`])
//! 3. **Fill**: bind parameters and records, then paginate ([`CompiledReport::fill`])
//!
//! The output is an `inventory_types::FilledReport`, which knows nothing about
//! output formats.

pub mod ast;
pub mod compiler;
pub mod error;
pub mod filler;
pub mod resolver;
pub mod resource;

pub use ast::{FieldType, ParameterType, TemplateFile};
pub use compiler::{CompiledReport, ReportCompiler};
pub use error::{ResourceError, TemplateError};
pub use filler::ReportParameters;
pub use resolver::{TemplateResolver, DEFAULT_TEMPLATE_PATH};
pub use resource::{
    FilesystemResourceProvider, InMemoryResourceProvider, ResourceProvider, SharedResourceData,
};
