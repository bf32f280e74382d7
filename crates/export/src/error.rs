use inventory_render_lopdf::RenderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("PDF encoding failed: {0}")]
    Pdf(#[from] RenderError),

    #[error("Package archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML writing error: {0}")]
    Xml(String),

    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid export configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<quick_xml::Error> for ExportError {
    fn from(err: quick_xml::Error) -> Self {
        ExportError::Xml(err.to_string())
    }
}
