use thiserror::Error;

/// Failure to read a template from its provider.
#[derive(Error, Debug, Clone)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load resource '{path}': {message}")]
    LoadFailed { path: String, message: String },
}

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Report template not found at '{0}'")]
    NotFound(String),

    #[error("Failed to read report template: {0}")]
    Resource(#[from] ResourceError),

    #[error("Template compilation error: {0}")]
    Compile(String),

    #[error("Report fill error: {0}")]
    Fill(String),
}

impl From<serde_json::Error> for TemplateError {
    fn from(err: serde_json::Error) -> Self {
        TemplateError::Compile(format!("JSON parse error: {}", err))
    }
}
