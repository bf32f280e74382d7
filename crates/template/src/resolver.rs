use crate::error::{ResourceError, TemplateError};
use crate::resource::{ResourceProvider, SharedResourceData};
use std::sync::Arc;

/// Where the inventory report template lives inside a provider.
pub const DEFAULT_TEMPLATE_PATH: &str = "reports/sample_report.json";

/// Loads the report template from one fixed path.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    provider: Arc<dyn ResourceProvider>,
    path: String,
}

impl TemplateResolver {
    pub fn new(provider: Arc<dyn ResourceProvider>, path: impl Into<String>) -> Self {
        Self {
            provider,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Reads the template bytes.
    ///
    /// An absent template is `TemplateError::NotFound`; any other provider
    /// failure is `TemplateError::Resource`.
    pub fn resolve(&self) -> Result<SharedResourceData, TemplateError> {
        match self.provider.load(&self.path) {
            Ok(data) => {
                log::debug!(
                    "Resolved template '{}' via {} ({} bytes)",
                    self.path,
                    self.provider.name(),
                    data.len()
                );
                Ok(data)
            }
            Err(ResourceError::NotFound(_)) => {
                log::error!(
                    "Could not find report template at '{}' ({})",
                    self.path,
                    self.provider.name()
                );
                Err(TemplateError::NotFound(self.path.clone()))
            }
            Err(e) => Err(TemplateError::Resource(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::InMemoryResourceProvider;

    #[test]
    fn test_resolve_present_template() {
        let provider = InMemoryResourceProvider::new().with_resource(DEFAULT_TEMPLATE_PATH, "{}");
        let resolver = TemplateResolver::new(Arc::new(provider), DEFAULT_TEMPLATE_PATH);
        assert_eq!(&*resolver.resolve().unwrap(), b"{}");
    }

    #[test]
    fn test_absent_template_is_not_found() {
        let resolver =
            TemplateResolver::new(Arc::new(InMemoryResourceProvider::new()), DEFAULT_TEMPLATE_PATH);
        match resolver.resolve() {
            Err(TemplateError::NotFound(path)) => assert_eq!(path, DEFAULT_TEMPLATE_PATH),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }
}
