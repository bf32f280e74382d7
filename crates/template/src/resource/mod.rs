//! Sources the resolver reads report templates from.
//!
//! The same pipeline runs against a template directory on disk or against
//! the template compiled into the binary.

mod filesystem;

pub use filesystem::FilesystemResourceProvider;

use crate::error::ResourceError;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Template bytes shared between the resolver and the compile cache.
pub type SharedResourceData = Arc<Vec<u8>>;

/// A read-only store of templates addressed by relative path.
pub trait ResourceProvider: Send + Sync + Debug {
    /// Returns `ResourceError::NotFound` when nothing is stored under `path`.
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError>;

    /// Shown in resolver log lines.
    fn name(&self) -> &'static str;
}

/// Serves templates fixed at construction, used for the embedded source.
#[derive(Debug, Default)]
pub struct InMemoryResourceProvider {
    resources: HashMap<String, SharedResourceData>,
}

impl InMemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.resources.insert(path.into(), Arc::new(data.into()));
        self
    }
}

impl ResourceProvider for InMemoryResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        self.resources
            .get(path)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(path.to_string()))
    }

    fn name(&self) -> &'static str {
        "embedded"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_template_is_shared_not_copied() {
        let provider = InMemoryResourceProvider::new().with_resource("reports/a.json", "{}");
        let first = provider.load("reports/a.json").unwrap();
        let second = provider.load("reports/a.json").unwrap();
        assert_eq!(&*first, b"{}");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        let provider = InMemoryResourceProvider::new().with_resource("reports/a.json", "{}");
        assert!(matches!(
            provider.load("reports/b.json"),
            Err(ResourceError::NotFound(ref p)) if p == "reports/b.json"
        ));
    }
}
