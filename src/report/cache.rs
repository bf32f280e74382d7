use inventory_template::{CompiledReport, ReportCompiler, SharedResourceData, TemplateError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

struct CacheEntry {
    source: SharedResourceData,
    report: Arc<CompiledReport>,
}

/// Compiled reports keyed by template path.
///
/// An entry is only reused while the resolved bytes equal the bytes it was
/// compiled from, so an edited template is recompiled on the next request.
#[derive(Default)]
pub struct TemplateCache {
    compiler: ReportCompiler,
    entries: RwLock<HashMap<String, CacheEntry>>,
    // Serializes compilation; lookups only take the read lock.
    compile_lock: Mutex<()>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compile(
        &self,
        path: &str,
        source: &SharedResourceData,
    ) -> Result<Arc<CompiledReport>, TemplateError> {
        if let Some(report) = self.lookup(path, source) {
            return Ok(report);
        }

        let _guard = self.compile_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(report) = self.lookup(path, source) {
            return Ok(report);
        }

        let report = Arc::new(self.compiler.compile(source)?);
        tracing::debug!("Cached compiled template '{}'", path);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                path.to_string(),
                CacheEntry {
                    source: Arc::clone(source),
                    report: Arc::clone(&report),
                },
            );
        Ok(report)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, path: &str, source: &SharedResourceData) -> Option<Arc<CompiledReport>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(path)
            .filter(|entry| Arc::ptr_eq(&entry.source, source) || entry.source == *source)
            .map(|entry| Arc::clone(&entry.report))
    }
}
