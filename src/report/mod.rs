//! The report export pipeline: resolve → compile → fill → export → assemble.

mod cache;

pub use cache::TemplateCache;

use crate::config::{ReportConfig, TemplateSource};
use crate::error::ReportError;
use inventory_export::{ExportSettings, ExportedReport, DEFAULT_FILENAME_STEM};
use inventory_template::{
    CompiledReport, FilesystemResourceProvider, InMemoryResourceProvider, ReportCompiler,
    ReportParameters, ResourceProvider, TemplateResolver, DEFAULT_TEMPLATE_PATH,
};
use inventory_types::{ExportFormat, Item};
use std::sync::Arc;

/// The inventory template shipped inside the binary.
pub const EMBEDDED_TEMPLATE: &[u8] = include_bytes!("../../templates/reports/sample_report.json");

/// Name of the template parameter carrying the report title.
pub const TITLE_PARAMETER: &str = "reportTitle";

/// Builds the provider the configured template source reads from.
pub fn template_provider(config: &ReportConfig) -> Arc<dyn ResourceProvider> {
    match config.template_source {
        TemplateSource::Embedded => Arc::new(
            InMemoryResourceProvider::new().with_resource(DEFAULT_TEMPLATE_PATH, EMBEDDED_TEMPLATE),
        ),
        TemplateSource::Filesystem => {
            Arc::new(FilesystemResourceProvider::new(&config.template_dir))
        }
    }
}

/// Runs the export pipeline over a set of items.
///
/// The pipeline is synchronous; async callers should run it on a blocking
/// thread.
pub struct ReportService {
    resolver: TemplateResolver,
    cache: Option<TemplateCache>,
    settings: ExportSettings,
    title: String,
}

impl ReportService {
    pub fn new(
        provider: Arc<dyn ResourceProvider>,
        config: &ReportConfig,
        settings: ExportSettings,
    ) -> Self {
        Self {
            resolver: TemplateResolver::new(provider, config.template_path.clone()),
            cache: config.cache_compiled.then(TemplateCache::new),
            settings,
            title: config.title.clone(),
        }
    }

    /// A service over the configured template source.
    pub fn from_config(config: &ReportConfig, settings: ExportSettings) -> Self {
        Self::new(template_provider(config), config, settings)
    }

    pub fn template_path(&self) -> &str {
        self.resolver.path()
    }

    pub fn export_report(
        &self,
        items: &[Item],
        format: ExportFormat,
    ) -> Result<ExportedReport, ReportError> {
        self.export_report_as(items, format, DEFAULT_FILENAME_STEM)
    }

    pub fn export_report_as(
        &self,
        items: &[Item],
        format: ExportFormat,
        filename_stem: &str,
    ) -> Result<ExportedReport, ReportError> {
        tracing::info!("Exporting {} items as {}", items.len(), format);

        let compiled = self.compiled_report()?;
        let parameters = ReportParameters::new().with(TITLE_PARAMETER, self.title.as_str());
        let filled = compiled.fill(&parameters, items)?;
        let bytes = inventory_export::export(&filled, format, &self.settings)?;
        let report = ExportedReport::assemble_as(bytes, format, filename_stem);

        tracing::info!(
            "Exported {} items across {} pages as '{}' ({} bytes)",
            filled.row_count(),
            filled.page_count(),
            report.filename,
            report.len()
        );
        Ok(report)
    }

    fn compiled_report(&self) -> Result<Arc<CompiledReport>, ReportError> {
        let source = self.resolver.resolve()?;
        let compiled = match &self.cache {
            Some(cache) => cache.get_or_compile(self.resolver.path(), &source)?,
            None => Arc::new(ReportCompiler::new().compile(&source)?),
        };
        Ok(compiled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_template_compiles() {
        let report = ReportCompiler::new().compile(EMBEDDED_TEMPLATE).unwrap();
        assert_eq!(report.name(), "sample_report");
        assert!(report.has_title());
        assert!(report.has_page_footer());
        assert!(report.has_summary());
    }

    #[test]
    fn test_export_uses_configured_title() {
        let config = ReportConfig {
            title: "Quarterly Stock".to_string(),
            ..Default::default()
        };
        let service = ReportService::from_config(&config, ExportSettings::default());
        let report = service
            .export_report(&Item::sample_set(), ExportFormat::Html)
            .unwrap();

        let html = String::from_utf8(report.bytes).unwrap();
        assert!(html.contains("Quarterly Stock"));
        assert_eq!(report.filename, "inventory-report.html");
    }

    #[test]
    fn test_missing_template_path_is_not_found() {
        let config = ReportConfig {
            template_path: "reports/missing.json".to_string(),
            ..Default::default()
        };
        let service = ReportService::from_config(&config, ExportSettings::default());
        assert!(matches!(
            service.export_report(&[], ExportFormat::Pdf),
            Err(ReportError::TemplateNotFound(path)) if path == "reports/missing.json"
        ));
    }
}
