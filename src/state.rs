use crate::config::Config;
use crate::report::ReportService;
use crate::repository::ItemRepository;
use std::sync::Arc;

/// Shared application state accessible to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Item storage (SQLite or in-memory)
    pub repository: Arc<dyn ItemRepository>,

    /// Runs the report export pipeline
    pub reports: Arc<ReportService>,

    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(repository: Arc<dyn ItemRepository>, reports: ReportService, config: Config) -> Self {
        Self {
            repository,
            reports: Arc::new(reports),
            config: Arc::new(config),
        }
    }

    /// State built from configuration alone, with the report service over
    /// the configured template source.
    pub fn from_config(repository: Arc<dyn ItemRepository>, config: Config) -> Self {
        let reports = ReportService::from_config(&config.report, config.export.clone());
        Self::new(repository, reports, config)
    }
}
