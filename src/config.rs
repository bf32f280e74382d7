use inventory_export::ExportSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an alternative config file (without extension).
pub const CONFIG_ENV_VAR: &str = "INVENTORY_REPORT_CONFIG";
const ENV_PREFIX: &str = "INVENTORY_REPORT";
const DEFAULT_CONFIG: &str = "config/default";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub report: ReportConfig,
    pub export: ExportSettings,
    pub seed: SeedConfig,
    /// Directory of the loaded config file, used to resolve relative paths.
    #[serde(skip)]
    base_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_request_size_mb: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::Sqlite,
            url: "sqlite://inventory.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateSource {
    /// The sample template compiled into the binary.
    #[default]
    Embedded,
    Filesystem,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub template_source: TemplateSource,
    /// Base directory for the filesystem source.
    pub template_dir: PathBuf,
    /// Template path inside the source.
    pub template_path: String,
    /// Value of the `reportTitle` parameter.
    pub title: String,
    pub cache_compiled: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            template_source: TemplateSource::Embedded,
            template_dir: PathBuf::from("templates"),
            template_path: inventory_template::DEFAULT_TEMPLATE_PATH.to_string(),
            title: "Sales Inventory Report".to_string(),
            cache_compiled: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub enabled: bool,
}

impl Config {
    /// Loads `$INVENTORY_REPORT_CONFIG` or `config/default`, then layers
    /// `INVENTORY_REPORT__*` environment variables on top.
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        let mut base_path: Option<PathBuf> = None;

        let candidate = std::env::var(CONFIG_ENV_VAR)
            .ok()
            .filter(|path| !path.is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
        let config_file = PathBuf::from(format!("{}.toml", candidate));
        if config_file.exists() {
            builder = builder.add_source(config::File::with_name(&candidate));
            // The file lives in `<base>/config/`, relative paths are against `<base>`.
            base_path = config_file
                .parent()
                .and_then(Path::parent)
                .map(Path::to_path_buf);
        }

        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"));

        let mut config: Config = builder.build()?.try_deserialize()?;
        config.base_path = base_path;
        config.resolve_paths();
        Ok(config)
    }

    fn resolve_paths(&mut self) {
        if let Some(base) = &self.base_path
            && self.report.template_dir.is_relative()
        {
            let relative = self
                .report
                .template_dir
                .strip_prefix("./")
                .unwrap_or(&self.report.template_dir);
            self.report.template_dir = base.join(relative);
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn max_request_bytes(&self) -> usize {
        self.server.max_request_size_mb * 1024 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database.backend, DatabaseBackend::Sqlite);
        assert_eq!(config.report.template_source, TemplateSource::Embedded);
        assert_eq!(config.report.template_path, "reports/sample_report.json");
        assert_eq!(config.report.title, "Sales Inventory Report");
        assert!(config.report.cache_compiled);
        assert!(!config.seed.enabled);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.max_request_bytes(), 10 * 1024 * 1024);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [database]
                backend = "memory"

                [export.xlsx]
                one_page_per_sheet = true
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.database.backend, DatabaseBackend::Memory);
        assert_eq!(config.database.max_connections, 5);
        assert!(config.export.xlsx.one_page_per_sheet);
        assert!(config.export.xlsx.detect_cell_type);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_relative_template_dir_resolves_against_base() {
        let mut config = Config {
            base_path: Some(PathBuf::from("/srv/inventory")),
            ..Default::default()
        };
        config.report.template_dir = PathBuf::from("./templates");
        config.resolve_paths();
        assert_eq!(config.report.template_dir, PathBuf::from("/srv/inventory/templates"));
    }
}
