use crate::importer::RowErrorPolicy;
use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;

pub const DEFAULT_DATABASE_PATH: &str = "visitors.db";
pub const DEFAULT_INSTITUTION: &str = "perucompras";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_path: String,
    /// Institution stamped on every imported record.
    pub institution: String,
    pub on_row_error: RowErrorPolicy,
    /// Directories searched by `import-all`.
    pub import_paths: Vec<String>,
    pub ignore_patterns: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            institution: DEFAULT_INSTITUTION.to_string(),
            on_row_error: RowErrorPolicy::default(),
            import_paths: Vec::new(),
            ignore_patterns: Vec::new(),
        }
    }
}

/// Load `Config.toml` from the working directory (optional), then
/// `VISITORS_*` environment overrides.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    load_from("Config")
}

pub fn load_from(file_stem: &str) -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .set_default("database_path", DEFAULT_DATABASE_PATH)?
        .set_default("institution", DEFAULT_INSTITUTION)?
        .set_default("on_row_error", "abort")?
        .set_default("import_paths", Vec::<String>::new())?
        .set_default("ignore_patterns", Vec::<String>::new())?
        .add_source(ConfigFile::with_name(file_stem).required(false))
        .add_source(Environment::with_prefix("VISITORS"))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempdir().unwrap();
        let stem = dir.path().join("missing");
        let config = load_from(stem.to_str().unwrap()).unwrap();
        assert_eq!(config.database_path, "visitors.db");
        assert_eq!(config.institution, "perucompras");
        assert_eq!(config.on_row_error, RowErrorPolicy::Abort);
        assert!(config.import_paths.is_empty());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Visitors.toml");
        fs::write(
            &path,
            "institution = \"minedu\"\n\
             on_row_error = \"skip\"\n\
             import_paths = [\"/data/minedu\"]\n\
             ignore_patterns = [\"**/old/**\"]\n",
        )
        .unwrap();
        let stem = dir.path().join("Visitors");
        let config = load_from(stem.to_str().unwrap()).unwrap();
        assert_eq!(config.institution, "minedu");
        assert_eq!(config.on_row_error, RowErrorPolicy::Skip);
        assert_eq!(config.import_paths, vec!["/data/minedu".to_string()]);
        assert_eq!(config.database_path, "visitors.db");
    }
}
