//! Command line configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use ligapro::config::{ConfigError, LeagueDefaults};
use ligapro::db::DatabaseConfig;
use std::path::PathBuf;

/// Where league data lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// PostgreSQL database
    Database(DatabaseConfig),
    /// JSON snapshot file, created on first write
    Snapshot(PathBuf),
}

/// Complete command line configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub source: DataSource,
    /// Settings for leagues created without overrides
    pub defaults: LeagueDefaults,
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `database_url_override` - `--db-url`, takes precedence over `DATABASE_URL`
    /// * `snapshot_override` - `--snapshot`, takes precedence over `LIGAPRO_SNAPSHOT`
    ///
    /// # Errors
    ///
    /// Returns error if no data source is given or a league default is invalid
    pub fn from_env(
        database_url_override: Option<String>,
        snapshot_override: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let snapshot = snapshot_override.or_else(|| std::env::var_os("LIGAPRO_SNAPSHOT").map(PathBuf::from));
        let database_url = database_url_override.or_else(|| std::env::var("DATABASE_URL").ok());

        let config = Self {
            source: Self::resolve_source(database_url, snapshot)?,
            defaults: LeagueDefaults::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Pick the data source. An explicit snapshot file wins over a database URL.
    pub fn resolve_source(
        database_url: Option<String>,
        snapshot: Option<PathBuf>,
    ) -> Result<DataSource, ConfigError> {
        match (snapshot, database_url) {
            (Some(path), _) => Ok(DataSource::Snapshot(path)),
            (None, Some(url)) => Ok(DataSource::Database(DatabaseConfig::with_url(url))),
            (None, None) => Err(ConfigError::MissingRequired {
                var: "DATABASE_URL".to_string(),
                hint: "Pass --db-url URL or --snapshot FILE".to_string(),
            }),
        }
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.defaults.validate()?;

        match &self.source {
            DataSource::Database(database) => database.validate(),
            DataSource::Snapshot(path) => {
                if path.is_dir() {
                    return Err(ConfigError::Invalid {
                        var: "LIGAPRO_SNAPSHOT".to_string(),
                        reason: format!("{} is a directory", path.display()),
                    });
                }
                match path.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
                        Err(ConfigError::Invalid {
                            var: "LIGAPRO_SNAPSHOT".to_string(),
                            reason: format!("Directory {} does not exist", parent.display()),
                        })
                    }
                    _ => Ok(()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_config(path: PathBuf) -> CliConfig {
        CliConfig {
            source: DataSource::Snapshot(path),
            defaults: LeagueDefaults::default(),
        }
    }

    #[test]
    fn test_config_error_display() {
        let err = CliConfig::resolve_source(None, None).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("DATABASE_URL"));
        assert!(msg.contains("--snapshot"));
    }

    #[test]
    fn test_snapshot_wins_over_database() {
        let source = CliConfig::resolve_source(
            Some("postgres://localhost/ligapro".to_string()),
            Some(PathBuf::from("leagues.json")),
        )
        .unwrap();
        assert_eq!(source, DataSource::Snapshot(PathBuf::from("leagues.json")));
    }

    #[test]
    fn test_database_url_keeps_pool_defaults() {
        let source =
            CliConfig::resolve_source(Some("postgres://localhost/ligapro".to_string()), None)
                .unwrap();
        let DataSource::Database(database) = source else {
            panic!("expected a database source");
        };
        assert_eq!(database.database_url, "postgres://localhost/ligapro");
        assert!(database.validate().is_ok());
    }

    #[test]
    fn test_snapshot_in_existing_directory_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let config = snapshot_config(dir.path().join("leagues.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_snapshot_in_missing_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = snapshot_config(dir.path().join("missing").join("leagues.json"));
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_snapshot_pointing_at_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = snapshot_config(dir.path().to_path_buf());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bare_file_name_is_valid() {
        let config = snapshot_config(PathBuf::from("leagues.json"));
        assert!(config.validate().is_ok());
    }
}
