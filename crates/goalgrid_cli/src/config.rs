//! Runtime configuration resolved from CLI flags and environment.

use std::path::PathBuf;

use goalgrid_core::default_log_level;

use crate::cli::Cli;

const DEFAULT_DB_FILE_NAME: &str = "goalgrid.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let db_path = cli
            .db_path
            .clone()
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        let log_level = cli
            .log_level
            .as_deref()
            .map(str::trim)
            .filter(|level| !level.is_empty())
            .unwrap_or(default_log_level())
            .to_string();

        Self {
            db_path,
            log_dir: cli.log_dir.clone(),
            log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, DEFAULT_DB_FILE_NAME};
    use crate::cli::{Cli, Commands};
    use std::path::PathBuf;

    fn cli(db_path: Option<&str>, log_level: Option<&str>) -> Cli {
        Cli {
            db_path: db_path.map(PathBuf::from),
            log_dir: None,
            log_level: log_level.map(str::to_string),
            command: Commands::SaveGoals {
                file: PathBuf::from("-"),
            },
        }
    }

    #[test]
    fn defaults_fill_missing_values() {
        let config = AppConfig::from_cli(&cli(None, Some("  ")));
        assert_eq!(
            config.db_path,
            std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
        );
        assert_eq!(config.log_level, goalgrid_core::default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn explicit_values_win() {
        let config = AppConfig::from_cli(&cli(Some("/data/goals.db"), Some("warn")));
        assert_eq!(config.db_path, PathBuf::from("/data/goals.db"));
        assert_eq!(config.log_level, "warn");
    }
}
