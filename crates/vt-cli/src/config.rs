//! Configuration for the `vt` binary.
//!
//! Sources, weakest to strongest: built-in defaults, `config.toml` in
//! the platform config directory, an explicit `--config` file, then
//! `VT_`-prefixed environment variables.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the attendance database file.
    pub database_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("vt.db"),
        }
    }
}

impl Config {
    /// Loads configuration, optionally merging a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed("VT_")).extract()
    }
}

fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("vt"))
}

/// Platform data directory for vt (`~/.local/share/vt` on Linux).
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("vt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_database_lives_in_the_data_dir() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.database_path, data_dir.join("vt.db"));
    }

    #[test]
    fn explicit_config_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "database_path = \"/srv/vt/attendance.db\"\n").unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/srv/vt/attendance.db"));
    }
}
