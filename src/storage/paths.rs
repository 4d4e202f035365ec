//! Application paths for config and data.

use directories::ProjectDirs;
use std::path::PathBuf;

/// Environment variable overriding the data directory (used by tests and
/// shell pipelines that want an isolated record store).
pub const ENV_DATA_DIR: &str = "OBATCH_DATA_DIR";

/// Environment variable overriding the config file path.
pub const ENV_CONFIG: &str = "OBATCH_CONFIG";

/// Application paths.
pub struct AppPaths {
    /// Configuration directory.
    pub config: PathBuf,
    /// Data directory (record store lives here).
    pub data: PathBuf,
}

impl AppPaths {
    /// Create paths for the obatch application.
    #[must_use]
    pub fn new() -> Self {
        let mut paths = if let Some(proj_dirs) = ProjectDirs::from("com", "obatch", "obatch") {
            Self {
                config: proj_dirs.config_dir().to_path_buf(),
                data: proj_dirs.data_dir().to_path_buf(),
            }
        } else {
            // Fallback to home directory
            let home = home_dir().unwrap_or_else(|| PathBuf::from("."));
            Self {
                config: home.join(".config/obatch"),
                data: home.join(".local/share/obatch"),
            }
        };

        if let Some(dir) = env_path(ENV_DATA_DIR) {
            paths.data = dir;
        }

        paths
    }

    /// Path to the record store file.
    #[must_use]
    pub fn requests_file(&self) -> PathBuf {
        self.data.join("requests.json")
    }

    /// Path to the config file, honoring the override env var.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        env_path(ENV_CONFIG).unwrap_or_else(|| self.config.join("config.toml"))
    }

    /// Ensure all directories exist.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config)?;
        std::fs::create_dir_all(&self.data)?;
        Ok(())
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var(var).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    })
}

fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}
