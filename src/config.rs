//! Runtime configuration resolved from the environment.
//!
//! # Environment Variables
//!
//! - `YESOD_DB`: path of the catalog database
//!   (default `{data_dir}/yesod/hebrew_studies.db`)
//! - `YESOD_MEDIA`: directory holding the audio clips
//!   (default `{data_dir}/yesod/Media`)
//!
//! `data_dir` is the platform data directory from [`dirs::data_dir`].

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::NO_AUDIO;

const APP_DIR: &str = "yesod";
const DATABASE_FILE: &str = "hebrew_studies.db";
const MEDIA_DIR: &str = "Media";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to determine the platform data directory")]
    NoDataDir,

    #[error("failed to create database directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolved locations of the catalog and its media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    pub media_dir: PathBuf,
}

impl Config {
    /// Reads `YESOD_DB` and `YESOD_MEDIA`, falling back to paths under the
    /// platform data directory. Empty values count as unset.
    ///
    /// Loading a `.env` file is left to the binary.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_path = match env_path("YESOD_DB") {
            Some(path) => path,
            None => default_dir()?.join(DATABASE_FILE),
        };
        let media_dir = match env_path("YESOD_MEDIA") {
            Some(path) => path,
            None => default_dir()?.join(MEDIA_DIR),
        };

        Ok(Self {
            database_path,
            media_dir,
        })
    }

    /// Returns the path of an audio clip, or `None` for entries recorded
    /// without audio.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use yesod::Config;
    ///
    /// let config = Config {
    ///     database_path: PathBuf::from("/tmp/catalog.db"),
    ///     media_dir: PathBuf::from("/tmp/Media"),
    /// };
    /// assert_eq!(config.audio_path("shalom.mp3"), Some(PathBuf::from("/tmp/Media/shalom.mp3")));
    /// assert_eq!(config.audio_path("No Audio"), None);
    /// ```
    pub fn audio_path(&self, audio_file: &str) -> Option<PathBuf> {
        let file = audio_file.trim();
        if file.is_empty() || file == NO_AUDIO {
            None
        } else {
            Some(self.media_dir.join(file))
        }
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn default_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or(ConfigError::NoDataDir)
}

/// Ensures the parent directory of the database file exists.
///
/// Creates the directory structure if it doesn't exist using `create_dir_all`.
pub fn ensure_database_directory(db_path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    fn clear_env() {
        unsafe {
            std::env::remove_var("YESOD_DB");
            std::env::remove_var("YESOD_MEDIA");
        }
    }

    #[test]
    #[serial]
    fn env_vars_override_defaults() {
        unsafe {
            std::env::set_var("YESOD_DB", "/srv/yesod/catalog.db");
            std::env::set_var("YESOD_MEDIA", "/srv/yesod/clips");
        }

        let config = Config::from_env().unwrap();
        clear_env();

        assert_eq!(config.database_path, PathBuf::from("/srv/yesod/catalog.db"));
        assert_eq!(config.media_dir, PathBuf::from("/srv/yesod/clips"));
    }

    #[test]
    #[serial]
    fn defaults_live_under_data_dir() {
        clear_env();
        let Some(data_dir) = dirs::data_dir() else {
            return;
        };

        let config = Config::from_env().unwrap();
        assert_eq!(
            config.database_path,
            data_dir.join("yesod").join("hebrew_studies.db")
        );
        assert_eq!(config.media_dir, data_dir.join("yesod").join("Media"));
    }

    #[test]
    #[serial]
    fn empty_env_var_counts_as_unset() {
        clear_env();
        let Some(data_dir) = dirs::data_dir() else {
            return;
        };
        unsafe { std::env::set_var("YESOD_DB", "") };

        let config = Config::from_env().unwrap();
        clear_env();

        assert_eq!(
            config.database_path,
            data_dir.join("yesod").join("hebrew_studies.db")
        );
    }

    #[test]
    fn audio_path_ignores_blank_file() {
        let config = Config {
            database_path: PathBuf::from("catalog.db"),
            media_dir: PathBuf::from("Media"),
        };
        assert_eq!(config.audio_path("  "), None);
        assert_eq!(config.audio_path(" a.mp3 "), Some(PathBuf::from("Media/a.mp3")));
    }

    #[test]
    fn ensure_database_directory_creates_parents() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("deeper").join("catalog.db");

        ensure_database_directory(&db_path).unwrap();

        assert!(db_path.parent().unwrap().is_dir());
        assert!(!db_path.exists());
    }

    #[test]
    fn ensure_database_directory_accepts_bare_file_name() {
        assert!(ensure_database_directory(Path::new("catalog.db")).is_ok());
    }
}
