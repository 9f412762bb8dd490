//! Runtime configuration read from the environment.
//!
//! Values may also come from a `.env` file; the binary loads it with
//! `dotenvy` before calling [`Config::from_env`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::service::TagReuse;

/// Environment variable holding the database path.
pub const DB_PATH_VAR: &str = "NOTEKEEP_DB";
/// Environment variable selecting the [`TagReuse`] policy.
pub const TAG_REUSE_VAR: &str = "NOTEKEEP_TAG_REUSE";
/// Environment variable holding the tracing filter directive.
pub const LOG_VAR: &str = "NOTEKEEP_LOG";

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    pub tag_reuse: TagReuse,
    pub log_filter: String,
}

impl Config {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag reuse policy is not recognised, or if no
    /// database path is set and the platform data directory is unknown.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_path = match lookup(DB_PATH_VAR).filter(|v| !v.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_database_path()?,
        };

        let tag_reuse = match lookup(TAG_REUSE_VAR) {
            Some(value) => value
                .parse::<TagReuse>()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("invalid {TAG_REUSE_VAR}"))?,
            None => TagReuse::default(),
        };

        let log_filter = lookup(LOG_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            database_path,
            tag_reuse,
            log_filter,
        })
    }

    /// Returns the log file used while the terminal UI owns the screen.
    pub fn log_file(&self) -> PathBuf {
        self.database_path.with_file_name("notekeep.log")
    }
}

/// Gets the cross-platform database path.
///
/// Returns the path as `{data_dir}/notekeep/notes.db` where `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
pub fn default_database_path() -> Result<PathBuf> {
    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine data directory"))?;

    Ok(data_dir.join("notekeep").join("notes.db"))
}

/// Ensures the parent directory of the database file exists.
pub fn ensure_database_directory(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create database directory: {}", parent.display())
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serial_test::serial;
    use tempfile::tempdir;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn explicit_values_are_used() {
        let config = Config::from_lookup(lookup_from(&[
            (DB_PATH_VAR, "/tmp/notes/test.db"),
            (TAG_REUSE_VAR, "fresh"),
            (LOG_VAR, "notekeep=debug"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/notes/test.db"));
        assert_eq!(config.tag_reuse, TagReuse::Fresh);
        assert_eq!(config.log_filter, "notekeep=debug");
        assert_eq!(config.log_file(), PathBuf::from("/tmp/notes/notekeep.log"));
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup_from(&[(DB_PATH_VAR, "notes.db")])).unwrap();

        assert_eq!(config.tag_reuse, TagReuse::Reparent);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn invalid_tag_reuse_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            (DB_PATH_VAR, "notes.db"),
            (TAG_REUSE_VAR, "sometimes"),
        ]))
        .unwrap_err();

        assert!(format!("{err:#}").contains(TAG_REUSE_VAR));
    }

    #[test]
    fn default_path_ends_with_app_directory() {
        // dirs::data_dir() is None on some minimal CI containers
        if let Ok(path) = default_database_path() {
            assert!(path.ends_with("notekeep/notes.db"));
        }
    }

    #[test]
    fn ensure_database_directory_creates_parents() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("a").join("b").join("notes.db");

        ensure_database_directory(&db_path).unwrap();

        assert!(db_path.parent().unwrap().is_dir());
    }

    #[test]
    fn ensure_database_directory_accepts_bare_file_name() {
        ensure_database_directory(Path::new("notes.db")).unwrap();
    }

    #[test]
    #[serial]
    fn from_env_reads_process_environment() {
        // SAFETY: serialized with other env-mutating tests
        unsafe {
            std::env::set_var(DB_PATH_VAR, "/tmp/env-notes.db");
            std::env::set_var(TAG_REUSE_VAR, "fresh");
        }

        let config = Config::from_env();

        unsafe {
            std::env::remove_var(DB_PATH_VAR);
            std::env::remove_var(TAG_REUSE_VAR);
        }

        let config = config.unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/env-notes.db"));
        assert_eq!(config.tag_reuse, TagReuse::Fresh);
    }
}
