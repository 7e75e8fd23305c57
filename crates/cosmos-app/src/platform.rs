//! Platform directory resolution.
//!
//! Follows OS conventions (XDG on Linux, Known Folders on Windows, Library
//! on macOS). The config directory matches
//! [`cosmos_config::default_config_dir`].

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("could not determine OS configuration directory")]
    NoConfigDir,
    #[error("platform I/O error: {0}")]
    Io(#[from] std::io::Error),
}

const APP_NAME: &str = "cosmos";

/// OS-specific directories for the sandbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    /// `config.ron` lives here.
    pub config_dir: PathBuf,
    /// Exported meshes and preview dumps.
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl PlatformDirs {
    /// Resolve directories without creating them.
    pub fn resolve() -> Result<Self, PlatformError> {
        let config_dir = cosmos_config::default_config_dir().ok_or(PlatformError::NoConfigDir)?;
        let data_dir = dirs::data_dir()
            .map(|base| base.join(APP_NAME))
            .unwrap_or_else(|| config_dir.join("data"));
        Ok(Self {
            log_dir: data_dir.join("logs"),
            config_dir,
            data_dir,
        })
    }

    /// Use `config_dir` for config and keep logs beside it. Used when the
    /// config directory is given on the command line.
    pub fn with_config_dir(config_dir: &Path) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
            data_dir: config_dir.join("data"),
            log_dir: config_dir.join("logs"),
        }
    }

    /// Resolve under a custom root, for tests.
    pub fn resolve_with_root(root: &Path) -> Self {
        let app_dir = root.join(APP_NAME);
        Self {
            config_dir: app_dir.join("config"),
            data_dir: app_dir.join("data"),
            log_dir: app_dir.join("logs"),
        }
    }

    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_with_root() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve_with_root(tmp.path());
        assert!(dirs.config_dir.starts_with(tmp.path()));
        assert!(dirs.log_dir.ends_with("logs"));
    }

    #[test]
    fn test_create_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve_with_root(tmp.path());
        dirs.create_dirs().unwrap();
        assert!(dirs.config_dir.is_dir());
        assert!(dirs.data_dir.is_dir());
        assert!(dirs.log_dir.is_dir());
    }

    #[test]
    fn test_with_config_dir_keeps_logs_beside_config() {
        let dirs = PlatformDirs::with_config_dir(Path::new("sandbox"));
        assert_eq!(dirs.config_dir, PathBuf::from("sandbox"));
        assert_eq!(dirs.log_dir, Path::new("sandbox").join("logs"));
    }
}
