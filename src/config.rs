//! Configuration values for the update routine and its log sink.
//!
//! Nothing here reads arguments or the environment beyond resolving the
//! home directory and the running executable's path.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Upstream endpoint serving the launcher version manifest.
pub const MANIFEST_URL: &str = "https://launchermeta.mojang.com/mc/game/version_manifest.json";

/// Hidden application directory under the user's home.
pub const APP_DIR: &str = ".axiom";

/// File name of the cached manifest inside [`APP_DIR`].
pub const MANIFEST_FILE: &str = "version_manifest.json";

/// Name of the installed binary, used when the executable name is unusable.
pub const BIN_NAME: &str = "version_manifest";

/// Directory, next to the executable, that holds the log file.
pub const LOGS_DIR: &str = "logs";

/// Where the manifest comes from and where it is cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Endpoint requested with a single GET.
    pub url: String,
    /// Directory holding the cache file; created on first successful write.
    pub dir: PathBuf,
    /// Cache file name inside `dir`.
    pub file_name: String,
}

impl CacheConfig {
    /// What: Build a configuration for an arbitrary endpoint and directory.
    ///
    /// Inputs:
    /// - `url`: Endpoint to request
    /// - `dir`: Directory that receives [`MANIFEST_FILE`]
    ///
    /// Output:
    /// - `CacheConfig` using the default file name
    #[must_use]
    pub fn new(url: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            dir: dir.into(),
            file_name: MANIFEST_FILE.to_string(),
        }
    }

    /// What: Default configuration: upstream URL cached at `~/.axiom/version_manifest.json`.
    ///
    /// Output:
    /// - `CacheConfig` rooted in the current user's home directory
    ///
    /// # Errors
    /// - Returns `Err(Error::NoHomeDir)` when the home directory cannot be determined
    pub fn in_home() -> Result<Self> {
        let home = dirs::home_dir().ok_or(Error::NoHomeDir)?;
        Ok(Self::new(MANIFEST_URL, home.join(APP_DIR)))
    }

    /// Full path of the cache file.
    #[must_use]
    pub fn target_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// Location and identity of the log sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Directory holding the log file; created when the logger is built.
    pub dir: PathBuf,
    /// Log file name inside `dir`.
    pub file_name: String,
    /// Logger name printed in brackets on every line.
    pub name: String,
}

impl LogConfig {
    /// What: Derive the log location from an executable path.
    ///
    /// Inputs:
    /// - `exe`: Path of the running program
    ///
    /// Output:
    /// - `LogConfig` pointing at `<exe dir>/logs/<exe stem>.log` with logger name `<exe stem>`
    ///
    /// Details:
    /// - The stem is everything before the first `.` of the file name, so
    ///   `version_manifest.exe` and `version_manifest` both log to `version_manifest.log`.
    #[must_use]
    pub fn beside(exe: &Path) -> Self {
        let stem = exe
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.split('.').next())
            .filter(|stem| !stem.is_empty())
            .unwrap_or(BIN_NAME)
            .to_string();
        let dir = exe
            .parent()
            .map_or_else(|| PathBuf::from(LOGS_DIR), |parent| parent.join(LOGS_DIR));
        Self {
            dir,
            file_name: format!("{stem}.log"),
            name: stem,
        }
    }

    /// What: Derive the log location from the currently running executable.
    ///
    /// Output:
    /// - Same as [`LogConfig::beside`] for `std::env::current_exe()`
    ///
    /// # Errors
    /// - Returns `Err(Error::Io)` when the executable path cannot be resolved
    pub fn beside_current_exe() -> Result<Self> {
        let exe = std::env::current_exe().map_err(Error::io(BIN_NAME))?;
        Ok(Self::beside(&exe))
    }

    /// Full path of the log file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// What: Cache target joins the directory and the default file name.
    ///
    /// Inputs:
    /// - `CacheConfig::new` with a custom endpoint and directory
    ///
    /// Output:
    /// - `target_path` ends in `version_manifest.json` under that directory
    #[test]
    fn cache_target_path_uses_default_file_name() {
        let config = CacheConfig::new("http://127.0.0.1:1/manifest.json", "/srv/cache");
        assert_eq!(config.url, "http://127.0.0.1:1/manifest.json");
        assert_eq!(
            config.target_path(),
            Path::new("/srv/cache/version_manifest.json")
        );
    }

    /// What: The default cache lives in the hidden app dir under the home directory.
    ///
    /// Inputs:
    /// - `CacheConfig::in_home` compared against `dirs::home_dir`
    ///
    /// Output:
    /// - With a home dir: upstream URL and `<home>/.axiom/version_manifest.json`
    /// - Without one: `Err(Error::NoHomeDir)`
    #[test]
    fn in_home_points_at_hidden_app_dir() {
        match (dirs::home_dir(), CacheConfig::in_home()) {
            (Some(home), Ok(config)) => {
                assert_eq!(config.url, MANIFEST_URL);
                assert_eq!(config.dir, home.join(APP_DIR));
                assert_eq!(
                    config.target_path(),
                    home.join(".axiom").join("version_manifest.json")
                );
            }
            (None, Err(err)) => assert!(matches!(err, Error::NoHomeDir), "unexpected: {err}"),
            (home, result) => panic!("home {home:?} disagrees with {result:?}"),
        }
    }

    /// What: Log location is derived from the executable path.
    ///
    /// Inputs:
    /// - Executable paths with and without extensions
    ///
    /// Output:
    /// - Log dir is `<exe dir>/logs`, file and logger name use the stem before the first dot
    #[test]
    fn log_config_beside_executable() {
        let config = LogConfig::beside(Path::new("/opt/axiom/scripts/version_manifest"));
        assert_eq!(config.dir, Path::new("/opt/axiom/scripts/logs"));
        assert_eq!(config.file_name, "version_manifest.log");
        assert_eq!(config.name, "version_manifest");
        assert_eq!(
            config.path(),
            Path::new("/opt/axiom/scripts/logs/version_manifest.log")
        );

        let windows = LogConfig::beside(Path::new("/opt/bin/version_manifest.exe"));
        assert_eq!(windows.file_name, "version_manifest.log");
        assert_eq!(windows.name, "version_manifest");
    }
}
