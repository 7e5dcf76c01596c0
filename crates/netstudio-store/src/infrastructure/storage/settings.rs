//! TOML-based application settings.
//!
//! Settings live in `settings.toml` inside the platform config directory:
//! - Windows:  `%APPDATA%\NetStudio\settings.toml`
//! - Linux:    `$XDG_CONFIG_HOME/netstudio/settings.toml` (or `~/.config/...`)
//! - macOS:    `~/Library/Application Support/NetStudio/settings.toml`
//!
//! ```toml
//! [storage]
//! data_dir = "/srv/netstudio"
//! purge_artifacts_on_delete = true
//!
//! [logging]
//! level = "debug"
//! ```
//!
//! Every field has a serde default, so a missing file, a missing section and
//! a missing key all behave the same way.  The network data itself never
//! lives here; `storage.data_dir` only points at it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the settings file inside the platform config directory.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform config or data directory could not be determined.
    #[error("could not determine platform {0} directory")]
    NoPlatformDir(&'static str),

    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The settings could not be serialized to TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Settings schema types ─────────────────────────────────────────────────────

/// Top-level settings stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppSettings {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where network data is stored and how deletes clean up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    /// Overrides the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Remove trained params and datasets together with a deleted network.
    #[serde(default = "default_true")]
    pub purge_artifacts_on_delete: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// `tracing` filter directive, e.g. `"info"` or `"netstudio_store=debug"`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            purge_artifacts_on_delete: default_true(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ── Settings repository ───────────────────────────────────────────────────────

/// Resolves the full path to the settings file.
///
/// # Errors
///
/// Returns [`SettingsError::NoPlatformDir`] if the config base directory
/// cannot be determined from the environment.
pub fn settings_file_path() -> Result<PathBuf, SettingsError> {
    platform_config_dir()
        .map(|dir| dir.join(SETTINGS_FILE))
        .ok_or(SettingsError::NoPlatformDir("config"))
}

/// Loads settings from the platform settings file, returning defaults if it
/// does not exist yet.
pub fn load_settings() -> Result<AppSettings, SettingsError> {
    load_settings_from(&settings_file_path()?)
}

/// Loads settings from `path`, returning defaults if the file is absent.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system errors other than "not
/// found", and [`SettingsError::Parse`] if the TOML is malformed.
pub fn load_settings_from(path: &Path) -> Result<AppSettings, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppSettings::default()),
        Err(source) => Err(SettingsError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Persists `settings` to `path`, creating the parent directory if needed.
pub fn save_settings_to(path: &Path, settings: &AppSettings) -> Result<(), SettingsError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(settings)?;
    std::fs::write(path, content).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Picks the data root: an explicit override wins, then
/// `storage.data_dir`, then the platform data directory.
///
/// # Errors
///
/// Returns [`SettingsError::NoPlatformDir`] when neither override is set and
/// the platform data directory cannot be determined.
pub fn resolve_data_dir(
    settings: &AppSettings,
    override_dir: Option<PathBuf>,
) -> Result<PathBuf, SettingsError> {
    override_dir
        .or_else(|| settings.storage.data_dir.clone())
        .or_else(platform_data_dir)
        .ok_or(SettingsError::NoPlatformDir("data"))
}

/// Platform config directory including the `NetStudio` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("NetStudio"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("netstudio"))
    }

    #[cfg(target_os = "macos")]
    {
        macos_app_support_dir()
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

/// Platform application-data directory including the `NetStudio`
/// subdirectory.
fn platform_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("NetStudio"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local").join("share"))
            })?;
        Some(base.join("netstudio"))
    }

    #[cfg(target_os = "macos")]
    {
        macos_app_support_dir()
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

#[cfg(target_os = "macos")]
fn macos_app_support_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|h| {
        PathBuf::from(h)
            .join("Library")
            .join("Application Support")
            .join("NetStudio")
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
