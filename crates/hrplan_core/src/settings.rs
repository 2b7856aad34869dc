//! User-tunable settings.
//!
//! # Responsibility
//! - Hold labels, thresholds and logging defaults used by services.
//! - Load them from an optional YAML file.
//!
//! # Invariants
//! - Every field has a default, so partial files are valid.
//! - A missing settings file is not an error.

use crate::aggregate::LoadThresholds;
use crate::logging::default_log_level;
use crate::model::{NEW_MEMBER_NAME, NEW_THEME_NAME};
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// File extension of plan documents.
pub const DOCUMENT_EXTENSION: &str = "hrplan";

/// Settings errors.
#[derive(Debug)]
pub enum SettingsError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_yaml::Error),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read settings `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid settings: {err}"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for SettingsError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Placeholder name for added themes.
    pub new_theme_name: String,
    /// Placeholder name for added members.
    pub new_member_name: String,
    /// Base file name for created documents (`Untitled`, `Untitled 1`, ...).
    pub untitled_basename: String,
    /// Member subtotal above this is tagged overloaded.
    pub overload_threshold: f64,
    /// Non-zero member subtotal below this is tagged underutilized.
    pub underutilized_threshold: f64,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            new_theme_name: NEW_THEME_NAME.to_string(),
            new_member_name: NEW_MEMBER_NAME.to_string(),
            untitled_basename: "Untitled".to_string(),
            overload_threshold: 1.0,
            underutilized_threshold: 0.5,
            log_level: default_log_level().to_string(),
        }
    }
}

impl Settings {
    /// Parses settings from YAML text; blank text yields defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, SettingsError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Loads settings from `path`, or defaults when the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let settings = Self::from_yaml_str(&text)?;
                info!("event=settings_load module=settings status=ok source=file");
                Ok(settings)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("event=settings_load module=settings status=ok source=default");
                Ok(Self::default())
            }
            Err(source) => Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn thresholds(&self) -> LoadThresholds {
        LoadThresholds {
            overload: self.overload_threshold,
            underutilized: self.underutilized_threshold,
        }
    }

    /// Candidate file name for the `attempt`-th creation probe.
    ///
    /// Attempt `0` is `Untitled.hrplan`, attempt `n` is `Untitled n.hrplan`.
    pub fn untitled_file_name(&self, attempt: usize) -> String {
        if attempt == 0 {
            format!("{}.{DOCUMENT_EXTENSION}", self.untitled_basename)
        } else {
            format!("{} {attempt}.{DOCUMENT_EXTENSION}", self.untitled_basename)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Settings;

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let settings = Settings::from_yaml_str("overload_threshold: 1.2\n").unwrap();
        assert_eq!(settings.overload_threshold, 1.2);
        assert_eq!(settings.underutilized_threshold, 0.5);
        assert_eq!(settings.new_theme_name, "新規テーマ");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_or_default(dir.path().join("hrplan.yaml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn untitled_names_follow_probe_order() {
        let settings = Settings::default();
        assert_eq!(settings.untitled_file_name(0), "Untitled.hrplan");
        assert_eq!(settings.untitled_file_name(2), "Untitled 2.hrplan");
    }
}
