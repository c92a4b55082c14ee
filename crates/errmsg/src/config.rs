use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ErrmsgConfig {
    /// Popup lifetime in duration units. Zero suppresses everything but
    /// critical messages.
    pub errmsg_duration: u32,
    /// Gap between an anchored popup and the screen edge.
    pub edge_margin: i32,
    /// Gap kept below the toolbar and above the status bar.
    pub bar_clearance: i32,
    pub panel_width: i32,
    pub text_padding: i32,
    pub caption_height: i32,
    pub face_width: i32,
    pub face_height: i32,
}

impl Default for ErrmsgConfig {
    fn default() -> Self {
        Self {
            errmsg_duration: 5,
            edge_margin: 20,
            bar_clearance: 20,
            panel_width: 240,
            text_padding: 4,
            caption_height: 14,
            face_width: 92,
            face_height: 119,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config json at {path}: {message}")]
    Parse { path: String, message: String },
    #[error("invalid config value {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl ErrmsgConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let config = serde_path_to_error::deserialize::<_, ErrmsgConfig>(&mut deserializer)
            .map_err(|error| {
                let path = error.path().to_string();
                ConfigError::Parse {
                    path: if path.is_empty() { ".".to_string() } else { path },
                    message: error.into_inner().to_string(),
                }
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.panel_width <= 2 * self.text_padding {
            return Err(ConfigError::Invalid {
                field: "panel_width",
                reason: "must exceed twice the text padding",
            });
        }
        let non_negative = [
            ("edge_margin", self.edge_margin),
            ("bar_clearance", self.bar_clearance),
            ("text_padding", self.text_padding),
            ("caption_height", self.caption_height),
            ("face_width", self.face_width),
            ("face_height", self.face_height),
        ];
        for (field, value) in non_negative {
            if value < 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must not be negative",
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = ErrmsgConfig::from_json_str("{}").expect("config");
        assert_eq!(config, ErrmsgConfig::default());
    }

    #[test]
    fn partial_object_overrides_named_fields() {
        let config =
            ErrmsgConfig::from_json_str(r#"{"errmsg_duration": 0, "edge_margin": 8}"#)
                .expect("config");
        assert_eq!(config.errmsg_duration, 0);
        assert_eq!(config.edge_margin, 8);
        assert_eq!(config.panel_width, 240);
    }

    #[test]
    fn type_errors_report_field_path() {
        let error = ErrmsgConfig::from_json_str(r#"{"errmsg_duration": "long"}"#)
            .expect_err("should fail");
        match error {
            ConfigError::Parse { path, .. } => assert_eq!(path, "errmsg_duration"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error =
            ErrmsgConfig::from_json_str(r#"{"errmsg_duraton": 3}"#).expect_err("should fail");
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn narrow_panel_is_invalid() {
        let error = ErrmsgConfig::from_json_str(r#"{"panel_width": 8, "text_padding": 4}"#)
            .expect_err("should fail");
        assert!(matches!(
            error,
            ConfigError::Invalid {
                field: "panel_width",
                ..
            }
        ));
    }

    #[test]
    fn negative_margin_is_invalid() {
        let error =
            ErrmsgConfig::from_json_str(r#"{"edge_margin": -1}"#).expect_err("should fail");
        assert!(matches!(
            error,
            ConfigError::Invalid {
                field: "edge_margin",
                ..
            }
        ));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"errmsg_duration": 9}}"#).expect("write");
        let config = ErrmsgConfig::load(file.path()).expect("config");
        assert_eq!(config.errmsg_duration, 9);
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = ErrmsgConfig::load(&dir.path().join("missing.json")).expect_err("missing");
        assert!(matches!(error, ConfigError::Read { .. }));
    }
}
