use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use errmsg::message::MAX_TEXT_REF_STACK;
use errmsg::{Severity, MAX_COMPANIES, MAX_PARAMS};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    #[serde(default)]
    pub screen: ScreenDef,
    #[serde(default)]
    pub strings: BTreeMap<u32, StringDef>,
    #[serde(default)]
    pub companies: Vec<CompanyDef>,
    #[serde(default)]
    pub content_sources: Vec<ContentSourceDef>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ScreenDef {
    pub width: u32,
    pub height: u32,
}

impl Default for ScreenDef {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct StringDef {
    pub text: String,
    #[serde(default)]
    pub params: usize,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CompanyDef {
    pub id: u8,
    pub colour: [u8; 4],
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ContentSourceDef {
    pub grf_id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TextRefDef {
    pub grf_id: u32,
    pub values: Vec<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub(crate) enum Step {
    SetNum {
        slot: usize,
        value: u64,
    },
    SetStr {
        slot: usize,
        value: String,
    },
    Show {
        #[serde(default)]
        summary: Option<u32>,
        #[serde(default)]
        detail: Option<u32>,
        #[serde(default)]
        extra: Option<u32>,
        severity: Severity,
        #[serde(default)]
        x: i32,
        #[serde(default)]
        y: i32,
        #[serde(default)]
        text_ref: Option<TextRefDef>,
    },
    Schedule {
        summary: u32,
        severity: Severity,
        #[serde(default)]
        duration: u32,
        #[serde(default)]
        values: Vec<u64>,
    },
    CommandError {
        #[serde(default)]
        summary: Option<u32>,
        #[serde(default)]
        detail: Option<u32>,
        #[serde(default)]
        extra: Option<u32>,
        #[serde(default)]
        x: i32,
        #[serde(default)]
        y: i32,
        #[serde(default)]
        text_ref: Option<TextRefDef>,
    },
    Tick {
        ms: u32,
    },
    RightClick,
    Hide,
    HideCritical,
    ShowFirst,
    RemoveCompany {
        id: u8,
    },
    ClearAll,
}

#[derive(Debug, Error)]
pub(crate) enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse scenario json at {path}: {message}")]
    Parse { path: String, message: String },
    #[error("validation failed at {path}: {message}")]
    Invalid { path: String, message: String },
}

impl Scenario {
    pub(crate) fn load(path: &Path) -> Result<Self, ScenarioError> {
        let raw = fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw)
    }

    pub(crate) fn parse(raw: &str) -> Result<Self, ScenarioError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let scenario = serde_path_to_error::deserialize::<_, Scenario>(&mut deserializer)
            .map_err(|error| {
                let path = error.path().to_string();
                ScenarioError::Parse {
                    path: if path.is_empty() { ".".to_string() } else { path },
                    message: error.into_inner().to_string(),
                }
            })?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(invalid("screen", "screen must not be empty"));
        }

        for (index, company) in self.companies.iter().enumerate() {
            check_company(&format!("companies[{index}].id"), company.id)?;
        }

        let grf_ids: HashSet<u32> = self.content_sources.iter().map(|s| s.grf_id).collect();
        for (index, step) in self.steps.iter().enumerate() {
            let path = format!("steps[{index}]");
            match step {
                Step::SetNum { slot, .. } | Step::SetStr { slot, .. } => {
                    if *slot >= MAX_PARAMS {
                        return Err(expected_actual(
                            &format!("{path}.slot"),
                            format!("< {MAX_PARAMS}"),
                            slot,
                        ));
                    }
                }
                Step::Show {
                    text_ref: Some(text_ref),
                    ..
                }
                | Step::CommandError {
                    text_ref: Some(text_ref),
                    ..
                } => {
                    if !grf_ids.contains(&text_ref.grf_id) {
                        return Err(invalid(
                            &format!("{path}.text_ref.grf_id"),
                            format!("unknown content source {:08X}", text_ref.grf_id),
                        ));
                    }
                    if text_ref.values.len() > MAX_TEXT_REF_STACK {
                        return Err(expected_actual(
                            &format!("{path}.text_ref.values"),
                            format!("at most {MAX_TEXT_REF_STACK} values"),
                            text_ref.values.len(),
                        ));
                    }
                }
                Step::Schedule { values, .. } if values.len() > MAX_PARAMS => {
                    return Err(expected_actual(
                        &format!("{path}.values"),
                        format!("at most {MAX_PARAMS} values"),
                        values.len(),
                    ));
                }
                Step::RemoveCompany { id } => check_company(&format!("{path}.id"), *id)?,
                _ => {}
            }
        }
        Ok(())
    }
}

fn check_company(path: &str, id: u8) -> Result<(), ScenarioError> {
    if id >= MAX_COMPANIES {
        return Err(expected_actual(path, format!("< {MAX_COMPANIES}"), id));
    }
    Ok(())
}

fn invalid(path: &str, message: impl Into<String>) -> ScenarioError {
    ScenarioError::Invalid {
        path: path.to_string(),
        message: message.into(),
    }
}

fn expected_actual(path: &str, expected: impl Display, actual: impl Display) -> ScenarioError {
    invalid(path, format!("expected {expected}, got {actual}"))
}
