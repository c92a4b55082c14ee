use std::path::PathBuf;

use errmsg::{ConfigError, ErrmsgConfig};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::scenario::{Scenario, ScenarioError};

const CONFIG_ENV_VAR: &str = "ERRMSG_CONFIG";
const DURATION_ENV_VAR: &str = "ERRMSG_DURATION";

pub(crate) const DEFAULT_SCENARIO: &str = include_str!("../../scenarios/default.json");

pub(crate) struct AppWiring {
    pub(crate) config: ErrmsgConfig,
    pub(crate) scenario: Scenario,
}

#[derive(Debug, Error)]
pub(crate) enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
}

pub(crate) fn build_app() -> Result<AppWiring, DemoError> {
    init_tracing();
    info!("=== errmsg demo startup ===");

    let config_path = std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from);
    let config = resolve_config(
        config_path,
        std::env::var(DURATION_ENV_VAR).ok().as_deref(),
    )?;

    let scenario = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            info!(path = %path.display(), "scenario_loading");
            Scenario::load(&path)?
        }
        None => {
            info!("scenario_builtin");
            Scenario::parse(DEFAULT_SCENARIO)?
        }
    };
    info!(
        steps = scenario.steps.len(),
        errmsg_duration = config.errmsg_duration,
        "app_wired"
    );

    Ok(AppWiring { config, scenario })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn resolve_config(
    path: Option<PathBuf>,
    duration_override: Option<&str>,
) -> Result<ErrmsgConfig, ConfigError> {
    let mut config = match path {
        Some(path) => ErrmsgConfig::load(&path)?,
        None => ErrmsgConfig::default(),
    };
    if let Some(value) = duration_override {
        match value.trim().parse::<u32>() {
            Ok(units) => config.errmsg_duration = units,
            Err(_) => warn!(
                env_var = DURATION_ENV_VAR,
                value,
                fallback = config.errmsg_duration,
                "invalid errmsg duration; falling back to config"
            ),
        }
    }
    Ok(config)
}
