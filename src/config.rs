//! Configuration System
//!
//! Layered configuration, lowest precedence first: built-in defaults, the
//! global config file, the workspace file (or `--config`), then environment
//! variables. CLI flags are applied last by the command router.

use crate::aws::EngineEndpoint;
use crate::error::AppError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod merge;
mod sources;

pub use merge::merge_policy::{
    DEFAULT_ENVIRONMENT, DEFAULT_LOCAL_ENDPOINT, DEFAULT_REGION, ENV_ENVIRONMENT, ENV_PROFILE,
    ENV_REGION,
};
pub use sources::global_file::global_config_path;
pub use sources::workspace_file::{workspace_config_path, WORKSPACE_CONFIG_FILE};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StackwrightConfig {
    #[serde(default)]
    pub aws: AwsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where and as whom engine calls are made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwsConfig {
    #[serde(default = "default_region")]
    pub region: String,

    /// `production` selects real AWS endpoints; anything else the local endpoint.
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Named profile for ambient credentials.
    #[serde(default)]
    pub profile: Option<String>,

    #[serde(default = "default_local_endpoint")]
    pub local_endpoint: String,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}

fn default_local_endpoint() -> String {
    DEFAULT_LOCAL_ENDPOINT.to_string()
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            environment: default_environment(),
            profile: None,
            local_endpoint: default_local_endpoint(),
        }
    }
}

impl AwsConfig {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn endpoint(&self) -> EngineEndpoint {
        if self.is_production() {
            EngineEndpoint::Production
        } else {
            EngineEndpoint::Override(self.local_endpoint.clone())
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.region.trim().is_empty() {
            return Err("Region cannot be empty".to_string());
        }
        if !self.is_production()
            && !(self.local_endpoint.starts_with("http://")
                || self.local_endpoint.starts_with("https://"))
        {
            return Err(format!(
                "Local endpoint must be an http(s) URL, got '{}'",
                self.local_endpoint
            ));
        }
        Ok(())
    }
}

impl StackwrightConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        self.aws
            .validate()
            .map_err(|e| AppError::ConfigError(format!("aws: {}", e)))
    }
}

/// Loads [`StackwrightConfig`] from its layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load using the process environment and the default file locations.
    ///
    /// `explicit` replaces the workspace file and must exist.
    pub fn load(
        workspace_root: &Path,
        explicit: Option<&Path>,
    ) -> Result<StackwrightConfig, AppError> {
        let global = global_config_path();
        let (workspace, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (workspace_config_path(workspace_root), false),
        };
        Self::load_from_sources(global.as_deref(), &workspace, required, |var| {
            std::env::var(var).ok()
        })
    }

    /// Load a single file over the defaults, without environment overrides.
    pub fn load_from_file(path: &Path) -> Result<StackwrightConfig, AppError> {
        Self::load_from_sources(None, path, true, |_| None)
    }

    /// Load from explicit sources. `env` stands in for the process environment.
    pub fn load_from_sources<F>(
        global: Option<&Path>,
        workspace: &Path,
        workspace_required: bool,
        env: F,
    ) -> Result<StackwrightConfig, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder, global)?;
        let builder =
            sources::workspace_file::add_to_builder(builder, workspace, workspace_required)?;
        let builder = merge::merge_policy::apply_env(builder, env)?;

        let config: StackwrightConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
