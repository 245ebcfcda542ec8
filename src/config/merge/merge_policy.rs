//! Merge rules: defaults and environment overrides.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

pub const DEFAULT_REGION: &str = "us-west-2";
pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const DEFAULT_LOCAL_ENDPOINT: &str = "http://localhost.localstack.cloud:4566";

/// Selects the environment; `production` means real AWS endpoints.
pub const ENV_ENVIRONMENT: &str = "ENV";
pub const ENV_REGION: &str = "STACKWRIGHT_REGION";
pub const ENV_PROFILE: &str = "STACKWRIGHT_PROFILE";

/// Create a Config builder with defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("aws.region", DEFAULT_REGION)?
        .set_default("aws.environment", DEFAULT_ENVIRONMENT)?
        .set_default("aws.local_endpoint", DEFAULT_LOCAL_ENDPOINT)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}

/// Apply environment overrides on top of file sources. Empty values are ignored.
pub fn apply_env<F>(
    mut builder: ConfigBuilder<DefaultState>,
    env: F,
) -> Result<ConfigBuilder<DefaultState>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let overrides = [
        (ENV_ENVIRONMENT, "aws.environment"),
        (ENV_REGION, "aws.region"),
        (ENV_PROFILE, "aws.profile"),
    ];
    for (var, key) in overrides {
        if let Some(value) = env(var).filter(|v| !v.trim().is_empty()) {
            builder = builder.set_override(key, value)?;
        }
    }
    Ok(builder)
}
