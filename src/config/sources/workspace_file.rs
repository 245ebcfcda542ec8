//! Workspace config file source: ./stackwright.toml or an explicit --config path

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::{File, FileFormat};
use std::path::{Path, PathBuf};

pub const WORKSPACE_CONFIG_FILE: &str = "stackwright.toml";

/// Default workspace config path under `workspace_root`.
pub fn workspace_config_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(WORKSPACE_CONFIG_FILE)
}

/// Add the workspace config file to the builder.
///
/// An explicit path must exist; the implicit workspace file is optional.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
    explicit: bool,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if explicit && !path.is_file() {
        return Err(ConfigError::NotFound(format!(
            "configuration file {}",
            path.display()
        )));
    }
    if !path.is_file() {
        return Ok(builder);
    }
    Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(true)))
}
