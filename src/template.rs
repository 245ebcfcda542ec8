//! Template producers.
//!
//! A template producer supplies a stack name, its parameters and an opaque
//! template body. Bodies are passed through verbatim; nothing here parses or
//! validates them.

use crate::error::AppError;
use crate::stack::StackParameters;
use std::path::{Path, PathBuf};

pub trait TemplateSource {
    fn name(&self) -> &str;
    fn parameters(&self) -> &StackParameters;
    fn template_body(&self) -> &str;
}

/// Template body read from a file on disk.
#[derive(Debug, Clone)]
pub struct FileTemplate {
    name: String,
    path: PathBuf,
    body: String,
    parameters: StackParameters,
}

impl FileTemplate {
    pub fn load(
        name: impl Into<String>,
        path: &Path,
        parameters: StackParameters,
    ) -> Result<Self, AppError> {
        let body = std::fs::read_to_string(path).map_err(|e| {
            AppError::TemplateError(format!("Failed to read template {}: {}", path.display(), e))
        })?;
        if body.trim().is_empty() {
            return Err(AppError::TemplateError(format!(
                "Template {} is empty",
                path.display()
            )));
        }
        Ok(Self {
            name: name.into(),
            path: path.to_path_buf(),
            body,
            parameters,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TemplateSource for FileTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> &StackParameters {
        &self.parameters
    }

    fn template_body(&self) -> &str {
        &self.body
    }
}

/// Parse a `KEY=VALUE` pair. The value may itself contain `=`.
pub fn parse_parameter(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid parameter '{}' (expected KEY=VALUE)", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid parameter '{}' (empty key)", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Collect `KEY=VALUE` pairs into ordered parameters. Duplicate keys are
/// rejected rather than silently overwritten.
pub fn parse_parameters<S: AsRef<str>>(pairs: &[S]) -> Result<StackParameters, AppError> {
    let mut params = StackParameters::new();
    for raw in pairs {
        let (key, value) = parse_parameter(raw.as_ref()).map_err(AppError::InvalidArgument)?;
        if params.insert(key.clone(), value).is_some() {
            return Err(AppError::InvalidArgument(format!(
                "parameter '{}' given more than once",
                key
            )));
        }
    }
    Ok(params)
}
