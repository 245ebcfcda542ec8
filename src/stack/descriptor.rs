//! Stack descriptors: the name, opaque template body and ordered parameters
//! handed to the orchestrator.

use crate::error::StackError;
use crate::template::TemplateSource;
use serde::{Deserialize, Serialize};

/// Ordered key/value parameters. Keys are unique; re-inserting a key replaces
/// its value in place and keeps the original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackParameters {
    entries: Vec<(String, String)>,
}

impl StackParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StackParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = StackParameters::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// A stack to apply. Never mutated by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackDescriptor {
    name: String,
    template_body: String,
    parameters: StackParameters,
}

impl StackDescriptor {
    pub fn new(
        name: impl Into<String>,
        template_body: impl Into<String>,
        parameters: StackParameters,
    ) -> Result<Self, StackError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StackError::InvalidDescriptor(
                "stack name cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            name,
            template_body: template_body.into(),
            parameters,
        })
    }

    /// Build a descriptor from a template producer.
    pub fn from_source<T: TemplateSource + ?Sized>(source: &T) -> Result<Self, StackError> {
        Self::new(
            source.name(),
            source.template_body(),
            source.parameters().clone(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template_body(&self) -> &str {
        &self.template_body
    }

    pub fn parameters(&self) -> &StackParameters {
        &self.parameters
    }
}
