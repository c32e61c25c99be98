//! Configuration for snappy.
//!
//! Values come from an optional YAML file; anything the file leaves out
//! falls back to the environment.

use crate::error::{Result, SnappyError};
use crate::model::Tag;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnappyConfig {
    /// AWS region for the inventory client.
    #[serde(default = "default_region")]
    pub region: Option<String>,

    /// Named AWS profile to load credentials from.
    #[serde(default = "default_profile")]
    pub profile: Option<String>,

    /// Override for the EC2 endpoint, e.g. a local emulator.
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: Option<String>,

    /// Tags added to every snapshot after the mandatory ones and before
    /// per-call tags.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn default_region() -> Option<String> {
    non_empty_env("SNAPPY_REGION").or_else(|| non_empty_env("AWS_REGION"))
}

fn default_profile() -> Option<String> {
    non_empty_env("AWS_PROFILE")
}

fn default_endpoint_url() -> Option<String> {
    non_empty_env("SNAPPY_ENDPOINT_URL")
}

impl Default for SnappyConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            profile: default_profile(),
            endpoint_url: default_endpoint_url(),
            tags: Vec::new(),
        }
    }
}

impl SnappyConfig {
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SnappyError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document means "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(content)?)
    }

    /// Load from `path` when given, otherwise from the environment only.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::from_env()),
        }
    }

    /// Append tags given as `KEY=VALUE` pairs.
    pub fn with_tag_pairs<I, S>(mut self, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pair in pairs {
            self.tags.push(Tag::parse(pair.as_ref())?);
        }
        Ok(self)
    }
}
