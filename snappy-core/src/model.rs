//! Records produced by resolution and snapshot requests.

use crate::error::{Result, SnappyError};
use crate::matcher::{is_instance_id, is_ipv4, is_volume_id};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Instance ID placeholder for a volume with no attachment.
pub const NO_INSTANCE: &str = "None";
/// Placeholder for fields a lookup path cannot provide.
pub const NOT_APPLICABLE: &str = "N/A";
/// Name placeholder for an instance without a `Name` tag.
pub const UNNAMED: &str = "-";

/// The kind of resource a raw identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    VolumeId,
    InstanceId,
    Ipv4,
    /// Whatever is left once the other three patterns have been tried.
    Name,
}

impl IdentifierKind {
    /// Classify a single value. Patterns are tried in the order
    /// volume ID, instance ID, IPv4; the first hit wins.
    pub fn of(value: &str) -> Self {
        if is_volume_id(value) {
            IdentifierKind::VolumeId
        } else if is_instance_id(value) {
            IdentifierKind::InstanceId
        } else if is_ipv4(value) {
            IdentifierKind::Ipv4
        } else {
            IdentifierKind::Name
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IdentifierKind::VolumeId => "volume-id",
            IdentifierKind::InstanceId => "instance-id",
            IdentifierKind::Ipv4 => "ipv4",
            IdentifierKind::Name => "name",
        };
        f.write_str(label)
    }
}

/// A resolved volume together with what is known about its instance.
///
/// Every field is always present; missing data is replaced by one of the
/// placeholder constants in this module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub volume_id: String,
    pub instance_id: String,
    pub ipv4: String,
    pub name: String,
}

/// Outcome of a successful snapshot request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotResult {
    pub snapshot_id: String,
    pub instance_name: String,
    pub volume_id: String,
}

/// A key/value annotation on a cloud resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parse a `Key=Value` pair. Only the first `=` separates key from
    /// value, so values may contain `=` themselves. The key is trimmed; the
    /// value is kept exactly as given.
    pub fn parse(pair: &str) -> Result<Self> {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            SnappyError::Config(format!(
                "Invalid tag '{}': expected format KEY=VALUE",
                pair
            ))
        })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(SnappyError::Config(format!(
                "Invalid tag '{}': key cannot be empty",
                pair
            )));
        }

        Ok(Tag::new(key, value))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}
