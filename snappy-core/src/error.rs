//! Error types for snappy operations.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SnappyError>;

/// Errors raised while resolving identifiers or requesting snapshots.
///
/// Every failure is fatal for the call that produced it: a resolution that
/// hits one of these returns no partial records.
#[derive(Error, Debug)]
pub enum SnappyError {
    /// An instance does not expose the volume information needed to find
    /// its root volume.
    #[error("{0}")]
    VolumesNotFound(String),

    /// The inventory answered with a response missing data that was expected.
    #[error("Failed to retrieve instances: {0}")]
    InstancesRetrieval(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Errors coming out of the inventory transport, passed through untouched.
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

impl SnappyError {
    pub fn no_volumes(name: &str, instance_id: &str) -> Self {
        SnappyError::VolumesNotFound(format!(
            "No volumes found on the instance {} ({})",
            name, instance_id
        ))
    }

    pub fn root_volume_not_found(name: &str, instance_id: &str) -> Self {
        SnappyError::VolumesNotFound(format!(
            "Root volume not found on instance: {} ({})",
            name, instance_id
        ))
    }

    pub fn is_volumes_not_found(&self) -> bool {
        matches!(self, SnappyError::VolumesNotFound(_))
    }
}

impl From<serde_yaml_ng::Error> for SnappyError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        SnappyError::Serialization(err.to_string())
    }
}
