//! Core library for snappy.
//!
//! Classifies user-supplied identifiers (volume IDs, instance IDs, private
//! IPv4 addresses and instance names), resolves them to root volumes through
//! an [`Inventory`] and requests snapshots of those volumes.

pub mod classifier;
pub mod config;
pub mod error;
pub mod inventory;
pub mod matcher;
pub mod model;
pub mod snapshot;

#[cfg(feature = "test-helpers")]
pub mod mock;

// Re-export key types
pub use classifier::{classify, resolve, Classification};
pub use config::SnappyConfig;
pub use error::{Result, SnappyError};
pub use inventory::{
    BlockDeviceMapping, InstanceFilter, Inventory, RawInstance, RawVolume, VolumeAttachment,
};
pub use model::{IdentifierKind, InstanceRecord, SnapshotResult, Tag};
pub use snapshot::SnapshotRequester;
