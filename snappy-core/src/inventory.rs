//! The remote inventory seam.
//!
//! Resolution and snapshot requests talk to the cloud only through the
//! [`Inventory`] trait. The shapes below carry just the fields snappy reads
//! from a describe-instances or describe-volumes response.

use crate::error::Result;
use crate::model::Tag;
use std::fmt;

/// Which attribute a describe-instances lookup filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceFilter {
    InstanceId,
    PrivateIpAddress,
    NameTag,
}

impl InstanceFilter {
    /// Filter name as the EC2 API expects it.
    pub fn as_filter_name(&self) -> &'static str {
        match self {
            InstanceFilter::InstanceId => "instance-id",
            InstanceFilter::PrivateIpAddress => "private-ip-address",
            InstanceFilter::NameTag => "tag:Name",
        }
    }
}

impl fmt::Display for InstanceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter_name())
    }
}

/// An instance as returned by a describe-instances lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInstance {
    pub instance_id: String,
    pub private_ipv4: Option<String>,
    pub tags: Option<Vec<Tag>>,
    pub root_device_name: Option<String>,
    pub block_device_mappings: Option<Vec<BlockDeviceMapping>>,
}

impl RawInstance {
    /// Value of the `Name` tag, if the instance carries one.
    pub fn name_tag(&self) -> Option<&str> {
        self.tags
            .as_deref()?
            .iter()
            .find(|tag| tag.key == "Name")
            .map(|tag| tag.value.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockDeviceMapping {
    pub device_name: String,
    /// EBS volume backing the device; `None` for non-EBS devices.
    pub volume_id: Option<String>,
}

/// A volume as returned by a describe-volumes lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawVolume {
    pub volume_id: String,
    pub attachments: Option<Vec<VolumeAttachment>>,
}

impl RawVolume {
    /// Instance ID of the first attachment, if any.
    pub fn attached_instance(&self) -> Option<&str> {
        self.attachments
            .as_deref()?
            .first()?
            .instance_id
            .as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeAttachment {
    pub instance_id: Option<String>,
}

/// Remote inventory and compute operations used by snappy.
///
/// Implementations return results in the order the remote API produced
/// them and report transport failures as [`crate::SnappyError::Transport`].
pub trait Inventory {
    /// Describe the instances whose `filter` attribute matches any of `values`.
    fn describe_instances(&self, filter: InstanceFilter, values: &[String])
        -> Result<Vec<RawInstance>>;

    /// Describe the volumes with the given IDs.
    fn describe_volumes(&self, volume_ids: &[String]) -> Result<Vec<RawVolume>>;

    /// Request a snapshot of `volume_id` tagged with `tags`, returning the
    /// new snapshot's ID.
    fn create_snapshot(&self, volume_id: &str, description: &str, tags: &[Tag])
        -> Result<String>;
}
