//! Conversions from SDK response shapes to snappy's raw records.

use aws_sdk_ec2::types::{Instance, InstanceBlockDeviceMapping, Volume};
use snappy_core::inventory::{BlockDeviceMapping, RawInstance, RawVolume, VolumeAttachment};
use snappy_core::{Result, SnappyError, Tag};

pub fn raw_instance(instance: &Instance) -> Result<RawInstance> {
    let instance_id = instance.instance_id().ok_or_else(|| {
        SnappyError::InstancesRetrieval(
            "describe_instances returned an instance without an InstanceId".to_string(),
        )
    })?;

    Ok(RawInstance {
        instance_id: instance_id.to_string(),
        private_ipv4: instance.private_ip_address().map(str::to_string),
        tags: instance
            .tags
            .as_ref()
            .map(|tags| tags.iter().filter_map(core_tag).collect()),
        root_device_name: instance.root_device_name().map(str::to_string),
        block_device_mappings: instance
            .block_device_mappings
            .as_ref()
            .map(|mappings| mappings.iter().map(block_device_mapping).collect()),
    })
}

fn block_device_mapping(mapping: &InstanceBlockDeviceMapping) -> BlockDeviceMapping {
    BlockDeviceMapping {
        device_name: mapping.device_name().unwrap_or_default().to_string(),
        volume_id: mapping
            .ebs()
            .and_then(|ebs| ebs.volume_id())
            .map(str::to_string),
    }
}

// Keyless tags carry nothing we can match on
fn core_tag(tag: &aws_sdk_ec2::types::Tag) -> Option<Tag> {
    let key = tag.key()?;
    Some(Tag::new(key, tag.value().unwrap_or_default()))
}

pub fn raw_volume(volume: &Volume) -> Result<RawVolume> {
    let volume_id = volume.volume_id().ok_or_else(|| {
        SnappyError::InstancesRetrieval(
            "describe_volumes returned a volume without a VolumeId".to_string(),
        )
    })?;

    Ok(RawVolume {
        volume_id: volume_id.to_string(),
        attachments: volume.attachments.as_ref().map(|attachments| {
            attachments
                .iter()
                .map(|attachment| VolumeAttachment {
                    instance_id: attachment.instance_id().map(str::to_string),
                })
                .collect()
        }),
    })
}

pub fn sdk_tag(tag: &Tag) -> aws_sdk_ec2::types::Tag {
    aws_sdk_ec2::types::Tag::builder()
        .key(&tag.key)
        .value(&tag.value)
        .build()
}
