//! Snapshot requests for resolved volumes.

use crate::config::SnappyConfig;
use crate::error::Result;
use crate::inventory::Inventory;
use crate::model::{InstanceRecord, SnapshotResult, Tag};
use chrono::{Local, NaiveDate};
use tracing::info;

pub const DATE_TAKEN_TAG: &str = "Date Taken";
pub const INSTANCE_ID_TAG: &str = "Instance ID";
pub const INSTANCE_NAME_TAG: &str = "Instance Name";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Description attached to every snapshot of `instance_id`'s volume.
pub fn snapshot_description(instance_id: &str) -> String {
    format!("Snapshot of {} taken by snappy", instance_id)
}

/// Tags every snapshot carries regardless of what the caller asks for.
pub fn mandatory_tags(date: NaiveDate, instance_id: &str, instance_name: &str) -> Vec<Tag> {
    vec![
        Tag::new(DATE_TAKEN_TAG, date.format(DATE_FORMAT).to_string()),
        Tag::new(INSTANCE_ID_TAG, instance_id),
        Tag::new(INSTANCE_NAME_TAG, instance_name),
    ]
}

/// Issues create-snapshot requests against an inventory.
pub struct SnapshotRequester<'a> {
    inventory: &'a dyn Inventory,
    taken_on: NaiveDate,
    default_tags: Vec<Tag>,
}

impl<'a> SnapshotRequester<'a> {
    /// Requester stamping snapshots with today's local date.
    pub fn new(inventory: &'a dyn Inventory) -> Self {
        Self::with_date(inventory, Local::now().date_naive())
    }

    pub fn with_date(inventory: &'a dyn Inventory, taken_on: NaiveDate) -> Self {
        Self {
            inventory,
            taken_on,
            default_tags: Vec::new(),
        }
    }

    /// Requester dated today that adds the configured tags to every snapshot.
    pub fn from_config(inventory: &'a dyn Inventory, config: &SnappyConfig) -> Self {
        Self::new(inventory).with_default_tags(config.tags.clone())
    }

    /// Tags sent after the mandatory ones and before per-call tags.
    pub fn with_default_tags(mut self, tags: Vec<Tag>) -> Self {
        self.default_tags = tags;
        self
    }

    /// Snapshot one volume.
    ///
    /// The mandatory tags come first, then the default tags, then `tags`
    /// unchanged. Keys are not deduplicated: a caller tag named like a
    /// mandatory one is sent alongside it and the remote API decides which
    /// wins.
    pub fn create_snapshot(
        &self,
        volume_id: &str,
        instance_id: &str,
        instance_name: &str,
        tags: &[Tag],
    ) -> Result<SnapshotResult> {
        let mut all_tags = mandatory_tags(self.taken_on, instance_id, instance_name);
        all_tags.extend_from_slice(&self.default_tags);
        all_tags.extend_from_slice(tags);

        let snapshot_id = self.inventory.create_snapshot(
            volume_id,
            &snapshot_description(instance_id),
            &all_tags,
        )?;

        info!(
            snapshot_id = %snapshot_id,
            volume_id = %volume_id,
            instance_id = %instance_id,
            "Snapshot requested"
        );

        Ok(SnapshotResult {
            snapshot_id,
            instance_name: instance_name.to_string(),
            volume_id: volume_id.to_string(),
        })
    }

    pub fn snapshot_record(&self, record: &InstanceRecord, tags: &[Tag]) -> Result<SnapshotResult> {
        self.create_snapshot(&record.volume_id, &record.instance_id, &record.name, tags)
    }

    /// Snapshot every record in order, stopping at the first failure.
    pub fn snapshot_all(
        &self,
        records: &[InstanceRecord],
        tags: &[Tag],
    ) -> Result<Vec<SnapshotResult>> {
        records
            .iter()
            .map(|record| self.snapshot_record(record, tags))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mandatory_tags() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let tags = mandatory_tags(date, "i-0123456789abcdef0", "web-1");
        assert_eq!(
            tags,
            vec![
                Tag::new("Date Taken", "2024-03-09"),
                Tag::new("Instance ID", "i-0123456789abcdef0"),
                Tag::new("Instance Name", "web-1"),
            ]
        );
    }

    #[test]
    fn test_description_names_instance() {
        assert_eq!(
            snapshot_description("i-0123456789abcdef0"),
            "Snapshot of i-0123456789abcdef0 taken by snappy"
        );
    }
}
