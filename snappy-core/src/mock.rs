//! In-memory [`Inventory`] for tests.

use crate::error::{Result, SnappyError};
use crate::inventory::{InstanceFilter, Inventory, RawInstance, RawVolume};
use crate::model::Tag;
use std::cell::RefCell;
use std::collections::HashMap;

/// A call received by [`MockInventory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryCall {
    DescribeInstances {
        filter: InstanceFilter,
        values: Vec<String>,
    },
    DescribeVolumes {
        volume_ids: Vec<String>,
    },
    CreateSnapshot {
        volume_id: String,
        description: String,
        tags: Vec<Tag>,
    },
}

/// Serves canned responses and records every call it receives.
#[derive(Debug, Default)]
pub struct MockInventory {
    instances: HashMap<InstanceFilter, Vec<RawInstance>>,
    volumes: Vec<RawVolume>,
    failing_filters: Vec<InstanceFilter>,
    fail_volumes: bool,
    fail_snapshots: bool,
    calls: RefCell<Vec<InventoryCall>>,
}

impl MockInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instances returned by every lookup using `filter`.
    pub fn with_instances(mut self, filter: InstanceFilter, instances: Vec<RawInstance>) -> Self {
        self.instances.insert(filter, instances);
        self
    }

    pub fn with_volumes(mut self, volumes: Vec<RawVolume>) -> Self {
        self.volumes = volumes;
        self
    }

    /// Make lookups using `filter` fail with a transport error.
    pub fn failing_on(mut self, filter: InstanceFilter) -> Self {
        self.failing_filters.push(filter);
        self
    }

    pub fn failing_volumes(mut self) -> Self {
        self.fail_volumes = true;
        self
    }

    pub fn failing_snapshots(mut self) -> Self {
        self.fail_snapshots = true;
        self
    }

    pub fn calls(&self) -> Vec<InventoryCall> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn record(&self, call: InventoryCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl Inventory for MockInventory {
    fn describe_instances(
        &self,
        filter: InstanceFilter,
        values: &[String],
    ) -> Result<Vec<RawInstance>> {
        self.record(InventoryCall::DescribeInstances {
            filter,
            values: values.to_vec(),
        });

        if self.failing_filters.contains(&filter) {
            return Err(SnappyError::Transport(anyhow::anyhow!(
                "mock describe_instances failure for {}",
                filter
            )));
        }

        Ok(self.instances.get(&filter).cloned().unwrap_or_default())
    }

    fn describe_volumes(&self, volume_ids: &[String]) -> Result<Vec<RawVolume>> {
        self.record(InventoryCall::DescribeVolumes {
            volume_ids: volume_ids.to_vec(),
        });

        if self.fail_volumes {
            return Err(SnappyError::Transport(anyhow::anyhow!(
                "mock describe_volumes failure"
            )));
        }

        Ok(self.volumes.clone())
    }

    fn create_snapshot(&self, volume_id: &str, description: &str, tags: &[Tag]) -> Result<String> {
        let snapshot_count = self
            .calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, InventoryCall::CreateSnapshot { .. }))
            .count();

        self.record(InventoryCall::CreateSnapshot {
            volume_id: volume_id.to_string(),
            description: description.to_string(),
            tags: tags.to_vec(),
        });

        if self.fail_snapshots {
            return Err(SnappyError::Transport(anyhow::anyhow!(
                "mock create_snapshot failure for {}",
                volume_id
            )));
        }

        Ok(format!("snap-{:017x}", snapshot_count + 1))
    }
}
