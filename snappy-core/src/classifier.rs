//! Identifier classification and resolution.
//!
//! A [`Classification`] splits raw identifiers into four buckets and
//! resolves each non-empty bucket with one inventory lookup. Records are
//! returned in a fixed bucket order: instance IDs, IPv4 addresses, names,
//! then volume IDs.

use crate::error::{Result, SnappyError};
use crate::inventory::{InstanceFilter, Inventory, RawInstance, RawVolume};
use crate::model::{IdentifierKind, InstanceRecord, NOT_APPLICABLE, NO_INSTANCE, UNNAMED};
use indexmap::IndexSet;
use tracing::{debug, trace, warn};

/// Raw identifiers partitioned by kind.
///
/// The three pattern buckets keep duplicates and input order, so a repeated
/// instance ID is looked up (and later snapshotted) once per occurrence.
/// The name bucket is a set: it holds every value that matched no pattern,
/// each exactly once. Keep this asymmetry; it decides how many values each
/// lookup sends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub volume_ids: Vec<String>,
    pub instance_ids: Vec<String>,
    pub ipv4s: Vec<String>,
    pub names: IndexSet<String>,
}

impl Classification {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classification = Classification::default();

        for value in values {
            let value = value.into();
            let kind = IdentifierKind::of(&value);
            trace!(value = %value, kind = %kind, "Classified identifier");
            match kind {
                IdentifierKind::VolumeId => classification.volume_ids.push(value),
                IdentifierKind::InstanceId => classification.instance_ids.push(value),
                IdentifierKind::Ipv4 => classification.ipv4s.push(value),
                // Set difference: a name is any remaining value, deduplicated
                IdentifierKind::Name => {
                    classification.names.insert(value);
                }
            }
        }

        classification
    }

    pub fn is_empty(&self) -> bool {
        self.volume_ids.is_empty()
            && self.instance_ids.is_empty()
            && self.ipv4s.is_empty()
            && self.names.is_empty()
    }

    /// Resolve every bucket to instance records.
    ///
    /// Lookups run one after another and the first failure aborts the whole
    /// resolution.
    pub fn resolve(&self, inventory: &dyn Inventory) -> Result<Vec<InstanceRecord>> {
        debug!(
            volume_ids = self.volume_ids.len(),
            instance_ids = self.instance_ids.len(),
            ipv4s = self.ipv4s.len(),
            names = self.names.len(),
            "Resolving identifiers"
        );

        let mut records = Vec::new();

        if !self.instance_ids.is_empty() {
            records.extend(lookup_instances(
                inventory,
                InstanceFilter::InstanceId,
                &self.instance_ids,
            )?);
        }

        if !self.ipv4s.is_empty() {
            records.extend(lookup_instances(
                inventory,
                InstanceFilter::PrivateIpAddress,
                &self.ipv4s,
            )?);
        }

        if !self.names.is_empty() {
            let names: Vec<String> = self.names.iter().cloned().collect();
            records.extend(lookup_instances(
                inventory,
                InstanceFilter::NameTag,
                &names,
            )?);
        }

        if !self.volume_ids.is_empty() {
            debug!(count = self.volume_ids.len(), "Describing volumes");
            let volumes = inventory.describe_volumes(&self.volume_ids)?;
            records.extend(volumes.iter().map(record_from_volume));
        }

        Ok(records)
    }
}

/// Partition raw identifiers without touching the inventory.
pub fn classify<I, S>(values: I) -> Classification
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Classification::new(values)
}

/// Classify `values` and resolve them through `inventory`.
pub fn resolve<I, S>(values: I, inventory: &dyn Inventory) -> Result<Vec<InstanceRecord>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Classification::new(values).resolve(inventory)
}

fn lookup_instances(
    inventory: &dyn Inventory,
    filter: InstanceFilter,
    values: &[String],
) -> Result<Vec<InstanceRecord>> {
    debug!(filter = %filter, count = values.len(), "Describing instances");
    let instances = inventory.describe_instances(filter, values)?;
    records_from_instances(&instances)
}

/// Turn described instances into records, failing on the first instance
/// whose root volume cannot be determined.
pub fn records_from_instances(instances: &[RawInstance]) -> Result<Vec<InstanceRecord>> {
    let mut records = Vec::with_capacity(instances.len());
    for instance in instances {
        if let Some(record) = record_from_instance(instance)? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Resolve the root volume of one instance.
///
/// Returns `Ok(None)` for an instance that declares no root device; such an
/// instance has nothing to snapshot and is skipped.
pub fn record_from_instance(instance: &RawInstance) -> Result<Option<InstanceRecord>> {
    let name = instance.name_tag().unwrap_or(UNNAMED);
    let id = instance.instance_id.as_str();

    let mappings = match instance.block_device_mappings.as_deref() {
        Some(mappings) if !mappings.is_empty() => mappings,
        _ => return Err(SnappyError::no_volumes(name, id)),
    };

    let Some(root_device) = instance.root_device_name.as_deref() else {
        warn!(instance_id = %id, name = %name, "Instance has no root device, skipping");
        return Ok(None);
    };

    let volume_id = mappings
        .iter()
        .find(|mapping| mapping.device_name == root_device)
        .and_then(|mapping| mapping.volume_id.clone())
        .ok_or_else(|| SnappyError::root_volume_not_found(name, id))?;

    Ok(Some(InstanceRecord {
        volume_id,
        instance_id: id.to_string(),
        ipv4: instance
            .private_ipv4
            .clone()
            .unwrap_or_else(|| NOT_APPLICABLE.to_string()),
        name: name.to_string(),
    }))
}

/// Describe a volume looked up directly by ID.
pub fn record_from_volume(volume: &RawVolume) -> InstanceRecord {
    InstanceRecord {
        volume_id: volume.volume_id.clone(),
        instance_id: volume
            .attached_instance()
            .unwrap_or(NO_INSTANCE)
            .to_string(),
        ipv4: NOT_APPLICABLE.to_string(),
        name: NOT_APPLICABLE.to_string(),
    }
}
