use crate::convert::{raw_instance, raw_volume, sdk_tag};
use aws_config::BehaviorVersion;
use aws_sdk_ec2::config::Region;
use aws_sdk_ec2::types::{Filter, ResourceType, TagSpecification};
use aws_sdk_ec2::Client;
use snappy_core::{
    InstanceFilter, Inventory, RawInstance, RawVolume, Result, SnappyConfig, SnappyError, Tag,
};
use tokio::runtime::Runtime;
use tracing::debug;

/// Inventory backed by the EC2 API.
pub struct Ec2Inventory {
    client: Client,
    runtime: Runtime,
}

impl Ec2Inventory {
    /// Build a client from `config`, falling back to the AWS default
    /// provider chain for anything it leaves unset.
    pub fn from_config(config: &SnappyConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SnappyError::Config(format!("tokio runtime init failed: {}", e)))?;

        let client = runtime.block_on(client_from_config(config));
        Ok(Self { client, runtime })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_config(&SnappyConfig::from_env())
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

async fn client_from_config(config: &SnappyConfig) -> Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }
    let shared = loader.load().await;

    let mut builder = aws_sdk_ec2::config::Builder::from(&shared);
    if let Some(url) = &config.endpoint_url {
        builder = builder.endpoint_url(url);
    }

    Client::from_conf(builder.build())
}

fn transport<E>(err: E) -> SnappyError
where
    aws_sdk_ec2::Error: From<E>,
{
    SnappyError::Transport(anyhow::Error::from(aws_sdk_ec2::Error::from(err)))
}

impl Inventory for Ec2Inventory {
    fn describe_instances(
        &self,
        filter: InstanceFilter,
        values: &[String],
    ) -> Result<Vec<RawInstance>> {
        debug!(filter = %filter, values = ?values, "ec2 describe_instances");

        let request = self.client.describe_instances().filters(
            Filter::builder()
                .name(filter.as_filter_name())
                .set_values(Some(values.to_vec()))
                .build(),
        );
        let output = self.runtime.block_on(request.send()).map_err(transport)?;

        output
            .reservations()
            .iter()
            .flat_map(|reservation| reservation.instances())
            .map(raw_instance)
            .collect()
    }

    fn describe_volumes(&self, volume_ids: &[String]) -> Result<Vec<RawVolume>> {
        debug!(volume_ids = ?volume_ids, "ec2 describe_volumes");

        let request = self
            .client
            .describe_volumes()
            .set_volume_ids(Some(volume_ids.to_vec()));
        let output = self.runtime.block_on(request.send()).map_err(transport)?;

        output.volumes().iter().map(raw_volume).collect()
    }

    fn create_snapshot(&self, volume_id: &str, description: &str, tags: &[Tag]) -> Result<String> {
        debug!(volume_id = %volume_id, tags = tags.len(), "ec2 create_snapshot");

        let tag_specification = TagSpecification::builder()
            .resource_type(ResourceType::Snapshot)
            .set_tags(Some(tags.iter().map(sdk_tag).collect()))
            .build();

        let request = self
            .client
            .create_snapshot()
            .volume_id(volume_id)
            .description(description)
            .tag_specifications(tag_specification);
        let output = self.runtime.block_on(request.send()).map_err(transport)?;

        output.snapshot_id().map(str::to_string).ok_or_else(|| {
            SnappyError::InstancesRetrieval(format!(
                "create_snapshot for {} returned no SnapshotId",
                volume_id
            ))
        })
    }
}
