//! Resolve identifiers given on the command line and snapshot their root volumes.
//!
//! ```text
//! SNAPPY_CONFIG=snappy.yaml LOG_LEVEL=debug \
//!     cargo run -p snappy-ec2 --example snapshot_volumes -- i-0123456789abcdef0 web-1 10.0.0.5
//! ```

use anyhow::Result;
use snappy_core::{resolve, SnappyConfig, SnapshotRequester};
use snappy_ec2::Ec2Inventory;
use std::path::PathBuf;
use tracing::info;

fn main() -> Result<()> {
    // Keep the guard alive so file logs are flushed on exit
    let _guard = snappy_logging::init_subscriber();

    let identifiers: Vec<String> = std::env::args().skip(1).collect();
    if identifiers.is_empty() {
        anyhow::bail!("Usage: snapshot_volumes <volume-id|instance-id|ipv4|name>...");
    }

    let config_path = std::env::var("SNAPPY_CONFIG").ok().map(PathBuf::from);
    let config = SnappyConfig::load_or_default(config_path.as_deref())?;

    let inventory = Ec2Inventory::from_config(&config)?;
    let records = resolve(identifiers, &inventory)?;
    info!(count = records.len(), "Resolved volumes");

    let requester = SnapshotRequester::from_config(&inventory, &config);
    for result in requester.snapshot_all(&records, &[])? {
        info!(
            snapshot_id = %result.snapshot_id,
            volume_id = %result.volume_id,
            instance_name = %result.instance_name,
            "Snapshot started"
        );
    }

    Ok(())
}
