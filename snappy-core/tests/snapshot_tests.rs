//! Snapshot request tests against the mock inventory.

use chrono::NaiveDate;
use snappy_core::mock::{InventoryCall, MockInventory};
use snappy_core::{InstanceRecord, SnappyConfig, SnappyError, SnapshotRequester, Tag};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
}

fn record(volume_id: &str, instance_id: &str, name: &str) -> InstanceRecord {
    InstanceRecord {
        volume_id: volume_id.to_string(),
        instance_id: instance_id.to_string(),
        ipv4: "10.0.0.5".to_string(),
        name: name.to_string(),
    }
}

#[test]
fn test_create_snapshot_sends_mandatory_tags_first() {
    let inventory = MockInventory::new();
    let requester = SnapshotRequester::with_date(&inventory, date());

    let result = requester
        .create_snapshot(
            "vol-0123456789abcdef0",
            "i-0123456789abcdef0",
            "web-1",
            &[Tag::new("Team", "platform")],
        )
        .unwrap();

    assert_eq!(result.snapshot_id, "snap-00000000000000001");
    assert_eq!(result.instance_name, "web-1");
    assert_eq!(result.volume_id, "vol-0123456789abcdef0");

    assert_eq!(
        inventory.calls(),
        vec![InventoryCall::CreateSnapshot {
            volume_id: "vol-0123456789abcdef0".to_string(),
            description: "Snapshot of i-0123456789abcdef0 taken by snappy".to_string(),
            tags: vec![
                Tag::new("Date Taken", "2024-01-31"),
                Tag::new("Instance ID", "i-0123456789abcdef0"),
                Tag::new("Instance Name", "web-1"),
                Tag::new("Team", "platform"),
            ],
        }]
    );
}

#[test]
fn test_colliding_caller_tags_are_not_dropped() {
    let inventory = MockInventory::new();
    let requester = SnapshotRequester::with_date(&inventory, date());

    requester
        .create_snapshot(
            "vol-0123456789abcdef0",
            "i-0123456789abcdef0",
            "web-1",
            &[Tag::new("Instance Name", "override")],
        )
        .unwrap();

    let calls = inventory.calls();
    let InventoryCall::CreateSnapshot { tags, .. } = &calls[0] else {
        panic!("expected a create_snapshot call");
    };

    let names: Vec<&str> = tags
        .iter()
        .filter(|tag| tag.key == "Instance Name")
        .map(|tag| tag.value.as_str())
        .collect();
    assert_eq!(tags.len(), 4);
    assert_eq!(names, vec!["web-1", "override"]);
}

#[test]
fn test_snapshot_all_keeps_record_order() {
    let inventory = MockInventory::new();
    let requester = SnapshotRequester::with_date(&inventory, date());

    let records = vec![
        record("vol-000000000000000a1", "i-0000000000000000a", "a"),
        record("vol-000000000000000b1", "None", "N/A"),
    ];

    let results = requester.snapshot_all(&records, &[]).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].volume_id, "vol-000000000000000a1");
    assert_eq!(results[1].instance_name, "N/A");
    assert_ne!(results[0].snapshot_id, results[1].snapshot_id);
}

#[test]
fn test_snapshot_failure_is_propagated() {
    let inventory = MockInventory::new().failing_snapshots();
    let requester = SnapshotRequester::with_date(&inventory, date());

    let err = requester
        .snapshot_record(&record("vol-000000000000000a1", "i-0000000000000000a", "a"), &[])
        .unwrap_err();

    assert!(matches!(err, SnappyError::Transport(_)));
    assert_eq!(
        err.to_string(),
        "mock create_snapshot failure for vol-000000000000000a1"
    );
    // No retry
    assert_eq!(inventory.call_count(), 1);
}

#[test]
fn test_snapshot_all_stops_at_first_failure() {
    let inventory = MockInventory::new().failing_snapshots();
    let requester = SnapshotRequester::new(&inventory);

    let records = vec![
        record("vol-000000000000000a1", "i-0000000000000000a", "a"),
        record("vol-000000000000000b1", "i-0000000000000000b", "b"),
    ];

    assert!(requester.snapshot_all(&records, &[]).is_err());
    assert_eq!(inventory.call_count(), 1);
}

#[test]
fn test_configured_tags_sit_between_mandatory_and_call_tags() {
    let config = SnappyConfig::from_yaml(
        "tags:\n  - key: Team\n    value: platform\n  - key: Instance ID\n    value: shadow\n",
    )
    .unwrap()
    .with_tag_pairs(["Backup=nightly"])
    .unwrap();

    let inventory = MockInventory::new();
    let requester =
        SnapshotRequester::with_date(&inventory, date()).with_default_tags(config.tags.clone());

    requester
        .create_snapshot(
            "vol-0123456789abcdef0",
            "i-0123456789abcdef0",
            "web-1",
            &[Tag::new("Team", "storage")],
        )
        .unwrap();

    let calls = inventory.calls();
    let InventoryCall::CreateSnapshot { tags, .. } = &calls[0] else {
        panic!("expected a create_snapshot call");
    };
    assert_eq!(
        tags,
        &vec![
            Tag::new("Date Taken", "2024-01-31"),
            Tag::new("Instance ID", "i-0123456789abcdef0"),
            Tag::new("Instance Name", "web-1"),
            Tag::new("Team", "platform"),
            Tag::new("Instance ID", "shadow"),
            Tag::new("Backup", "nightly"),
            Tag::new("Team", "storage"),
        ]
    );
}

#[test]
fn test_requester_from_config_applies_config_tags() {
    let config = SnappyConfig::from_yaml("tags:\n  - key: Team\n    value: platform\n").unwrap();
    let inventory = MockInventory::new();
    let requester = SnapshotRequester::from_config(&inventory, &config);

    let records = vec![
        record("vol-000000000000000a1", "i-0000000000000000a", "a"),
        record("vol-000000000000000b1", "i-0000000000000000b", "b"),
    ];
    requester.snapshot_all(&records, &[]).unwrap();

    for call in inventory.calls() {
        let InventoryCall::CreateSnapshot { tags, .. } = call else {
            panic!("expected only create_snapshot calls");
        };
        assert_eq!(tags.len(), 4);
        assert_eq!(tags[3], Tag::new("Team", "platform"));
    }
}
