use std::fs;
use std::path::Path;

use anyhow::Result;
use campus_wififlow::loader::load_snapshots;
use campus_wififlow::pipeline::{self, EdgeFlow, PipelineOptions};

fn write_snapshot(dir: &Path, stamp: &str, clients: &[(&str, &str)]) {
    // ---
    let records: Vec<serde_json::Value> = clients
        .iter()
        .map(|(mac, ap)| serde_json::json!({ "macaddr": mac, "associated_device_name": ap, "band": 5 }))
        .collect();
    let name = format!("client-info-{stamp}.json");
    fs::write(dir.join(name), serde_json::to_string(&records).unwrap()).unwrap();
}

fn run_dir(dir: &Path) -> Result<pipeline::PipelineOutput> {
    // ---
    let mut table = load_snapshots(dir, "client-info-*.json")?.table;
    table.sort_by_timestamp();
    Ok(pipeline::run(&table, &PipelineOptions::default()))
}

#[test]
fn two_snapshot_scenario_end_to_end() -> Result<()> {
    // ---
    let dir = tempfile::tempdir()?;
    write_snapshot(dir.path(), "2025-04-03T10_00_00+02_00", &[("A1:B2", "AP-CIEN-01")]);
    write_snapshot(dir.path(), "2025-04-03T10_05_00+02_00", &[("A1:B2", "AP-VET-02")]);

    let output = run_dir(dir.path())?;
    assert_eq!(output.movements.len(), 1);
    assert_eq!(output.flows.frame_count(), 1);

    let frame = output.flows.frame(0).expect("one frame");
    assert_eq!(
        frame.edges,
        vec![EdgeFlow {
            origin: "CIEN".into(),
            destination: "VET".into(),
            devices: 1,
        }]
    );
    assert_eq!(frame.occupancy.get("VET"), Some(&1));
    assert_eq!(frame.occupancy.len(), 1);
    Ok(())
}

#[test]
fn files_are_loaded_out_of_order_and_sorted() -> Result<()> {
    // ---
    let dir = tempfile::tempdir()?;
    // Names sort lexically in a different order than their instants
    // 09:00+02:00 is 07:00Z, before 08:00Z
    write_snapshot(dir.path(), "2025-04-03T09_00_00+02_00", &[("a", "AP-CIEN-01")]);
    write_snapshot(dir.path(), "2025-04-03T08_00_00+00_00", &[("a", "AP-VET-01")]);

    let output = run_dir(dir.path())?;
    assert_eq!(output.movements.len(), 1);
    assert_eq!(output.movements[0].origin_access_point, "AP-CIEN-01");
    assert_eq!(output.movements[0].destination_access_point, "AP-VET-01");
    Ok(())
}

#[test]
fn broken_file_does_not_stop_the_run() -> Result<()> {
    // ---
    let dir = tempfile::tempdir()?;
    write_snapshot(dir.path(), "2025-04-03T10_00_00+02_00", &[("a", "AP-CIEN-01"), ("b", "AP-ETSE-01")]);
    fs::write(dir.path().join("client-info-2025-04-03T10_05_00+02_00.json"), "{oops")?;
    write_snapshot(dir.path(), "2025-04-03T10_10_00+02_00", &[("a", "AP-VET-01"), ("b", "AP-ETSE-02")]);

    let report = load_snapshots(dir.path(), "client-info-*.json")?;
    assert_eq!(report.files_found, 3);
    assert_eq!(report.files_skipped, 1);
    assert_eq!(report.table.len(), 4);

    let output = run_dir(dir.path())?;
    // b stays in ETSE: a movement between access points, not buildings
    assert_eq!(output.movements.len(), 2);
    assert_eq!(output.cross_building.len(), 1);
    Ok(())
}

#[test]
fn empty_directory_does_not_fault() -> Result<()> {
    // ---
    let dir = tempfile::tempdir()?;
    let output = run_dir(dir.path())?;
    assert!(output.movements.is_empty());
    assert!(output.flows.is_empty());
    assert!(output.flows.frame(0).is_none());
    Ok(())
}

#[test]
fn pipeline_is_idempotent() -> Result<()> {
    // ---
    let dir = tempfile::tempdir()?;
    write_snapshot(
        dir.path(),
        "2025-04-03T10_00_00+02_00",
        &[("a", "AP-CIEN-01"), ("b", "AP-VET-01"), ("c", "AP-MED-01")],
    );
    write_snapshot(
        dir.path(),
        "2025-04-03T10_05_00+02_00",
        &[("a", "AP-VET-01"), ("b", "AP-CIEN-02"), ("c", "AP-CIEN-03")],
    );
    write_snapshot(
        dir.path(),
        "2025-04-03T10_10_00+02_00",
        &[("a", "AP-ETSE-01"), ("b", "AP-CIEN-02"), ("c", "AP-VET-09")],
    );

    let first = run_dir(dir.path())?;
    let second = run_dir(dir.path())?;
    assert_eq!(first.flows, second.flows);
    assert_eq!(first.flows.frame_count(), 2);

    for index in 0..first.flows.frame_count() {
        let frame = first.flows.frame(index).expect("frame in range");
        assert!(frame.edges.iter().all(|e| e.devices >= 1 && e.origin != e.destination));
    }
    Ok(())
}
