//! Movement detection between adjacent snapshots.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::models::{ClientRecord, Movement, SnapshotTable, SnapshotTime};
use crate::pipeline::timeframe::consecutive_pairs;

// ---

/// How repeated rows for the same device within one snapshot are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Join every row; duplicates produce a cross-product of movements.
    #[default]
    Preserve,
    /// Keep only the first row per (device, snapshot) before joining.
    FirstPerSnapshot,
}

/// Detect every access point change between temporally adjacent snapshots.
///
/// Devices absent from either snapshot of a pair are not joined. Output is
/// ordered by timeframe, then by the row order of the earlier snapshot.
pub fn detect_movements(table: &SnapshotTable, policy: DuplicatePolicy) -> Vec<Movement> {
    // ---
    let snapshots = group_by_timestamp(table.records(), policy);
    let timestamps: Vec<SnapshotTime> = snapshots.keys().copied().collect();

    let mut movements = Vec::new();
    for frame in consecutive_pairs(&timestamps) {
        let (Some(before), Some(after)) = (snapshots.get(&frame.start), snapshots.get(&frame.end))
        else {
            continue;
        };

        let found = join_snapshots(before, after);
        debug!(
            "Snapshot pair {} -> {}: {} movements",
            frame.start,
            frame.end,
            found.len()
        );
        movements.extend(found);
    }
    movements
}

fn group_by_timestamp(
    records: &[ClientRecord],
    policy: DuplicatePolicy,
) -> BTreeMap<SnapshotTime, Vec<&ClientRecord>> {
    // ---
    let mut snapshots: BTreeMap<SnapshotTime, Vec<&ClientRecord>> = BTreeMap::new();
    let mut seen: HashSet<(SnapshotTime, &str)> = HashSet::new();

    for record in records {
        if policy == DuplicatePolicy::FirstPerSnapshot
            && !seen.insert((record.timestamp, record.device_id.as_str()))
        {
            continue;
        }
        snapshots.entry(record.timestamp).or_default().push(record);
    }
    snapshots
}

/// Inner join on device id, keeping pairs whose access point changed.
fn join_snapshots(before: &[&ClientRecord], after: &[&ClientRecord]) -> Vec<Movement> {
    // ---
    let mut by_device: HashMap<&str, Vec<&ClientRecord>> = HashMap::new();
    for &record in after {
        by_device.entry(record.device_id.as_str()).or_default().push(record);
    }

    let mut movements = Vec::new();
    for origin in before {
        let Some(destinations) = by_device.get(origin.device_id.as_str()) else {
            continue;
        };
        for destination in destinations {
            if origin.access_point == destination.access_point {
                continue;
            }
            movements.push(Movement {
                device_id: origin.device_id.clone(),
                origin_timestamp: origin.timestamp,
                origin_access_point: origin.access_point.clone(),
                destination_timestamp: destination.timestamp,
                destination_access_point: destination.access_point.clone(),
            });
        }
    }
    movements
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::RawClientRecord;
    use chrono::{FixedOffset, TimeZone};

    fn ts(minute: u32) -> SnapshotTime {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 4, 3, 10, minute, 0)
            .unwrap()
    }

    fn record(device: &str, ap: &str, minute: u32) -> ClientRecord {
        RawClientRecord {
            device_id: device.to_string(),
            access_point: ap.to_string(),
        }
        .at(ts(minute))
    }

    fn table(records: Vec<ClientRecord>) -> SnapshotTable {
        let mut table = SnapshotTable::new(records);
        table.sort_by_timestamp();
        table
    }

    #[test]
    fn test_single_movement() {
        // ---
        let t = table(vec![
            record("A1:B2", "AP-CIEN-01", 0),
            record("A1:B2", "AP-VET-02", 5),
        ]);
        let movements = detect_movements(&t, DuplicatePolicy::Preserve);

        assert_eq!(movements.len(), 1);
        let m = &movements[0];
        assert_eq!(m.device_id, "A1:B2");
        assert_eq!(m.origin_access_point, "AP-CIEN-01");
        assert_eq!(m.destination_access_point, "AP-VET-02");
        assert_eq!(m.origin_timestamp, ts(0));
        assert_eq!(m.destination_timestamp, ts(5));
    }

    #[test]
    fn test_same_access_point_is_not_a_movement() {
        // ---
        let t = table(vec![
            record("A1:B2", "AP-CIEN-01", 0),
            record("A1:B2", "AP-CIEN-01", 5),
        ]);
        assert!(detect_movements(&t, DuplicatePolicy::Preserve).is_empty());
    }

    #[test]
    fn test_absent_devices_are_not_joined() {
        // ---
        let t = table(vec![
            record("gone", "AP-CIEN-01", 0),
            record("new", "AP-VET-01", 5),
        ]);
        assert!(detect_movements(&t, DuplicatePolicy::Preserve).is_empty());
    }

    #[test]
    fn test_zero_or_one_snapshot() {
        // ---
        assert!(detect_movements(&SnapshotTable::default(), DuplicatePolicy::Preserve).is_empty());

        let t = table(vec![record("a", "AP-CIEN-01", 0), record("b", "AP-VET-01", 0)]);
        assert!(detect_movements(&t, DuplicatePolicy::Preserve).is_empty());
    }

    #[test]
    fn test_only_adjacent_snapshots_are_compared() {
        // ---
        // a: CIEN -> CIEN -> VET; only the second pair is a movement
        let t = table(vec![
            record("a", "AP-CIEN-01", 0),
            record("a", "AP-CIEN-01", 5),
            record("a", "AP-VET-01", 10),
        ]);
        let movements = detect_movements(&t, DuplicatePolicy::Preserve);
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].origin_timestamp, ts(5));
        assert_eq!(movements[0].destination_timestamp, ts(10));
    }

    #[test]
    fn test_duplicate_rows_cross_product() {
        // ---
        let t = table(vec![
            record("a", "AP-CIEN-01", 0),
            record("a", "AP-CIEN-02", 0),
            record("a", "AP-VET-01", 5),
            record("a", "AP-VET-02", 5),
        ]);
        assert_eq!(detect_movements(&t, DuplicatePolicy::Preserve).len(), 4);

        let deduped = detect_movements(&t, DuplicatePolicy::FirstPerSnapshot);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].origin_access_point, "AP-CIEN-01");
        assert_eq!(deduped[0].destination_access_point, "AP-VET-01");
    }

    #[test]
    fn test_movement_access_points_always_differ() {
        // ---
        let t = table(vec![
            record("a", "AP-CIEN-01", 0),
            record("b", "AP-VET-01", 0),
            record("c", "AP-ETSE-01", 0),
            record("a", "AP-CIEN-01", 5),
            record("b", "AP-ETSE-01", 5),
            record("c", "AP-VET-01", 5),
            record("a", "AP-MED-01", 10),
            record("b", "AP-ETSE-01", 10),
        ]);
        let movements = detect_movements(&t, DuplicatePolicy::Preserve);
        assert_eq!(movements.len(), 3);
        assert!(movements
            .iter()
            .all(|m| m.origin_access_point != m.destination_access_point));
    }
}
