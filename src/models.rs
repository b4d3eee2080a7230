//! Data models for the snapshot → movement → flow pipeline.

use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

// ---

/// Timestamp attached to every record of one snapshot file.
pub type SnapshotTime = DateTime<FixedOffset>;

/// Raw client entry as it appears in a `client-info-*.json` file.
///
/// Only the two fields the pipeline needs are modelled; everything else in the
/// controller export is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawClientRecord {
    // ---
    #[serde(rename = "macaddr")]
    pub device_id: String,
    #[serde(rename = "associated_device_name")]
    pub access_point: String,
}

/// One device observed on one access point in one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientRecord {
    // ---
    pub device_id: String,
    pub access_point: String,
    pub timestamp: SnapshotTime,
    /// Local hour of the snapshot.
    pub hour: u32,
    /// Day of week, Monday = 0.
    pub weekday: u32,
}

impl RawClientRecord {
    // ---
    pub fn at(self, timestamp: SnapshotTime) -> ClientRecord {
        // ---
        ClientRecord {
            device_id: self.device_id,
            access_point: self.access_point,
            timestamp,
            hour: timestamp.hour(),
            weekday: timestamp.weekday().num_days_from_monday(),
        }
    }
}

/// A change of associated access point between two adjacent snapshots.
///
/// `origin_access_point != destination_access_point` always holds for values
/// produced by the movement detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Movement {
    // ---
    pub device_id: String,
    pub origin_timestamp: SnapshotTime,
    pub origin_access_point: String,
    pub destination_timestamp: SnapshotTime,
    pub destination_access_point: String,
}

/// Flat table of every loaded client observation.
#[derive(Debug, Clone, Default)]
pub struct SnapshotTable {
    records: Vec<ClientRecord>,
}

impl SnapshotTable {
    // ---
    pub fn new(records: Vec<ClientRecord>) -> Self {
        Self { records }
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = ClientRecord>) {
        self.records.extend(records);
    }

    pub fn records(&self) -> &[ClientRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Stable sort by snapshot timestamp; rows of the same snapshot keep
    /// their file order.
    pub fn sort_by_timestamp(&mut self) {
        self.records.sort_by_key(|r| r.timestamp);
    }

    /// Distinct snapshot timestamps in ascending order.
    pub fn distinct_timestamps(&self) -> Vec<SnapshotTime> {
        // ---
        let mut timestamps: Vec<SnapshotTime> = self.records.iter().map(|r| r.timestamp).collect();
        timestamps.sort();
        timestamps.dedup();
        timestamps
    }
}
