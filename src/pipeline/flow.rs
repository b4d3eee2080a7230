//! Per-timeframe flow and occupancy precomputation.
//!
//! Everything the viewer needs for one animation frame is computed once here
//! and looked up by key afterwards.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::models::SnapshotTime;
use crate::pipeline::building::BuildingMovement;
use crate::pipeline::timeframe::{consecutive_pairs, Timeframe};

// ---

/// (origin building, destination building)
pub type EdgeKey = (String, String);

/// Distinct devices per building pair, absent pairs mean no flow.
pub type EdgeWeights = BTreeMap<EdgeKey, usize>;

/// Distinct devices arriving per building.
pub type NodeWeights = BTreeMap<String, usize>;

/// Which timestamps make up the frame timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimelineBasis {
    /// Origin and destination timestamps of the kept movements. The first
    /// snapshot pair of the corpus gets its own frame, so a corpus usually
    /// yields one more frame than with [`TimelineBasis::DestinationOnly`].
    #[default]
    MovementEndpoints,
    /// Destination timestamps only; movements out of the earliest snapshot
    /// never appear as edges.
    DestinationOnly,
}

/// Precomputed edge and node weights for every timeframe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowTable {
    timestamps: Vec<SnapshotTime>,
    timeframes: Vec<Timeframe<SnapshotTime>>,
    nodes: Vec<String>,
    edge_weights: HashMap<Timeframe<SnapshotTime>, EdgeWeights>,
    node_weights: HashMap<SnapshotTime, NodeWeights>,
}

/// One directed flow inside a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeFlow {
    pub origin: String,
    pub destination: String,
    pub devices: usize,
}

/// Everything the viewer shows for one frame index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowFrame {
    // ---
    pub index: usize,
    pub timeframe: Timeframe<SnapshotTime>,
    pub edges: Vec<EdgeFlow>,
    pub occupancy: NodeWeights,
    /// Sum of the occupancy counts.
    pub total: usize,
}

/// Build the flow table from filtered, building-grouped movements.
pub fn precompute_flows(movements: &[BuildingMovement], basis: TimelineBasis) -> FlowTable {
    // ---
    let timestamps: Vec<SnapshotTime> = movements
        .iter()
        .flat_map(|m| match basis {
            TimelineBasis::MovementEndpoints => {
                vec![m.movement.origin_timestamp, m.movement.destination_timestamp]
            }
            TimelineBasis::DestinationOnly => vec![m.movement.destination_timestamp],
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let nodes: Vec<String> = movements
        .iter()
        .flat_map(|m| [m.origin_building.name(), m.destination_building.name()])
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let timeframes = consecutive_pairs(&timestamps);
    let mut edge_weights = HashMap::with_capacity(timeframes.len());
    let mut node_weights = HashMap::with_capacity(timeframes.len());

    for frame in &timeframes {
        let edges = count_distinct(
            movements.iter().filter(|m| {
                m.movement.origin_timestamp == frame.start
                    && m.movement.destination_timestamp == frame.end
            }),
            |m| {
                (
                    m.origin_building.name().to_string(),
                    m.destination_building.name().to_string(),
                )
            },
        );
        edge_weights.insert(*frame, edges);

        let arrivals = count_distinct(
            movements
                .iter()
                .filter(|m| m.movement.destination_timestamp == frame.end),
            |m| m.destination_building.name().to_string(),
        );
        node_weights.insert(frame.end, arrivals);
    }

    FlowTable {
        timestamps,
        timeframes,
        nodes,
        edge_weights,
        node_weights,
    }
}

/// Group by `key` and count distinct device ids per group.
fn count_distinct<'a, K, I, F>(movements: I, key: F) -> BTreeMap<K, usize>
where
    K: Ord,
    I: Iterator<Item = &'a BuildingMovement>,
    F: Fn(&BuildingMovement) -> K,
{
    // ---
    let mut groups: BTreeMap<K, HashSet<&str>> = BTreeMap::new();
    for m in movements {
        groups
            .entry(key(m))
            .or_default()
            .insert(m.movement.device_id.as_str());
    }
    groups
        .into_iter()
        .map(|(k, devices)| (k, devices.len()))
        .collect()
}

impl FlowTable {
    // ---
    /// Distinct timeline timestamps, ascending.
    pub fn timestamps(&self) -> &[SnapshotTime] {
        &self.timestamps
    }

    pub fn timeframes(&self) -> &[Timeframe<SnapshotTime>] {
        &self.timeframes
    }

    /// Every building appearing as origin or destination, sorted.
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn frame_count(&self) -> usize {
        self.timeframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timeframes.is_empty()
    }

    pub fn edge_weights(&self, timeframe: &Timeframe<SnapshotTime>) -> Option<&EdgeWeights> {
        self.edge_weights.get(timeframe)
    }

    pub fn node_weights(&self, timestamp: &SnapshotTime) -> Option<&NodeWeights> {
        self.node_weights.get(timestamp)
    }

    /// Materialise frame `index`, or `None` past the last timeframe.
    pub fn frame(&self, index: usize) -> Option<FlowFrame> {
        // ---
        let timeframe = *self.timeframes.get(index)?;

        let edges: Vec<EdgeFlow> = self
            .edge_weights(&timeframe)
            .map(|weights| {
                weights
                    .iter()
                    .map(|((origin, destination), devices)| EdgeFlow {
                        origin: origin.clone(),
                        destination: destination.clone(),
                        devices: *devices,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let occupancy = self
            .node_weights(&timeframe.end)
            .cloned()
            .unwrap_or_default();
        let total = occupancy.values().sum();

        Some(FlowFrame {
            index,
            timeframe,
            edges,
            occupancy,
            total,
        })
    }
}
