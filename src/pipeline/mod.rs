//! Movement-inference and aggregation pipeline.
//!
//! Gateway for the pipeline stages (EMBP): callers go through [`run`] and the
//! re-exports below instead of reaching into the stage modules. Each stage
//! takes an immutable input and returns a new derived value:
//!
//! `SnapshotTable` → `Vec<Movement>` → `Vec<BuildingMovement>` → `FlowTable`

use tracing::{info, warn};

use crate::models::{Movement, SnapshotTable};

mod building;
mod flow;
mod movement;
mod timeframe;

pub use building::{
    building_for, filter_cross_building, group_movements, AllowList, Building, BuildingMovement,
    DEFAULT_BUILDINGS,
};
pub use flow::{
    precompute_flows, EdgeFlow, EdgeKey, EdgeWeights, FlowFrame, FlowTable, NodeWeights,
    TimelineBasis,
};
pub use movement::{detect_movements, DuplicatePolicy};
pub use timeframe::{consecutive_pairs, Timeframe};

// ---

/// Knobs for one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub allow: AllowList,
    pub duplicates: DuplicatePolicy,
    pub timeline: TimelineBasis,
}

/// Every derived stage of one run.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    pub movements: Vec<Movement>,
    pub cross_building: Vec<BuildingMovement>,
    pub flows: FlowTable,
}

/// Run every stage over a table already sorted by timestamp.
pub fn run(table: &SnapshotTable, options: &PipelineOptions) -> PipelineOutput {
    // ---
    let movements = detect_movements(table, options.duplicates);
    info!(
        "Detected {} movements across {} snapshots",
        movements.len(),
        table.distinct_timestamps().len()
    );

    let grouped = group_movements(&movements);
    let fallback = grouped
        .iter()
        .filter(|m| m.origin_building.is_fallback() || m.destination_building.is_fallback())
        .count();
    if fallback > 0 {
        warn!(
            "{} movements involve access points outside the AP-<BUILDING> convention",
            fallback
        );
    }

    let cross_building = filter_cross_building(&grouped, &options.allow);
    info!(
        "Kept {} cross-building movements between allowed buildings",
        cross_building.len()
    );

    let flows = precompute_flows(&cross_building, options.timeline);
    if flows.is_empty() {
        warn!("No timeframes with inter-building flows; nothing to animate");
    } else {
        info!(
            "Precomputed {} frames over {} buildings",
            flows.frame_count(),
            flows.nodes().len()
        );
    }

    PipelineOutput {
        movements,
        cross_building,
        flows,
    }
}
