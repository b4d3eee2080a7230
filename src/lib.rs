//! Inter-building movement flows inferred from WiFi association snapshots.
//!
//! Snapshots of which device is associated to which access point are loaded
//! ([`loader`]), joined pairwise to find devices that changed access point,
//! grouped into buildings and reduced to per-timeframe flow and occupancy
//! counts ([`pipeline`]). The result is drawn ([`visual`]) and served by a
//! small HTTP viewer ([`routes`]) or exported as SVG frames ([`export`]).

pub mod config;
pub mod export;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod visual;

pub use config::Config;
pub use models::{ClientRecord, Movement, RawClientRecord, SnapshotTable, SnapshotTime};
