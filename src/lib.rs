//! Trackle: Change Tracking for In-Memory Object Graphs
//!
//! Snapshot an object graph, mutate it through its normal property and
//! collection surface, and enumerate exactly which properties changed and
//! which container elements were added or removed relative to the wrap-time
//! baseline, without diffing the whole graph.

pub mod collections;
pub mod config;
pub mod error;
pub mod graph;
pub mod logging;
pub mod schema;
pub mod tracker;
pub mod value;
