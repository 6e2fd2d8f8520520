//! Core domain types for roomie-graph.
//!
//! Defines the typed cell/grid abstraction, periods, timelines and the
//! co-residency graph, plus the error taxonomy, CLI settings and scalar
//! summary statistics shared by the other crates.

pub mod error;
pub mod models;
pub mod settings;
pub mod stats;
