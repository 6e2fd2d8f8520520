//! Top-level analysis pipeline for roomie-graph.
//!
//! Orchestrates loading, timeline extraction, graph construction and the two
//! statistics passes, returning a [`ResidencyReport`] ready for rendering.

use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use roomie_core::error::Result;
use roomie_core::models::{RoomieGraph, SheetSelector, Timeline};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregator::{AggregateCalculator, AggregateReport};
use crate::analyzer::{GraphAnalyzer, GraphMetrics};
use crate::builder::GraphBuilder;
use crate::extractor::{ExtractorConfig, TimelineExtractor};
use crate::loader::load_grid;

// ── Public types ──────────────────────────────────────────────────────────────

/// Options for a single analysis run.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Which sheet to read from the workbook.
    pub sheet: SheetSelector,
    /// Extraction layout and strictness.
    pub extractor: ExtractorConfig,
    /// How many residents to keep in the top rankings.
    pub top_k: usize,
}

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    /// ISO-8601 timestamp when this report was generated.
    pub generated_at: String,
    /// Rows in the resolved input grid.
    pub grid_rows: usize,
    /// Columns in the resolved input grid.
    pub grid_columns: usize,
    /// Residents extracted from the grid.
    pub resident_count: usize,
    /// Distinct periods extracted from the grid.
    pub period_count: usize,
    /// Wall-clock seconds spent loading the spreadsheet.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent on extraction and statistics.
    pub transform_time_seconds: f64,
}

/// The complete output of [`analyze_residency`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResidencyReport {
    /// Per-resident periods of presence.
    pub timeline: Timeline,
    /// The co-residency graph (resident → sorted roommate list).
    pub graph: RoomieGraph,
    /// Structural graph statistics.
    pub metrics: GraphMetrics,
    /// Distributional summaries of the per-resident scalars.
    pub aggregates: AggregateReport,
    /// Metadata about this run.
    pub metadata: RunMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full pipeline.
///
/// 1. Load the spreadsheet into a resolved grid.
/// 2. Extract the per-resident timeline.
/// 3. Build the co-residency graph.
/// 4. Compute graph metrics and aggregate statistics.
///
/// Any ingestion failure aborts immediately; the statistics stages never see
/// a partially-built timeline.
pub fn analyze_residency(path: &Path, options: &AnalysisOptions) -> Result<ResidencyReport> {
    // ── Step 1: Load the grid ─────────────────────────────────────────────────
    let load_start = Instant::now();
    let grid = load_grid(path, &options.sheet)?;
    let load_time = load_start.elapsed().as_secs_f64();

    // ── Step 2: Extract the timeline ──────────────────────────────────────────
    let transform_start = Instant::now();
    let extractor = TimelineExtractor::new(options.extractor.clone());
    let timeline = extractor.extract(&grid)?;

    // ── Step 3: Build the graph ───────────────────────────────────────────────
    let graph = GraphBuilder::build(&timeline);

    // ── Step 4: Statistics ────────────────────────────────────────────────────
    let metrics = GraphAnalyzer::analyze(&graph);
    let aggregates = AggregateCalculator::calculate(&timeline, &graph, options.top_k);
    let transform_time = transform_start.elapsed().as_secs_f64();

    info!(
        "Analyzed {}: {} residents, {} periods, {} edges",
        path.display(),
        timeline.resident_count(),
        timeline.period_count(),
        metrics.edge_count
    );

    let metadata = RunMetadata {
        generated_at: Utc::now().to_rfc3339(),
        grid_rows: grid.height(),
        grid_columns: grid.width(),
        resident_count: timeline.resident_count(),
        period_count: timeline.period_count(),
        load_time_seconds: load_time,
        transform_time_seconds: transform_time,
    };

    Ok(ResidencyReport {
        timeline,
        graph,
        metrics,
        aggregates,
        metadata,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
