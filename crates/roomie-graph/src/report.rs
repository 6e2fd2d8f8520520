//! Report rendering for roomie-graph.
//!
//! Turns a finished [`ResidencyReport`] into console text or pretty JSON.
//! Rendering is pure string construction; printing stays in `main`.

use roomie_core::error::Result;
use roomie_core::stats::ScalarSummary;
use roomie_data::aggregator::RankedResident;
use roomie_data::analysis::ResidencyReport;
use roomie_data::analyzer::{GraphMetrics, PathWitness};

// ── Public API ────────────────────────────────────────────────────────────────

/// Render the full plain-text console report.
pub fn render_text(report: &ResidencyReport) -> String {
    let mut out = String::new();

    out.push_str("Roommate network report\n");
    out.push_str(&format!("Generated: {}\n", report.metadata.generated_at));
    out.push_str(&format!(
        "Input: {} rows x {} columns, {} residents over {} periods\n",
        report.metadata.grid_rows,
        report.metadata.grid_columns,
        report.metadata.resident_count,
        report.metadata.period_count,
    ));
    out.push('\n');

    out.push_str(&format!("Total nodes: {}\n", report.metrics.node_count));
    out.push_str(&format!("Total edges: {}\n", report.metrics.edge_count));
    out.push_str(&format!(
        "Longest shortest path: {}\n",
        format_witness(report.metrics.diameter.as_ref())
    ));
    out.push_str(&format!(
        "Average path length: {}\n",
        format_average(&report.metrics)
    ));
    out.push('\n');

    out.push_str(&format!(
        "Roommate count: {}\n",
        format_summary(report.aggregates.roommate_counts.summary.as_ref())
    ));
    out.push_str("Top residents by roommate count:\n");
    out.push_str(&format_top(&report.aggregates.roommate_counts.top));

    out.push_str(&format!(
        "Residency length (months): {}\n",
        format_summary(report.aggregates.residency_lengths.summary.as_ref())
    ));
    out.push_str("Top residents by residency length:\n");
    out.push_str(&format_top(&report.aggregates.residency_lengths.top));

    out.push_str("Adjacency:\n");
    for (resident, roommates) in report.graph.adjacency() {
        out.push_str(&format!("  {}: {}\n", resident, roommates.join(", ")));
    }

    out
}

/// Render the report as pretty JSON for external consumers.
pub fn render_json(report: &ResidencyReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

// ── Formatting helpers ────────────────────────────────────────────────────────

/// `"3 (Alice -> Bob -> Carol -> Dave)"`, or `"no data"` when no pair of
/// nodes is connected.
fn format_witness(witness: Option<&PathWitness>) -> String {
    match witness {
        Some(w) => format!("{} ({})", w.length, w.nodes.join(" -> ")),
        None => "no data".to_string(),
    }
}

/// `"1.67 (over 120 reachable pairs)"`, or `"no data"`.
fn format_average(metrics: &GraphMetrics) -> String {
    match metrics.average_path_length {
        Some(average) => format!(
            "{:.2} (over {} reachable pairs)",
            average, metrics.reachable_pairs
        ),
        None => "no data".to_string(),
    }
}

/// `"mean 4.3, median 4.0, min 0, max 9"`, or `"no data"`.
fn format_summary(summary: Option<&ScalarSummary>) -> String {
    match summary {
        Some(s) => format!(
            "mean {:.1}, median {:.1}, min {:.0}, max {:.0}",
            s.mean, s.median, s.min, s.max
        ),
        None => "no data".to_string(),
    }
}

/// Numbered ranking lines, or a single `(none)` placeholder line.
fn format_top(top: &[RankedResident]) -> String {
    if top.is_empty() {
        return "  (none)\n\n".to_string();
    }
    let mut out = String::new();
    for (index, entry) in top.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} ({})\n",
            index + 1,
            entry.resident,
            entry.value
        ));
    }
    out.push('\n');
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
