//! Aggregate statistics over per-resident scalars.
//!
//! Summarizes the two derived scalars — roommate count (node degree) and
//! residency length (timeline cardinality) — with mean/median/min/max plus a
//! top-K ranking. These need only the finished timeline and graph, not the
//! path analysis.

use roomie_core::models::{RoomieGraph, Timeline};
use roomie_core::stats::{self, ScalarSummary};
use serde::{Deserialize, Serialize};

// ── Report records ────────────────────────────────────────────────────────────

/// One resident's rank entry in a top-K listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResident {
    pub resident: String,
    pub value: u64,
}

/// Summary and ranking for one per-resident scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarReport {
    /// Distributional summary; `None` when there are no residents
    /// ("no data").
    pub summary: Option<ScalarSummary>,
    /// Top-K residents by the scalar, descending; ties keep the order of the
    /// input mapping.
    pub top: Vec<RankedResident>,
}

/// Aggregate statistics over both derived scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    /// Roommate count per resident (node degree).
    pub roommate_counts: ScalarReport,
    /// Residency length per resident, in months.
    pub residency_lengths: ScalarReport,
}

// ── AggregateCalculator ───────────────────────────────────────────────────────

/// Stateless reducer over the per-resident scalar mappings.
pub struct AggregateCalculator;

impl AggregateCalculator {
    /// Compute both scalar reports. `top_k` bounds the ranking lists.
    pub fn calculate(timeline: &Timeline, graph: &RoomieGraph, top_k: usize) -> AggregateReport {
        AggregateReport {
            roommate_counts: Self::scalar_report(&graph.degrees(), top_k),
            residency_lengths: Self::scalar_report(&timeline.residency_lengths(), top_k),
        }
    }

    /// Summarize one `(resident, value)` mapping.
    fn scalar_report(entries: &[(String, u64)], top_k: usize) -> ScalarReport {
        let values: Vec<f64> = entries.iter().map(|(_, value)| *value as f64).collect();
        ScalarReport {
            summary: ScalarSummary::from_values(&values),
            top: stats::top_k(entries, top_k)
                .into_iter()
                .map(|(resident, value)| RankedResident { resident, value })
                .collect(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use roomie_core::models::Period;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn make_timeline(entries: &[(&str, &[u32])]) -> Timeline {
        let mut timeline = Timeline::new();
        for (resident, months) in entries {
            for month in *months {
                timeline.record(*resident, Period::new(2023, *month).unwrap());
            }
        }
        timeline
    }

    fn top_names(report: &ScalarReport) -> Vec<&str> {
        report.top.iter().map(|r| r.resident.as_str()).collect()
    }

    // ── calculate ─────────────────────────────────────────────────────────────

    #[test]
    fn test_top_k_three_of_five_distinct_descending() {
        // Five residents with distinct roommate counts: a 4-clique in month 1
        // plus E who only ever shares with A.
        let timeline = make_timeline(&[
            ("A", &[1, 2]),
            ("B", &[1, 3]),
            ("C", &[1, 3]),
            ("D", &[1]),
            ("E", &[2]),
        ]);
        let graph = GraphBuilder::build(&timeline);
        // Degrees: A=4 (B,C,D,E), B=3, C=3, D=3, E=1.
        let report = AggregateCalculator::calculate(&timeline, &graph, 3);

        let top = &report.roommate_counts.top;
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].resident, "A");
        assert_eq!(top[0].value, 4);
        // B, C, D tie at 3; the first two in mapping order win.
        assert_eq!(top_names(&report.roommate_counts), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_residency_length_summary() {
        let timeline = make_timeline(&[("A", &[1, 2, 3, 4]), ("B", &[1, 2]), ("C", &[5])]);
        let graph = GraphBuilder::build(&timeline);
        let report = AggregateCalculator::calculate(&timeline, &graph, 3);

        let summary = report.residency_lengths.summary.as_ref().unwrap();
        // Lengths: 4, 2, 1.
        assert_eq!(summary.count, 3);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 4.0);
        assert!((summary.mean - 7.0 / 3.0).abs() < 1e-9);
        assert!((summary.median - 2.0).abs() < 1e-9);
        assert_eq!(top_names(&report.residency_lengths), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_roommate_count_summary_with_isolated_node() {
        let timeline = make_timeline(&[("A", &[1]), ("B", &[1]), ("Loner", &[9])]);
        let graph = GraphBuilder::build(&timeline);
        let report = AggregateCalculator::calculate(&timeline, &graph, 2);

        let summary = report.roommate_counts.summary.unwrap();
        // Degrees: A=1, B=1, Loner=0.
        assert_eq!(summary.min, 0.0);
        assert_eq!(summary.max, 1.0);
        assert!((summary.mean - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_inputs_report_no_data() {
        let timeline = Timeline::new();
        let graph = GraphBuilder::build(&timeline);
        let report = AggregateCalculator::calculate(&timeline, &graph, 3);

        assert!(report.roommate_counts.summary.is_none());
        assert!(report.residency_lengths.summary.is_none());
        assert!(report.roommate_counts.top.is_empty());
        assert!(report.residency_lengths.top.is_empty());
    }

    #[test]
    fn test_top_k_respects_configured_k() {
        let timeline = make_timeline(&[("A", &[1]), ("B", &[1]), ("C", &[1]), ("D", &[1])]);
        let graph = GraphBuilder::build(&timeline);

        let one = AggregateCalculator::calculate(&timeline, &graph, 1);
        assert_eq!(one.roommate_counts.top.len(), 1);

        let ten = AggregateCalculator::calculate(&timeline, &graph, 10);
        assert_eq!(ten.roommate_counts.top.len(), 4);
    }
}
