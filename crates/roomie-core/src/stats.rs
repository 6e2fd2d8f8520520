use serde::{Deserialize, Serialize};

// ── Percentile helper ─────────────────────────────────────────────────────────

/// Compute the `p`-th percentile of a **sorted** slice using standard linear
/// interpolation (the same algorithm used by NumPy's `percentile` function).
///
/// Returns `0.0` for an empty slice.
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }
    let len = sorted_data.len();
    if len == 1 {
        return sorted_data[0];
    }
    let rank = (p / 100.0) * (len as f64 - 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted_data[lo];
    }
    let frac = rank - lo as f64;
    sorted_data[lo] + frac * (sorted_data[hi] - sorted_data[lo])
}

// ── ScalarSummary ─────────────────────────────────────────────────────────────

/// Distributional summary of one per-resident scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarSummary {
    pub mean: f64,
    /// 50th percentile with linear interpolation.
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl ScalarSummary {
    /// Summarize `values`; `None` for an empty slice ("no data").
    pub fn from_values(values: &[f64]) -> Option<ScalarSummary> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).expect("scalar values are finite"));

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let median = percentile(&sorted, 50.0);
        let min = sorted[0];
        let max = sorted[count - 1];

        Some(ScalarSummary {
            mean,
            median,
            min,
            max,
            count,
        })
    }
}

// ── Top-K ranking ─────────────────────────────────────────────────────────────

/// Return the `k` highest-valued entries in descending order.
///
/// The sort is stable, so entries with equal values keep their original
/// input order. `k` larger than the input returns everything.
pub fn top_k(entries: &[(String, u64)], k: usize) -> Vec<(String, u64)> {
    let mut ranked = entries.to_vec();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(k);
    ranked
}

// ── Tests ─────────────────────────────────────────────────────────────────────
