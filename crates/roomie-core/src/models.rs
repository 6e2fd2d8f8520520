use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::Month;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoomieError};

// ── Cells and grids ───────────────────────────────────────────────────────────

/// A single spreadsheet cell after file-format resolution.
///
/// The loader resolves every raw cell into one of these three variants; the
/// rest of the pipeline never sees file-format details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    /// No value.
    Empty,
    /// A textual value, stored exactly as read (normalization happens at the
    /// extraction boundary).
    Text(String),
    /// A numeric value (spreadsheet numbers, or CSV fields that parse as f64).
    Number(f64),
}

impl Cell {
    /// Whether this cell carries no usable content.
    ///
    /// Empty cells, whitespace-only text and placeholder tokens all count as
    /// blank. Numbers are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => normalize_resident_name(s).is_none(),
            Cell::Number(_) => false,
        }
    }

    /// Resolve this cell to a resident identity, if it holds one.
    ///
    /// Only text cells can name a resident; the name is trimmed and
    /// placeholder tokens are rejected.
    pub fn resident_name(&self) -> Option<String> {
        match self {
            Cell::Text(s) => normalize_resident_name(s),
            _ => None,
        }
    }
}

/// A rectangular matrix of resolved cells.
///
/// Construction validates rectangularity; a ragged input is a
/// [`RoomieError::Structural`] naming the first offending row. The grid is
/// read once by the extractor and discarded afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Grid {
    /// Build a grid from rows, validating that every row has the same width.
    pub fn new(rows: Vec<Vec<Cell>>) -> Result<Grid> {
        if let Some(first) = rows.first() {
            let expected = first.len();
            for (index, row) in rows.iter().enumerate() {
                if row.len() != expected {
                    return Err(RoomieError::Structural {
                        row: index,
                        expected,
                        found: row.len(),
                    });
                }
            }
        }
        Ok(Grid { rows })
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (0 for an empty grid).
    pub fn width(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }

    /// The cell at `(row, col)`, or an empty cell when out of bounds.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }
}

// ── Resident identity normalization ───────────────────────────────────────────

/// Tokens that mark a cell as deliberately blank in real sheets.
const PLACEHOLDER_TOKENS: [&str; 4] = ["-", "—", "?", "n/a"];

/// Normalize a raw cell string into a resident identity.
///
/// Surrounding whitespace is trimmed; an empty result or a placeholder token
/// (`-`, `—`, `?`, `n/a`, case-insensitive) yields `None`. Two cells with the
/// same normalized string denote the same resident; no fuzzy matching.
pub fn normalize_resident_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_lowercase();
    if PLACEHOLDER_TOKENS.iter().any(|token| *token == lower) {
        return None;
    }
    Some(trimmed.to_string())
}

// ── Periods ───────────────────────────────────────────────────────────────────

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Parse a month label into its calendar index (1–12).
///
/// Accepts full English month names and 3-letter abbreviations in any casing
/// (via [`chrono::Month`]), as well as plain numeric labels `1`–`12`.
pub fn parse_month_label(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(n) = trimmed.parse::<u32>() {
        return (1..=12).contains(&n).then_some(n);
    }
    trimmed
        .parse::<Month>()
        .ok()
        .map(|m| m.number_from_month())
}

/// A distinct (year, month) time bucket used as the unit of co-residency.
///
/// The derived ordering is calendar order: year first, then calendar month
/// index. Sorting period *labels* as strings does not match calendar order
/// ("April" sorts before "March") and is deliberately not the contract.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Period {
    pub year: i32,
    /// Calendar month index, 1–12.
    pub month: u32,
}

impl Period {
    /// Build a period; `None` when `month` is outside 1–12.
    pub fn new(year: i32, month: u32) -> Option<Period> {
        (1..=12).contains(&month).then_some(Period { year, month })
    }

    /// The English month name.
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// The "<year> <month-name>" label used by the source sheets.
    pub fn label(&self) -> String {
        format!("{} {}", self.year, self.month_name())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ── Timeline ──────────────────────────────────────────────────────────────────

/// Per-resident set of periods of presence.
///
/// Duplicate (resident, period) recordings collapse; a resident only appears
/// once recorded for at least one period, so every entry has a non-empty
/// period set. Residents iterate in name order for deterministic output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    residents: BTreeMap<String, BTreeSet<Period>>,
}

impl Timeline {
    pub fn new() -> Timeline {
        Timeline::default()
    }

    /// Record that `resident` was present during `period`.
    pub fn record(&mut self, resident: impl Into<String>, period: Period) {
        self.residents
            .entry(resident.into())
            .or_default()
            .insert(period);
    }

    /// Resident names in sorted order.
    pub fn residents(&self) -> impl Iterator<Item = &str> {
        self.residents.keys().map(String::as_str)
    }

    /// The periods recorded for `resident`, if any.
    pub fn periods(&self, resident: &str) -> Option<&BTreeSet<Period>> {
        self.residents.get(resident)
    }

    /// Iterate `(resident, periods)` pairs in resident name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<Period>)> {
        self.residents.iter().map(|(name, set)| (name.as_str(), set))
    }

    pub fn resident_count(&self) -> usize {
        self.residents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residents.is_empty()
    }

    /// Number of distinct periods across all residents.
    pub fn period_count(&self) -> usize {
        self.residents
            .values()
            .flatten()
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Per-resident residency length (period count), in resident name order.
    pub fn residency_lengths(&self) -> Vec<(String, u64)> {
        self.residents
            .iter()
            .map(|(name, set)| (name.clone(), set.len() as u64))
            .collect()
    }
}

// ── Co-residency graph ────────────────────────────────────────────────────────

/// Undirected, unweighted, simple graph of residents.
///
/// An edge means two residents shared at least one period. Adjacency lists
/// are sorted and deduplicated; the graph is symmetric and loop-free, fully
/// recomputable from the [`Timeline`], and never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomieGraph {
    adjacency: BTreeMap<String, Vec<String>>,
}

impl RoomieGraph {
    /// Wrap a finished adjacency mapping.
    ///
    /// Callers must supply symmetric, self-loop-free, sorted adjacency; the
    /// graph builder is the one production constructor.
    pub fn from_adjacency(adjacency: BTreeMap<String, Vec<String>>) -> RoomieGraph {
        RoomieGraph { adjacency }
    }

    /// Node names in sorted order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    /// Sorted neighbors of `node`; empty for unknown nodes.
    pub fn neighbors(&self, node: &str) -> &[String] {
        self.adjacency
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, node: &str) -> bool {
        self.adjacency.contains_key(node)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }

    /// Roommate count for `node` (0 for unknown nodes).
    pub fn degree(&self, node: &str) -> usize {
        self.adjacency.get(node).map(Vec::len).unwrap_or(0)
    }

    /// Per-resident roommate count, in node name order.
    pub fn degrees(&self) -> Vec<(String, u64)> {
        self.adjacency
            .iter()
            .map(|(name, neighbors)| (name.clone(), neighbors.len() as u64))
            .collect()
    }

    /// The full adjacency mapping.
    pub fn adjacency(&self) -> &BTreeMap<String, Vec<String>> {
        &self.adjacency
    }
}

// ── Configuration enums ───────────────────────────────────────────────────────

/// Which spreadsheet layout the extractor should assume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseLayout {
    /// Year in row 1 (merged across month columns), month in row 2,
    /// residents below.
    MergedHeader,
    /// Sparse year header, month in the first data row, and a fixed-size
    /// roster of resident slots that carry forward across columns.
    FixedRoster,
}

impl ParseLayout {
    /// Map a CLI flag value (pre-validated by clap) to a layout.
    pub fn from_flag(value: &str) -> ParseLayout {
        match value {
            "fixed-roster" => ParseLayout::FixedRoster,
            _ => ParseLayout::MergedHeader,
        }
    }
}

/// How to pick the sheet to read from a workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    /// 0-based position in the workbook's sheet list.
    Index(usize),
    /// Exact sheet name.
    Name(String),
}

impl SheetSelector {
    /// Parse a CLI value: an unsigned integer selects by index, anything
    /// else selects by name.
    pub fn parse(value: &str) -> SheetSelector {
        match value.trim().parse::<usize>() {
            Ok(index) => SheetSelector::Index(index),
            Err(_) => SheetSelector::Name(value.trim().to_string()),
        }
    }
}

impl Default for SheetSelector {
    fn default() -> SheetSelector {
        SheetSelector::Index(0)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
