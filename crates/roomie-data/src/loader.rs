//! Spreadsheet loading for roomie-graph.
//!
//! Reads one sheet of an `.xlsx`/`.xlsm` workbook (expanding merged cell
//! ranges so every cell carries its range's top-left value) or a `.csv` file
//! into a resolved [`Grid`] of typed cells. Nothing downstream of this module
//! sees file-format details.

use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx, XlsxError};
use roomie_core::error::{Result, RoomieError};
use roomie_core::models::{Cell, Grid, SheetSelector};
use tracing::debug;

// ── Public API ────────────────────────────────────────────────────────────────

/// Load `path` into a resolved grid, dispatching on the file extension.
pub fn load_grid(path: &Path, sheet: &SheetSelector) -> Result<Grid> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let grid = match extension.as_str() {
        "xlsx" | "xlsm" => load_xlsx(path, sheet)?,
        "csv" => load_csv(path, sheet)?,
        other => {
            return Err(RoomieError::Config(format!(
                "unsupported input extension {:?} (expected .xlsx, .xlsm or .csv)",
                other
            )))
        }
    };

    debug!(
        "Loaded {}x{} grid from {}",
        grid.height(),
        grid.width(),
        path.display()
    );
    Ok(grid)
}

// ── XLSX ──────────────────────────────────────────────────────────────────────

fn load_xlsx(path: &Path, sheet: &SheetSelector) -> Result<Grid> {
    let mut workbook: Xlsx<_> =
        open_workbook(path).map_err(|e: XlsxError| RoomieError::Workbook(e.to_string()))?;
    workbook
        .load_merged_regions()
        .map_err(|e| RoomieError::Workbook(e.to_string()))?;

    let sheet_name = resolve_sheet_name(&workbook.sheet_names(), sheet)?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| RoomieError::Workbook(e.to_string()))?;

    // The used range may not start at A1; merged-region coordinates are
    // absolute, so remember the offset.
    let origin = range.start().unwrap_or((0, 0));

    let mut rows: Vec<Vec<Cell>> = range
        .rows()
        .map(|row| row.iter().map(cell_from_sheet).collect())
        .collect();

    for region in workbook.merged_regions_by_sheet(&sheet_name) {
        let (_, _, dimensions) = region;
        let top_left = (
            (dimensions.start.0 as usize).saturating_sub(origin.0 as usize),
            (dimensions.start.1 as usize).saturating_sub(origin.1 as usize),
        );
        let bottom_right = (
            (dimensions.end.0 as usize).saturating_sub(origin.0 as usize),
            (dimensions.end.1 as usize).saturating_sub(origin.1 as usize),
        );
        expand_merged_block(&mut rows, top_left, bottom_right);
    }

    Grid::new(rows)
}

/// Resolve a selector against the workbook's sheet list.
fn resolve_sheet_name(names: &[String], sheet: &SheetSelector) -> Result<String> {
    match sheet {
        SheetSelector::Index(index) => names
            .get(*index)
            .cloned()
            .ok_or_else(|| RoomieError::SheetNotFound(format!("index {}", index))),
        SheetSelector::Name(name) => names
            .iter()
            .find(|n| *n == name)
            .cloned()
            .ok_or_else(|| RoomieError::SheetNotFound(name.clone())),
    }
}

/// Copy the top-left cell of a merged range over every cell in the range.
///
/// Coordinates outside the grid are ignored (merged ranges can extend past
/// the used range).
fn expand_merged_block(
    rows: &mut [Vec<Cell>],
    top_left: (usize, usize),
    bottom_right: (usize, usize),
) {
    let (first_row, first_col) = top_left;
    let Some(value) = rows
        .get(first_row)
        .and_then(|row| row.get(first_col))
        .cloned()
    else {
        return;
    };

    for row_index in first_row..=bottom_right.0 {
        let Some(row) = rows.get_mut(row_index) else {
            break;
        };
        for col_index in first_col..=bottom_right.1 {
            if let Some(cell) = row.get_mut(col_index) {
                *cell = value.clone();
            }
        }
    }
}

/// Map a calamine cell to the typed cell abstraction.
fn cell_from_sheet(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::Error(e) => Cell::Text(e.to_string()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

fn load_csv(path: &Path, sheet: &SheetSelector) -> Result<Grid> {
    // A CSV file has exactly one "sheet"; anything else is a sign the xlsx
    // flags were pointed at the wrong file.
    if *sheet != SheetSelector::Index(0) {
        return Err(RoomieError::Config(
            "a CSV input has a single sheet; remove the --sheet selector".to_string(),
        ));
    }

    let file = std::fs::File::open(path).map_err(|source| RoomieError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    // Records are read flexibly; rectangularity is enforced by the Grid
    // constructor so a ragged sheet reports the offending row.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| RoomieError::Workbook(e.to_string()))?;
        rows.push(record.iter().map(cell_from_csv_field).collect());
    }

    Grid::new(rows)
}

/// Map a CSV field to the typed cell abstraction.
///
/// Fields that parse as f64 become numbers, since year headers are frequently
/// numeric in real sheets.
fn cell_from_csv_field(field: &str) -> Cell {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        Cell::Empty
    } else if let Ok(number) = trimmed.parse::<f64>() {
        Cell::Number(number)
    } else {
        Cell::Text(field.to_string())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
