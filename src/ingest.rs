//! Parser for the delimited input payload.
//!
//! The payload is newline-separated records of tab-separated decimal numbers
//! using comma as the decimal separator (`1,5\t2,3\t0,9`). The first column
//! is the x-axis; remaining columns become auto-titled y-series. Any bad
//! token or ragged row fails the whole payload — there is no partial parse.

use tracing::debug;

use crate::core::{SeriesInput, SeriesStore};
use crate::error::{ChartError, ChartResult};

/// Default x-axis title for parsed payloads; also the formula binding for
/// the x column.
pub const X_TITLE: &str = "x";

/// Parses a payload into a validated [`SeriesStore`].
pub fn parse_payload(payload: &str) -> ChartResult<SeriesStore> {
    let rows = parse_rows(payload)?;
    let columns = transpose(&rows)?;

    let mut columns = columns.into_iter();
    let x_axis = columns.next().ok_or(ChartError::EmptyDataset)?;
    let series = columns
        .enumerate()
        .map(|(i, values)| SeriesInput::new(format!("series{}", i + 1), values))
        .collect::<Vec<_>>();

    debug!(
        samples = x_axis.len(),
        series_count = series.len(),
        "payload parsed"
    );
    SeriesStore::new(X_TITLE, x_axis, series)
}

// Rows keep their 1-based payload line number so later validation can
// report positions the user can find, even when blank lines were skipped.
fn parse_rows(payload: &str) -> ChartResult<Vec<(usize, Vec<f64>)>> {
    let mut rows = Vec::new();
    for (line_index, line) in payload.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let mut row = Vec::new();
        for token in line.split('\t') {
            row.push(parse_number(token, line_index + 1)?);
        }
        rows.push((line_index + 1, row));
    }

    if rows.is_empty() {
        return Err(ChartError::EmptyDataset);
    }
    Ok(rows)
}

fn parse_number(token: &str, line: usize) -> ChartResult<f64> {
    token
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| ChartError::Parse {
            line,
            detail: format!("`{token}` is not a number"),
        })
}

fn transpose(rows: &[(usize, Vec<f64>)]) -> ChartResult<Vec<Vec<f64>>> {
    let width = rows[0].1.len();
    for (line, row) in rows {
        if row.len() != width {
            return Err(ChartError::Parse {
                line: *line,
                detail: format!("expected {width} columns, found {}", row.len()),
            });
        }
    }

    let mut columns = vec![Vec::with_capacity(rows.len()); width];
    for (_, row) in rows {
        for (column, &value) in columns.iter_mut().zip(row) {
            column.push(value);
        }
    }
    Ok(columns)
}
