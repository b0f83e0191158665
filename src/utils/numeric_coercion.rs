//! Numeric coercion for measurement columns
//!
//! Unparseable cells become null, never errors. Rows left with no value in any
//! column are dropped afterwards; row position in the returned frame is the
//! dense zero-based row index used in every report.

use polars::prelude::*;
use tracing::debug;

use crate::error::PipelineResult;

/// Parse one cell; `None` for blanks, text and NaN
pub fn parse_numeric(cell: &str) -> Option<f64> {
    let value: f64 = cell.trim().parse().ok()?;
    if value.is_nan() {
        None
    } else {
        Some(value)
    }
}

/// Convert a single column to Float64, nulling unparseable cells
pub fn coerce_column(column: &Column) -> PipelineResult<Series> {
    let name = column.name().clone();

    if column.dtype().is_float() || column.dtype().is_integer() {
        let cast = column.cast(&DataType::Float64)?;
        return Ok(cast.as_materialized_series().clone());
    }

    let as_text = column.cast(&DataType::String)?;
    let parsed: Float64Chunked = as_text
        .str()?
        .into_iter()
        .map(|cell| cell.and_then(parse_numeric))
        .collect();

    let n_failed = parsed.null_count().saturating_sub(as_text.null_count());
    if n_failed > 0 {
        debug!("column '{}': {} non-numeric cells set to missing", name, n_failed);
    }

    Ok(parsed.with_name(name).into_series())
}

/// Coerce the named columns in place; names absent from the frame are skipped
pub fn coerce_numeric_columns(mut df: DataFrame, columns: &[String]) -> PipelineResult<DataFrame> {
    for name in columns {
        let Ok(column) = df.column(name) else {
            continue;
        };
        let coerced = coerce_column(column)?;
        df.with_column(coerced)?;
    }
    Ok(df)
}

/// Drop rows that are null in every column
pub fn drop_empty_rows(df: DataFrame) -> PipelineResult<DataFrame> {
    if df.width() == 0 {
        return Ok(df);
    }

    let mut keep = BooleanChunked::full("keep".into(), false, df.height());
    for column in df.get_columns() {
        keep = &keep | &column.as_materialized_series().is_not_null();
    }

    let kept = df.filter(&keep)?;
    let dropped = df.height() - kept.height();
    if dropped > 0 {
        debug!("dropped {} empty rows", dropped);
    }

    Ok(kept)
}
