//! LazyFrame projection helpers with column validation
//!
//! Provides an explicit select-and-rename step for building presentation
//! tables, so a missing source column fails loudly instead of silently
//! producing a narrower table.

use polars::prelude::*;
use anyhow::{anyhow, Context, Result};
use std::collections::HashSet;

/// Materialize LazyFrame with an explicit `(source, alias)` projection
///
/// # Arguments
/// * `lazy` - LazyFrame to materialize
/// * `columns` - `(source column, output name)` pairs, in output order
/// * `context` - Context for error messages (e.g., "display table")
///
/// # Errors
/// Returns error if materialization fails or any output column is missing.
///
/// # Example
/// ```rust,ignore
/// let df = materialize_with_aliases(
///     &results.lazy(),
///     &[("api_assay", "API Assay (%)"), ("AMB", "AMB")],
///     "display table",
/// )?;
/// ```
pub fn materialize_with_aliases(
    lazy: &LazyFrame,
    columns: &[(&str, &str)],
    context: &str,
) -> Result<DataFrame> {
    let col_exprs: Vec<Expr> = columns
        .iter()
        .map(|&(source, alias)| col(source).alias(alias))
        .collect();

    let df = lazy
        .clone()
        .select(&col_exprs)
        .collect()
        .with_context(|| format!("{}: Failed to materialize columns {:?}", context, columns))?;

    let actual_cols: HashSet<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    for &(_, expected) in columns {
        if !actual_cols.contains(expected) {
            return Err(anyhow!(
                "{}: Missing expected column '{}'. Available columns: {:?}",
                context, expected, actual_cols
            ));
        }
    }

    Ok(df)
}
