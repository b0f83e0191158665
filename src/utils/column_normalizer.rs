//! Column Normalization
//!
//! Maps free-form header spellings onto the canonical field names used by
//! the rest of the pipeline. Degradant columns are recognised by substring and
//! keep their distinguishing suffix (`"Degradant A"` → `degradant_a`).

use polars::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::error::PipelineResult;

pub const API_NAME: &str = "api_name";
pub const API_CODE: &str = "api_code";
pub const STRESS_TYPE: &str = "stress_type";
pub const TIME_MONTHS: &str = "time_months";
pub const API_ASSAY: &str = "api_assay";
pub const TOTAL_DEGRADANTS: &str = "total_degradants";

/// Substring that marks a column as a degradant measurement
pub const DEGRADANT_MARKER: &str = "degradant";

/// Canonical name → accepted lowercase spellings
pub static COLUMN_ALIASES: &[(&str, &[&str])] = &[
    (API_NAME, &["api name", "api_name", "api"]),
    (API_CODE, &["api code", "api_code"]),
    (STRESS_TYPE, &["stress type", "stress_typ", "stress_type", "stress"]),
    (TIME_MONTHS, &["time", "time_mon", "time_months", "months", "time_month"]),
    (
        API_ASSAY,
        &[
            "api assay",
            "api_assay",
            "api_assay_percent",
            "api assay percent",
            "assay",
            "assay_percent",
        ],
    ),
];

/// Columns that must resolve before any computation happens
pub const REQUIRED_COLUMNS: [&str; 3] = [API_ASSAY, STRESS_TYPE, TIME_MONTHS];

fn alias_lookup() -> &'static FxHashMap<&'static str, &'static str> {
    static LOOKUP: OnceLock<FxHashMap<&'static str, &'static str>> = OnceLock::new();
    LOOKUP.get_or_init(|| {
        COLUMN_ALIASES
            .iter()
            .flat_map(|(canonical, aliases)| aliases.iter().map(move |alias| (*alias, *canonical)))
            .collect()
    })
}

/// Trim, lowercase and collapse internal runs of whitespace
fn clean_header(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalize a single header
///
/// Returns `None` when the header is not recognised and should pass through
/// unchanged.
pub fn normalize_column_name(raw: &str) -> Option<String> {
    // Degradant names keep internal spacing
    let trimmed = raw.trim().to_lowercase();
    if trimmed.contains(DEGRADANT_MARKER) {
        return Some(trimmed.replace(' ', "_"));
    }

    let clean = clean_header(raw);
    alias_lookup().get(clean.as_str()).map(|canonical| canonical.to_string())
}

/// `name`, or `name_N` with the smallest free N
fn next_free_name(name: String, taken: &FxHashSet<String>) -> String {
    if !taken.contains(&name) {
        return name;
    }
    let mut n = 1;
    loop {
        let candidate = format!("{}_{}", name, n);
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Resolve the full header row
///
/// First claimant of a canonical alias wins; later claimants keep their raw
/// header. Colliding degradant names get a `_N` suffix instead, so they keep
/// the `degradant_` prefix and stay in the total.
pub fn resolve_column_names<S: AsRef<str>>(raw_names: &[S]) -> Vec<String> {
    let mut taken: FxHashSet<String> = FxHashSet::default();
    let mut resolved = Vec::with_capacity(raw_names.len());

    for raw in raw_names {
        let raw = raw.as_ref();
        let name = match normalize_column_name(raw) {
            Some(normalized) if !taken.contains(&normalized) => {
                debug!("column '{}' -> '{}'", raw, normalized);
                normalized
            }
            Some(normalized) if normalized.contains(DEGRADANT_MARKER) => {
                let suffixed = next_free_name(normalized, &taken);
                warn!("column '{}' collides with an earlier degradant; renamed to '{}'", raw, suffixed);
                suffixed
            }
            Some(normalized) => {
                warn!(
                    "column '{}' also normalizes to '{}'; keeping raw header",
                    raw, normalized
                );
                raw.to_string()
            }
            None => raw.to_string(),
        };

        // A raw passthrough can still collide with an earlier normalized name
        let name = next_free_name(name, &taken);

        taken.insert(name.clone());
        resolved.push(name);
    }

    resolved
}

/// Rename DataFrame columns to their canonical names
pub fn normalize_columns(mut df: DataFrame) -> PipelineResult<DataFrame> {
    let raw: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    let resolved = resolve_column_names(&raw);
    df.set_column_names(resolved)?;
    Ok(df)
}

/// Required canonical columns absent from `names`, in declaration order
pub fn missing_required_columns<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|required| !names.iter().any(|n| n.as_ref() == **required))
        .map(|s| s.to_string())
        .collect()
}
