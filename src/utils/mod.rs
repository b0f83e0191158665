//! Preprocessing utilities
//!
//! Contains the table-level steps that run before any metric is computed:
//! - Column normalization: alias table and degradant renaming
//! - Degradant detection: `degradant_*` selection and row totals
//! - Numeric coercion: lenient Float64 parsing and empty-row removal
//! - LazyFrame helpers: validated projections for presentation tables

pub mod column_normalizer;
pub mod degradant_detection;
pub mod numeric_coercion;
pub mod lazy_helpers;

// Re-export commonly used functions
pub use column_normalizer::{
    missing_required_columns, normalize_column_name, normalize_columns, resolve_column_names,
    COLUMN_ALIASES, REQUIRED_COLUMNS,
};
pub use degradant_detection::{detect_degradant_columns, sum_degradants};
pub use numeric_coercion::{coerce_numeric_columns, drop_empty_rows, parse_numeric};
pub use lazy_helpers::materialize_with_aliases;
