//! Degradant column detection and totals

pub const DEGRADANT_PREFIX: &str = "degradant_";

/// Normalized names that start with `degradant_`, in input order
pub fn detect_degradant_columns<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    names
        .iter()
        .map(|n| n.as_ref())
        .filter(|n| n.starts_with(DEGRADANT_PREFIX))
        .map(|n| n.to_string())
        .collect()
}

/// Sum of the present degradant cells; missing cells count as zero
pub fn sum_degradants<I>(cells: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    cells.into_iter().flatten().fold(0.0, |acc, v| acc + v)
}
