//! Row validation
//!
//! Advisory only: a failing row is reported, never removed or altered.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// AMB below this is flagged as suspicious mass loss
pub const SUSPICIOUS_MASS_LOSS_LIMIT: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowIssue {
    AssayOutOfRange,
    NegativeDegradants,
    SuspiciousMassLoss,
}

impl RowIssue {
    pub fn description(&self) -> &'static str {
        match self {
            RowIssue::AssayOutOfRange => "API assay out of range",
            RowIssue::NegativeDegradants => "Negative degradants",
            RowIssue::SuspiciousMassLoss => "Suspicious mass loss",
        }
    }
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

pub type RowIssues = SmallVec<[RowIssue; 3]>;

/// Evaluate all checks for one row
///
/// A missing assay fails the range check (it is not a number in [0, 100]) but
/// cannot establish a mass loss.
pub fn validate_row(api_assay: Option<f64>, total_degradants: f64) -> RowIssues {
    let mut issues = RowIssues::new();

    if !api_assay.is_some_and(|a| (0.0..=100.0).contains(&a)) {
        issues.push(RowIssue::AssayOutOfRange);
    }

    if total_degradants < 0.0 {
        issues.push(RowIssue::NegativeDegradants);
    }

    if api_assay.is_some_and(|a| a + total_degradants < SUSPICIOUS_MASS_LOSS_LIMIT) {
        issues.push(RowIssue::SuspiciousMassLoss);
    }

    issues
}

/// One entry of the data quality report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRecord {
    /// Zero-based row index after empty-row removal
    pub row: usize,
    /// Issue descriptions joined with ", "
    pub issues: String,
}

impl IssueRecord {
    /// `None` for a clean row
    pub fn from_issues(row: usize, issues: &[RowIssue]) -> Option<Self> {
        if issues.is_empty() {
            return None;
        }

        let text = issues
            .iter()
            .map(RowIssue::description)
            .collect::<Vec<_>>()
            .join(", ");

        Some(Self { row, issues: text })
    }
}
