//! MASS BALANCE METRICS (AMB, AMBD, RMB, RMBD)
//!
//! **AMB**: assay + total degradants (% label claim). 100 means every
//! milligram of API lost is accounted for by measured degradants.
//!
//! **RMB**: degradants recovered as a fraction of API lost. Undefined when no
//! API was lost (`api_assay >= 100`), which is carried as `None` so it can
//! never satisfy a threshold comparison downstream.
//!
//! Deviation conventions:
//! - The dataset pipeline reports SIGNED deviations (`AMB - 100`, `RMB - 1`);
//!   zone thresholds read AMB directly and the sign tells loss from over-recovery.
//! - `calculate_ambd_absolute` / `calculate_rmbd_absolute` are the unsigned
//!   forms for standalone use and are not consumed by classification.

use serde::{Deserialize, Serialize};

use crate::metrics::uncertainty::calculate_z_mb;

/// Nominal mass balance (% label claim)
pub const NOMINAL_MASS_BALANCE: f64 = 100.0;

/// Derived metrics for one row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassBalanceMetrics {
    /// Sum of present degradant cells (0 when none)
    pub total_degradants: f64,
    /// Absolute mass balance (%)
    pub amb: Option<f64>,
    /// Signed AMB deviation from 100
    pub ambd: Option<f64>,
    /// Relative mass balance
    pub rmb: Option<f64>,
    /// Signed RMB deviation from 1
    pub rmbd: Option<f64>,
    /// Uncertainty-normalized AMB deviation
    pub z_mb: Option<f64>,
}

/// Absolute / simple mass balance (%)
pub fn calculate_amb(api_assay: f64, total_degradants: f64) -> f64 {
    api_assay + total_degradants
}

/// Signed AMB deviation
pub fn calculate_ambd(amb: f64) -> f64 {
    amb - NOMINAL_MASS_BALANCE
}

/// Unsigned AMB deviation `|AMB - 100|`
pub fn calculate_ambd_absolute(amb: f64) -> f64 {
    (amb - NOMINAL_MASS_BALANCE).abs()
}

/// Relative mass balance; `None` unless some API was lost
pub fn calculate_rmb(api_assay: f64, total_degradants: f64) -> Option<f64> {
    let api_loss = NOMINAL_MASS_BALANCE - api_assay;
    if api_loss <= 0.0 {
        return None;
    }
    Some(total_degradants / api_loss)
}

/// Signed RMB deviation
pub fn calculate_rmbd(rmb: f64) -> f64 {
    rmb - 1.0
}

/// Unsigned RMB deviation `|RMB - 1|`
pub fn calculate_rmbd_absolute(rmb: f64) -> f64 {
    (rmb - 1.0).abs()
}

/// Compute every derived metric for one row
///
/// A missing assay leaves all assay-dependent metrics missing; the degradant
/// total is always defined.
pub fn compute_metrics(api_assay: Option<f64>, total_degradants: f64, uncertainty: f64) -> MassBalanceMetrics {
    let amb = api_assay.map(|assay| calculate_amb(assay, total_degradants));
    let rmb = api_assay.and_then(|assay| calculate_rmb(assay, total_degradants));

    MassBalanceMetrics {
        total_degradants,
        amb,
        ambd: amb.map(calculate_ambd),
        rmb,
        rmbd: rmb.map(calculate_rmbd),
        z_mb: amb.and_then(|amb| calculate_z_mb(amb, uncertainty)),
    }
}
