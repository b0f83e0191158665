//! Metric modules for mass balance diagnostics
//!
//! Pure per-row functions. Nothing here reads a DataFrame.

pub mod mass_balance;
pub mod uncertainty;

// Re-export metric functions
pub use mass_balance::{
    calculate_amb, calculate_ambd, calculate_ambd_absolute, calculate_rmb, calculate_rmbd,
    calculate_rmbd_absolute, compute_metrics, MassBalanceMetrics, NOMINAL_MASS_BALANCE,
};
pub use uncertainty::{
    calculate_combined_uncertainty, calculate_stress_severity, calculate_z_mb, interpret_z_mb,
    RiskBand, ZmbInterpretation, Z_HIGH_RISK_LIMIT, Z_VARIABILITY_LIMIT,
};
