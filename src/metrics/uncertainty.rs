//! Uncertainty, Z_MB and stress context
//!
//! Z_MB expresses the AMB deviation in units of combined analytical
//! uncertainty. |Z_MB| <= 2 is treated as ordinary analytical variability.

use serde::{Deserialize, Serialize};

use crate::metrics::mass_balance::NOMINAL_MASS_BALANCE;

/// |Z_MB| at or below this is within analytical variability
pub const Z_VARIABILITY_LIMIT: f64 = 2.0;

/// |Z_MB| above this is a high-risk deviation
pub const Z_HIGH_RISK_LIMIT: f64 = 3.0;

/// Combined analytical uncertainty σ = sqrt(assay_rsd² + impurity_rsd²)
pub fn calculate_combined_uncertainty(assay_rsd: f64, impurity_rsd: f64) -> f64 {
    libm::hypot(assay_rsd, impurity_rsd)
}

/// Signed Z_MB; `None` when the uncertainty is zero
pub fn calculate_z_mb(amb: f64, uncertainty: f64) -> Option<f64> {
    if uncertainty == 0.0 {
        return None;
    }
    Some((amb - NOMINAL_MASS_BALANCE) / uncertainty)
}

/// Stress severity index
///
/// Contextual only, never used for acceptance decisions.
pub fn calculate_stress_severity(temperature_c: f64, time_months: f64, stress_factor: f64) -> f64 {
    temperature_c * time_months * stress_factor
}

/// Interpretation of a Z_MB value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZmbInterpretation {
    Invalid,
    WithinVariability,
    SignificantLoss,
    SignificantOverRecovery,
}

impl ZmbInterpretation {
    pub fn label(&self) -> &'static str {
        match self {
            ZmbInterpretation::Invalid => "Invalid Z_MB",
            ZmbInterpretation::WithinVariability => "Within analytical variability",
            ZmbInterpretation::SignificantLoss => "Statistically significant mass loss",
            ZmbInterpretation::SignificantOverRecovery => "Statistically significant over-recovery",
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            ZmbInterpretation::Invalid => "Check uncertainty inputs",
            ZmbInterpretation::WithinVariability => "Acceptable",
            ZmbInterpretation::SignificantLoss => "Investigate imbalance",
            ZmbInterpretation::SignificantOverRecovery => "Check response factors",
        }
    }
}

/// Interpret Z_MB as (label, status)
pub fn interpret_z_mb(z_mb: Option<f64>) -> ZmbInterpretation {
    match z_mb {
        None => ZmbInterpretation::Invalid,
        Some(z) if z.abs() <= Z_VARIABILITY_LIMIT => ZmbInterpretation::WithinVariability,
        Some(z) if z < -Z_VARIABILITY_LIMIT => ZmbInterpretation::SignificantLoss,
        Some(_) => ZmbInterpretation::SignificantOverRecovery,
    }
}

/// Traffic-light band used by the Z_MB chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBand {
    Green,
    Amber,
    Red,
    Unknown,
}

impl RiskBand {
    pub fn from_z_mb(z_mb: Option<f64>) -> Self {
        match z_mb.map(f64::abs) {
            None => RiskBand::Unknown,
            Some(z) if z <= Z_VARIABILITY_LIMIT => RiskBand::Green,
            Some(z) if z <= Z_HIGH_RISK_LIMIT => RiskBand::Amber,
            Some(_) => RiskBand::Red,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RiskBand::Green => "#4CAF50",
            RiskBand::Amber => "#FFC107",
            RiskBand::Red => "#F44336",
            RiskBand::Unknown => "#9E9E9E",
        }
    }
}
