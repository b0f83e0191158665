//! Diagnostic zone classification
//!
//! Zones are assigned by an ordered rule list, first match wins. Rule 1
//! (analytical variability) is checked before any AMB/RMB rule, so a row with
//! small |Z_MB| is Zone 1 even when its AMB/RMB would also match a later rule.
//!
//! A missing operand fails every comparison that reads it; a row with no RMB
//! can only land in Zone 1 or the fallback.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::metrics::{MassBalanceMetrics, Z_VARIABILITY_LIMIT};

pub const AMB_LOWER_LIMIT: f64 = 98.0;
pub const AMB_UPPER_LIMIT: f64 = 102.0;
pub const RMB_LOWER_LIMIT: f64 = 0.8;
pub const RMB_UPPER_LIMIT: f64 = 1.2;

/// Zone outcome
///
/// Zone 3 has two outcomes with distinct labels: a matched physical-loss
/// pattern and the fallback for anything no other rule explains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticZone {
    AnalyticalVariability,
    MissingDegradants,
    PhysicalLoss,
    Overestimation,
    MethodOrPathwayIssue,
}

impl DiagnosticZone {
    pub const ALL: [DiagnosticZone; 5] = [
        DiagnosticZone::AnalyticalVariability,
        DiagnosticZone::MissingDegradants,
        DiagnosticZone::PhysicalLoss,
        DiagnosticZone::Overestimation,
        DiagnosticZone::MethodOrPathwayIssue,
    ];

    pub fn number(&self) -> u8 {
        match self {
            DiagnosticZone::AnalyticalVariability => 1,
            DiagnosticZone::MissingDegradants => 2,
            DiagnosticZone::PhysicalLoss => 3,
            DiagnosticZone::Overestimation => 4,
            DiagnosticZone::MethodOrPathwayIssue => 3,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DiagnosticZone::AnalyticalVariability => "Analytical variability",
            DiagnosticZone::MissingDegradants => "Missing or undetected degradants",
            DiagnosticZone::PhysicalLoss => "Physical loss mechanisms",
            DiagnosticZone::Overestimation => "Overestimation / RF mismatch",
            DiagnosticZone::MethodOrPathwayIssue => "Method or degradation pathway issue",
        }
    }

    /// Full label, e.g. "Zone 2 – Missing or undetected degradants"
    pub fn label(&self) -> String {
        format!("Zone {} – {}", self.number(), self.description())
    }
}

impl fmt::Display for DiagnosticZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Zone {} – {}", self.number(), self.description())
    }
}

/// Classifier operands for one row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneInputs {
    pub amb: Option<f64>,
    pub rmb: Option<f64>,
    pub z_mb: Option<f64>,
}

impl From<&MassBalanceMetrics> for ZoneInputs {
    fn from(m: &MassBalanceMetrics) -> Self {
        Self {
            amb: m.amb,
            rmb: m.rmb,
            z_mb: m.z_mb,
        }
    }
}

/// One entry of the ordered decision list
pub struct ZoneRule {
    pub zone: DiagnosticZone,
    pub condition: &'static str,
    pub matches: fn(&ZoneInputs) -> bool,
}

fn within_variability(x: &ZoneInputs) -> bool {
    x.z_mb.is_some_and(|z| z.abs() <= Z_VARIABILITY_LIMIT)
}

fn low_amb(x: &ZoneInputs) -> bool {
    x.amb.is_some_and(|amb| amb < AMB_LOWER_LIMIT)
}

fn missing_degradants(x: &ZoneInputs) -> bool {
    low_amb(x) && x.rmb.is_some_and(|rmb| rmb < RMB_LOWER_LIMIT)
}

fn physical_loss(x: &ZoneInputs) -> bool {
    low_amb(x) && x.rmb.is_some_and(|rmb| (RMB_LOWER_LIMIT..=RMB_UPPER_LIMIT).contains(&rmb))
}

fn overestimation(x: &ZoneInputs) -> bool {
    x.amb.is_some_and(|amb| amb > AMB_UPPER_LIMIT) && x.rmb.is_some_and(|rmb| rmb > RMB_UPPER_LIMIT)
}

/// Decision list, evaluated top to bottom
pub static ZONE_RULES: &[ZoneRule] = &[
    ZoneRule {
        zone: DiagnosticZone::AnalyticalVariability,
        condition: "|Z_MB| <= 2",
        matches: within_variability,
    },
    ZoneRule {
        zone: DiagnosticZone::MissingDegradants,
        condition: "AMB < 98 and RMB < 0.8",
        matches: missing_degradants,
    },
    ZoneRule {
        zone: DiagnosticZone::PhysicalLoss,
        condition: "AMB < 98 and 0.8 <= RMB <= 1.2",
        matches: physical_loss,
    },
    ZoneRule {
        zone: DiagnosticZone::Overestimation,
        condition: "AMB > 102 and RMB > 1.2",
        matches: overestimation,
    },
];

/// Zone assigned when no rule matches
pub const FALLBACK_ZONE: DiagnosticZone = DiagnosticZone::MethodOrPathwayIssue;

/// Classify one row
pub fn classify_zone(inputs: &ZoneInputs) -> DiagnosticZone {
    ZONE_RULES
        .iter()
        .find(|rule| (rule.matches)(inputs))
        .map(|rule| rule.zone)
        .unwrap_or(FALLBACK_ZONE)
}

/// Convenience wrapper over raw operands
pub fn diagnostic_zone(amb: Option<f64>, rmb: Option<f64>, z_mb: Option<f64>) -> DiagnosticZone {
    classify_zone(&ZoneInputs { amb, rmb, z_mb })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_one_precedes_amb_rules() {
        // AMB 97 < 98 and RMB 0.5 < 0.8, but Z_MB = -1.2
        let zone = diagnostic_zone(Some(97.0), Some(0.5), Some(-1.2));
        assert_eq!(zone, DiagnosticZone::AnalyticalVariability);
    }

    #[test]
    fn test_each_rule() {
        assert_eq!(diagnostic_zone(Some(92.0), Some(0.2), Some(-3.2)), DiagnosticZone::MissingDegradants);
        assert_eq!(diagnostic_zone(Some(92.0), Some(0.8), Some(-3.2)), DiagnosticZone::PhysicalLoss);
        assert_eq!(diagnostic_zone(Some(92.0), Some(1.2), Some(-3.2)), DiagnosticZone::PhysicalLoss);
        assert_eq!(diagnostic_zone(Some(108.0), Some(1.5), Some(3.2)), DiagnosticZone::Overestimation);
    }

    #[test]
    fn test_fallback_cases() {
        // Low AMB with RMB above 1.2
        assert_eq!(diagnostic_zone(Some(92.0), Some(1.5), Some(-3.2)), FALLBACK_ZONE);
        // High AMB with RMB in range
        assert_eq!(diagnostic_zone(Some(108.0), Some(1.0), Some(3.2)), FALLBACK_ZONE);
        // Missing RMB fails every RMB rule
        assert_eq!(diagnostic_zone(Some(108.0), None, Some(3.2)), FALLBACK_ZONE);
        assert_eq!(diagnostic_zone(Some(92.0), None, Some(-3.2)), FALLBACK_ZONE);
        // Nothing known
        assert_eq!(diagnostic_zone(None, None, None), FALLBACK_ZONE);
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(diagnostic_zone(Some(105.0), Some(2.0), Some(2.0)), DiagnosticZone::AnalyticalVariability);
        assert_eq!(diagnostic_zone(Some(98.0), Some(0.1), Some(-2.1)), FALLBACK_ZONE);
        assert_eq!(diagnostic_zone(Some(102.0), Some(5.0), Some(2.1)), FALLBACK_ZONE);
    }

    #[test]
    fn test_labels_share_zone_three() {
        assert_eq!(DiagnosticZone::PhysicalLoss.number(), 3);
        assert_eq!(DiagnosticZone::MethodOrPathwayIssue.number(), 3);
        assert_ne!(DiagnosticZone::PhysicalLoss.label(), DiagnosticZone::MethodOrPathwayIssue.label());
        assert_eq!(DiagnosticZone::MissingDegradants.label(), "Zone 2 – Missing or undetected degradants");
        assert_eq!(DiagnosticZone::Overestimation.to_string(), DiagnosticZone::Overestimation.label());
    }

    #[test]
    fn test_exactly_one_zone_per_grid_point() {
        let ambs = [None, Some(80.0), Some(97.99), Some(98.0), Some(100.0), Some(102.0), Some(102.01), Some(120.0)];
        let rmbs = [None, Some(0.0), Some(0.79), Some(0.8), Some(1.0), Some(1.2), Some(1.21), Some(3.0)];
        for amb in ambs {
            for rmb in rmbs {
                let z = amb.map(|a| (a - 100.0) / 2.5);
                let inputs = ZoneInputs { amb, rmb, z_mb: z };
                let first = classify_zone(&inputs);
                assert_eq!(classify_zone(&inputs), first);

                let winners: Vec<_> = ZONE_RULES.iter().filter(|r| (r.matches)(&inputs)).collect();
                match winners.first() {
                    Some(rule) => assert_eq!(rule.zone, first),
                    None => assert_eq!(first, FALLBACK_ZONE),
                }
            }
        }
    }
}
