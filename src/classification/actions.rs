//! Recommended actions and the reference recommendation matrix

use serde::Serialize;

use crate::classification::zones::DiagnosticZone;

/// Returned for labels that carry no recognised zone number
pub const DEFAULT_ACTION: &str = "Expert review required";

/// Zone number → action
static ZONE_ACTIONS: &[(u8, &str)] = &[
    (1, "No investigation required"),
    (2, "Search for additional degradants / volatility studies"),
    (3, "Investigate physical loss or degradation pathways"),
    (4, "Review response factors and integration parameters"),
];

pub fn action_for_zone_number(number: u8) -> &'static str {
    ZONE_ACTIONS
        .iter()
        .find(|(n, _)| *n == number)
        .map(|(_, action)| *action)
        .unwrap_or(DEFAULT_ACTION)
}

/// Parse N from a label starting with "Zone N"
pub fn parse_zone_number(label: &str) -> Option<u8> {
    let rest = label.trim_start().strip_prefix("Zone")?.trim_start();
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Action for a zone label such as "Zone 3 – Physical loss mechanisms"
pub fn recommended_action(zone_label: &str) -> &'static str {
    parse_zone_number(zone_label)
        .map(action_for_zone_number)
        .unwrap_or(DEFAULT_ACTION)
}

impl DiagnosticZone {
    pub fn recommended_action(&self) -> &'static str {
        action_for_zone_number(self.number())
    }
}

/// One row of the reference matrix shown alongside results
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RecommendationRow {
    pub amb_range: &'static str,
    pub rmb_range: &'static str,
    pub interpretation: &'static str,
    pub action: &'static str,
}

/// Static reference table; ranges mirror the zone thresholds
pub static RECOMMENDATION_MATRIX: [RecommendationRow; 4] = [
    RecommendationRow {
        amb_range: "98–102",
        rmb_range: "0.8–1.2",
        interpretation: "Analytically consistent recovery",
        action: "No action required",
    },
    RecommendationRow {
        amb_range: "<98",
        rmb_range: "<0.8",
        interpretation: "Missing / non-chromophoric degradants",
        action: "Orthogonal testing (LC–MS, CAD/ELSD, alternate column)",
    },
    RecommendationRow {
        amb_range: "<98",
        rmb_range: "0.8–1.2",
        interpretation: "Physical loss (adsorption / volatility)",
        action: "Investigate physical loss (vial adsorption, headspace)",
    },
    RecommendationRow {
        amb_range: ">102",
        rmb_range: ">1.2",
        interpretation: "Overestimation or response factor mismatch",
        action: "Verify RRFs, peak purity, and integration parameters",
    },
];
