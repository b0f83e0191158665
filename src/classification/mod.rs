//! Zone classification and action lookup
//!
//! - `zones`: ordered decision list over (AMB, RMB, Z_MB)
//! - `actions`: zone number → recommended action, plus the reference matrix

pub mod zones;
pub mod actions;

pub use zones::{
    classify_zone, diagnostic_zone, DiagnosticZone, ZoneInputs, ZoneRule, FALLBACK_ZONE, ZONE_RULES,
};
pub use actions::{
    action_for_zone_number, parse_zone_number, recommended_action, RecommendationRow,
    DEFAULT_ACTION, RECOMMENDATION_MATRIX,
};
