use serde::Serialize;

/// A risk band keyed by an inclusive upper bound on the integer score.
///
/// The five bands are contiguous and exhaustive over the score range, so a
/// lookup is total for any score the formulas can produce. `class` is the
/// stable key a UI layer uses to pick a highlight style; `mortality` is the
/// published 3-month mortality statistic for the band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskTier {
    /// Inclusive upper score bound. A score equal to the bound belongs to
    /// this tier, not the next one; clinical banding depends on this.
    pub max: u32,
    pub label: &'static str,
    pub class: &'static str,
    pub mortality: &'static str,
}

/// Ordered tier table, lowest band first. Process-wide constant.
pub static RISK_TIERS: [RiskTier; 5] = [
    RiskTier {
        max: 9,
        label: "low",
        class: "risk-low",
        mortality: "1.9%",
    },
    RiskTier {
        max: 19,
        label: "moderate",
        class: "risk-moderate",
        mortality: "6.0%",
    },
    RiskTier {
        max: 29,
        label: "high",
        class: "risk-high",
        mortality: "19.6%",
    },
    RiskTier {
        max: 39,
        label: "severe",
        class: "risk-severe",
        mortality: "52.6%",
    },
    RiskTier {
        max: u32::MAX,
        label: "critical",
        class: "risk-critical",
        mortality: "71.3%",
    },
];

/// Return the first tier whose upper bound covers `score`.
///
/// The final bound is `u32::MAX`, so the scan cannot fall off the end.
pub fn tier_for(score: u32) -> &'static RiskTier {
    RISK_TIERS
        .iter()
        .find(|tier| score <= tier.max)
        .unwrap_or(&RISK_TIERS[RISK_TIERS.len() - 1])
}
