//! Score engine: pure functions from lab values to an integer severity
//! score and its risk tier.
//!
//! The engine assumes the caller supplies finite numbers; required-field
//! presence and parsing belong to the form/UI layer. Out-of-range labs are
//! clamped by the formulas, so [`compute_score`] is infallible.

pub mod formula;
pub mod tier;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ScoreError;
pub use formula::{SCORE_MAX, SCORE_MIN};
pub use tier::{tier_for, RiskTier, RISK_TIERS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// One calculation's worth of lab values. Constructed fresh per calculation
/// and discarded after display; which fields a formula reads depends on the
/// variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabInput {
    pub bilirubin: f64,
    pub inr: f64,
    pub creatinine: f64,
    pub dialysis: bool,
    pub sodium: f64,
    pub albumin: f64,
    pub gender: Gender,
}

impl Default for LabInput {
    fn default() -> Self {
        // Neutral values: every formula term vanishes and the score floors.
        Self {
            bilirubin: 1.0,
            inr: 1.0,
            creatinine: 1.0,
            dialysis: false,
            sodium: 137.0,
            albumin: 3.5,
            gender: Gender::Male,
        }
    }
}

/// The scoring formula to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreVariant {
    Original,
    SodiumAdjusted,
    ThreeFactor,
}

impl ScoreVariant {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::SodiumAdjusted => "sodium-adjusted",
            Self::ThreeFactor => "three-factor",
        }
    }
}

impl fmt::Display for ScoreVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ScoreVariant {
    type Err = ScoreError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "original" => Ok(Self::Original),
            "sodium-adjusted" => Ok(Self::SodiumAdjusted),
            "three-factor" => Ok(Self::ThreeFactor),
            other => Err(ScoreError::InvalidVariant(other.to_string())),
        }
    }
}

/// A computed score and its tier. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    pub value: u32,
    pub tier: &'static RiskTier,
}

/// Compute the score for `variant` and look up its risk tier.
///
/// Total for any finite input: the formulas clamp their domains and the
/// tier table covers the whole score range.
pub fn compute_score(variant: ScoreVariant, input: &LabInput) -> ScoreResult {
    let value = match variant {
        ScoreVariant::Original => formula::original(input),
        ScoreVariant::SodiumAdjusted => formula::sodium_adjusted(input),
        ScoreVariant::ThreeFactor => formula::three_factor(input),
    };
    ScoreResult {
        value,
        tier: tier_for(value),
    }
}
