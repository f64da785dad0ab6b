//! The three MELD-family formulas as pure functions.
//!
//! Every formula is total over finite numeric input: values outside the
//! clinical domain are clamped, never rejected. Raw values are rounded to
//! the nearest integer BEFORE clamping to the score range; reversing that
//! order shifts results at the boundaries.

use super::{Gender, LabInput};

pub const SCORE_MIN: u32 = 6;
pub const SCORE_MAX: u32 = 40;

/// Sodium-adjustment only applies at or above this base score.
/// Explicit medical cutoff, not an optimization.
const SODIUM_ADJUST_THRESHOLD: u32 = 12;

const SODIUM_LOW: f64 = 125.0;
const SODIUM_HIGH: f64 = 137.0;

/// Natural log over the formula's floored domain: labs below 1.0 clamp up
/// so the logarithm never goes negative.
fn ln_floored(value: f64) -> f64 {
    value.max(1.0).ln()
}

/// Round to nearest, then clamp into the score range.
fn round_then_clamp(raw: f64) -> u32 {
    (raw.round() as i64).clamp(SCORE_MIN as i64, SCORE_MAX as i64) as u32
}

/// Original variant: bilirubin, INR, creatinine, dialysis flag.
pub fn original(input: &LabInput) -> u32 {
    // Dialysis proxies for maximal renal impairment.
    let creatinine = if input.dialysis || input.creatinine > 4.0 {
        4.0
    } else {
        input.creatinine.max(1.0)
    };

    let raw = 3.78 * ln_floored(input.bilirubin)
        + 11.2 * ln_floored(input.inr)
        + 9.57 * creatinine.ln()
        + 6.43;

    round_then_clamp(raw)
}

/// Sodium-adjusted variant, built on [`original`].
pub fn sodium_adjusted(input: &LabInput) -> u32 {
    let base = original(input);
    if base < SODIUM_ADJUST_THRESHOLD {
        return base;
    }

    let sodium = input.sodium.clamp(SODIUM_LOW, SODIUM_HIGH);
    let deficit = SODIUM_HIGH - sodium;
    let adjusted = base as f64 + 1.32 * deficit - 0.033 * base as f64 * deficit;

    round_then_clamp(adjusted)
}

/// Three-factor variant before rounding. Exposed separately so the exact
/// female/male offset (1.33) is observable pre-rounding.
pub fn three_factor_raw(input: &LabInput) -> f64 {
    let bilirubin = ln_floored(input.bilirubin);
    let inr = ln_floored(input.inr);
    // Two-sided clamps, unlike the original variant.
    let creatinine = input.creatinine.clamp(1.0, 3.0).ln();
    let sodium_deficit = SODIUM_HIGH - input.sodium.clamp(SODIUM_LOW, SODIUM_HIGH);
    let albumin_deficit = 3.5 - input.albumin.clamp(1.5, 3.5);
    let gender_term = match input.gender {
        Gender::Female => 1.33,
        Gender::Male => 0.0,
    };

    gender_term
        + 4.56 * bilirubin
        + 0.82 * sodium_deficit
        - 0.24 * sodium_deficit * bilirubin
        + 9.09 * inr
        + 11.14 * creatinine
        + 1.85 * albumin_deficit
        - 1.83 * albumin_deficit * creatinine
        + 6.0
}

/// Three-factor variant: gender, bilirubin, INR, creatinine, sodium, albumin.
pub fn three_factor(input: &LabInput) -> u32 {
    round_then_clamp(three_factor_raw(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labs() -> LabInput {
        LabInput {
            bilirubin: 1.0,
            inr: 1.0,
            creatinine: 1.0,
            dialysis: false,
            sodium: 137.0,
            albumin: 3.5,
            gender: Gender::Male,
        }
    }

    #[test]
    fn all_labs_at_floor_give_minimum_score() {
        // 3.78*ln(1) + 11.2*ln(1) + 9.57*ln(1) + 6.43 rounds to 6.
        assert_eq!(original(&labs()), 6);
    }

    #[test]
    fn labs_below_floor_clamp_up() {
        let input = LabInput {
            bilirubin: 0.4,
            inr: 0.0,
            creatinine: 0.7,
            ..labs()
        };
        assert_eq!(original(&input), original(&labs()));
    }

    #[test]
    fn dialysis_caps_creatinine_at_four() {
        let on_dialysis = LabInput {
            creatinine: 1.2,
            dialysis: true,
            ..labs()
        };
        let maximal_renal = LabInput {
            creatinine: 4.0,
            ..labs()
        };
        assert_eq!(original(&on_dialysis), original(&maximal_renal));

        let above_cap = LabInput {
            creatinine: 9.0,
            ..labs()
        };
        assert_eq!(original(&above_cap), original(&maximal_renal));
    }

    #[test]
    fn original_known_value() {
        // 3.78*ln(2) + 11.2*ln(1.5) + 6.43 = 13.59 -> 14
        let input = LabInput {
            bilirubin: 2.0,
            inr: 1.5,
            ..labs()
        };
        assert_eq!(original(&input), 14);
    }

    #[test]
    fn original_never_exceeds_forty() {
        let input = LabInput {
            bilirubin: 80.0,
            inr: 12.0,
            creatinine: 9.0,
            ..labs()
        };
        assert_eq!(original(&input), 40);
    }

    #[test]
    fn sodium_adjustment_skipped_below_threshold() {
        // bilirubin 3.2 -> base 11, just under the cutoff.
        let input = LabInput {
            bilirubin: 3.2,
            sodium: 125.0,
            ..labs()
        };
        assert_eq!(original(&input), 11);
        assert_eq!(sodium_adjusted(&input), 11);
    }

    #[test]
    fn sodium_adjustment_applies_at_threshold() {
        // bilirubin 4.0 -> base 12, exactly at the cutoff: the adjustment
        // branch must run. 12 + 1.32*12 - 0.033*12*12 = 23.088 -> 23.
        let input = LabInput {
            bilirubin: 4.0,
            sodium: 125.0,
            ..labs()
        };
        assert_eq!(original(&input), 12);
        assert_eq!(sodium_adjusted(&input), 23);
    }

    #[test]
    fn sodium_in_normal_range_leaves_base_unchanged() {
        let input = LabInput {
            bilirubin: 4.0,
            sodium: 140.0, // clamps to 137, deficit 0
            ..labs()
        };
        assert_eq!(sodium_adjusted(&input), original(&input));
    }

    #[test]
    fn three_factor_female_offset_is_exact_before_rounding() {
        let male = LabInput {
            bilirubin: 2.4,
            inr: 1.6,
            creatinine: 1.9,
            sodium: 131.0,
            albumin: 2.8,
            ..labs()
        };
        let female = LabInput {
            gender: Gender::Female,
            ..male.clone()
        };
        let delta = three_factor_raw(&female) - three_factor_raw(&male);
        assert!((delta - 1.33).abs() < 1e-9);
    }

    #[test]
    fn three_factor_neutral_labs_give_minimum() {
        // All log terms zero, all deficits zero: raw = 6.0 for a male.
        assert_eq!(three_factor(&labs()), 6);
    }

    #[test]
    fn three_factor_creatinine_clamped_both_sides() {
        let low = LabInput {
            creatinine: 0.3,
            ..labs()
        };
        let floor = LabInput {
            creatinine: 1.0,
            ..labs()
        };
        assert_eq!(three_factor(&low), three_factor(&floor));

        let high = LabInput {
            creatinine: 7.0,
            ..labs()
        };
        let ceiling = LabInput {
            creatinine: 3.0,
            ..labs()
        };
        assert_eq!(three_factor(&high), three_factor(&ceiling));
    }
}
