//! Promotion fatigue and hype decay.

use sim_core::{PromoTier, SimConfig};

/// Multiplier for a promotion tier held for `consecutive_weeks`.
///
/// Weeks beyond the first are penalised geometrically:
/// `base * penalty^(consecutive_weeks - 1)`. Zero and one both mean "fresh".
pub fn promo_multiplier(tier: PromoTier, consecutive_weeks: u32, cfg: &SimConfig) -> f64 {
    let base = cfg.promo_multipliers.get(tier);
    if consecutive_weeks <= 1 {
        return base;
    }
    let extra = i32::try_from(consecutive_weeks - 1).unwrap_or(i32::MAX);
    base * cfg.promo_consecutive_penalty.powi(extra)
}

/// Consecutive count fed to the multiplier this week.
///
/// An active promotion uses the counter as it stood before this week's
/// increment (a zero counter reads as 1); an inactive one always reads 1.
pub fn effective_consecutive(tier: PromoTier, counter: u32) -> u32 {
    if tier.is_active() {
        counter.max(1)
    } else {
        1
    }
}

/// Counter value after a week at `tier`: +1 while promoted, reset otherwise.
pub fn next_consecutive(tier: PromoTier, counter: u32) -> u32 {
    if tier.is_active() {
        counter.saturating_add(1)
    } else {
        0
    }
}

/// Weekly hype loss for a released song at `tier`.
pub fn hype_decay(tier: PromoTier, cfg: &SimConfig) -> f64 {
    let d = &cfg.hype_decay;
    let mut decay = d.base;
    if !tier.is_active() {
        decay += d.no_promo_bonus;
    }
    if tier == PromoTier::High {
        decay -= d.high_promo_relief;
    }
    decay
}

/// Apply one week of decay, floored at zero.
pub fn decayed_hype(hype: f64, tier: PromoTier, cfg: &SimConfig) -> f64 {
    (hype - hype_decay(tier, cfg)).max(0.0)
}
