//! Tunable parameters for the weekly simulation.
//!
//! Every struct is `#[serde(default)]`, so a partial override file only needs
//! to name the fields it changes.

use crate::{AudioPromoTier, PromoTier, ValidationError, VideoPromoTier};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inclusive bounds on a song's predicted weekly streams.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamsClamp {
    pub min: u64,
    pub max: u64,
}

impl Default for StreamsClamp {
    fn default() -> Self {
        Self {
            min: 200,
            max: 8_000_000,
        }
    }
}

/// Base multiplier per song/project promotion tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromoMultipliers {
    pub none: f64,
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl PromoMultipliers {
    pub fn get(&self, tier: PromoTier) -> f64 {
        match tier {
            PromoTier::None => self.none,
            PromoTier::Low => self.low,
            PromoTier::Medium => self.medium,
            PromoTier::High => self.high,
        }
    }
}

impl Default for PromoMultipliers {
    fn default() -> Self {
        Self {
            none: 1.0,
            low: 1.08,
            medium: 1.18,
            high: 1.35,
        }
    }
}

/// Weekly hype loss for a released song.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HypeDecay {
    /// Applied every week.
    pub base: f64,
    /// Extra loss when the song has no active promotion.
    pub no_promo_bonus: f64,
    /// Loss forgiven while promoted at `HIGH`.
    pub high_promo_relief: f64,
}

impl Default for HypeDecay {
    fn default() -> Self {
        Self {
            base: 3.0,
            no_promo_bonus: 2.0,
            high_promo_relief: 1.0,
        }
    }
}

/// Composite chart score weights applied to per-metric z-scores.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartWeights {
    pub streams: f64,
    pub sales: f64,
    pub hype: f64,
}

impl Default for ChartWeights {
    fn default() -> Self {
        Self {
            streams: 0.6,
            sales: 0.3,
            hype: 0.1,
        }
    }
}

/// Track-count windows for EPs and albums, plus the first-week singles cap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectRules {
    pub ep_min: usize,
    pub ep_max: usize,
    pub album_min: usize,
    pub album_max: usize,
    pub singles_cap: usize,
}

impl Default for ProjectRules {
    fn default() -> Self {
        Self {
            ep_min: 3,
            ep_max: 7,
            album_min: 8,
            album_max: 14,
            singles_cap: 4,
        }
    }
}

/// Inclusive range a platform lift is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LiftRange {
    pub min: f64,
    pub max: f64,
}

impl LiftRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, lift: f64) -> bool {
        (self.min..=self.max).contains(&lift)
    }
}

/// Lift ranges on the audio platform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioPromoLifts {
    pub banner: LiftRange,
    pub editorial: LiftRange,
    pub sponsored: LiftRange,
}

impl AudioPromoLifts {
    pub fn get(&self, tier: AudioPromoTier) -> LiftRange {
        match tier {
            AudioPromoTier::Banner => self.banner,
            AudioPromoTier::Editorial => self.editorial,
            AudioPromoTier::Sponsored => self.sponsored,
        }
    }
}

impl Default for AudioPromoLifts {
    fn default() -> Self {
        Self {
            banner: LiftRange::new(1.3, 1.6),
            editorial: LiftRange::new(1.8, 2.4),
            sponsored: LiftRange::new(1.15, 1.3),
        }
    }
}

/// Lift ranges on the video platform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoPromoLifts {
    pub featured: LiftRange,
    pub trending: LiftRange,
    pub preroll: LiftRange,
}

impl VideoPromoLifts {
    pub fn get(&self, tier: VideoPromoTier) -> LiftRange {
        match tier {
            VideoPromoTier::Featured => self.featured,
            VideoPromoTier::Trending => self.trending,
            VideoPromoTier::Preroll => self.preroll,
        }
    }
}

impl Default for VideoPromoLifts {
    fn default() -> Self {
        Self {
            featured: LiftRange::new(1.25, 1.5),
            trending: LiftRange::new(1.6, 2.2),
            preroll: LiftRange::new(1.0, 1.0),
        }
    }
}

/// Audio streaming service ("Aurafy"): paid per stream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioPlatform {
    pub label: String,
    /// Fraction of a song's total weekly streams heard here.
    pub audience_share: f64,
    /// USD paid per stream.
    pub payout_per_stream: Decimal,
    pub promo_lifts: AudioPromoLifts,
}

impl Default for AudioPlatform {
    fn default() -> Self {
        Self {
            label: "Aurafy".to_string(),
            audience_share: 0.55,
            payout_per_stream: Decimal::new(35, 4), // 0.0035
            promo_lifts: AudioPromoLifts::default(),
        }
    }
}

/// Video streaming service ("StreamBox"): ad-funded, paid per thousand views.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoPlatform {
    pub label: String,
    pub audience_share: f64,
    /// Average ad revenue per 1000 monetized views, USD.
    pub cpm_avg: Decimal,
    /// Fraction of views that carry an ad.
    pub monetizable_share: f64,
    /// Audio-stream equivalents per view.
    pub stream_eq_per_view: f64,
    /// Artist's cut of ad revenue.
    pub artist_rev_share: Decimal,
    pub promo_lifts: VideoPromoLifts,
}

impl Default for VideoPlatform {
    fn default() -> Self {
        Self {
            label: "StreamBox".to_string(),
            audience_share: 0.45,
            cpm_avg: Decimal::new(22, 1),
            monetizable_share: 0.75,
            stream_eq_per_view: 0.8,
            artist_rev_share: Decimal::new(45, 2),
            promo_lifts: VideoPromoLifts::default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Platforms {
    pub aurafy: AudioPlatform,
    pub streambox: VideoPlatform,
}

/// Session-wide tunables. Replaced only by explicit reset/override actions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub version: String,
    pub streams_clamp: StreamsClamp,
    pub promo_multipliers: PromoMultipliers,
    /// Fatigue factor per extra consecutive promoted week, in (0, 1].
    pub promo_consecutive_penalty: f64,
    pub hype_decay: HypeDecay,
    /// Derived chart sales per stream.
    pub sales_per_stream: f64,
    pub chart_weights: ChartWeights,
    pub project_rules: ProjectRules,
    pub platforms: Platforms,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            version: crate::ENGINE_VERSION.to_string(),
            streams_clamp: StreamsClamp::default(),
            promo_multipliers: PromoMultipliers::default(),
            promo_consecutive_penalty: 0.92,
            hype_decay: HypeDecay::default(),
            sales_per_stream: 0.01,
            chart_weights: ChartWeights::default(),
            project_rules: ProjectRules::default(),
            platforms: Platforms::default(),
        }
    }
}

fn finite_non_negative(values: &[f64]) -> Result<(), ValidationError> {
    for v in values {
        if !v.is_finite() {
            return Err(ValidationError::NonFinite);
        }
        if *v < 0.0 {
            return Err(ValidationError::NegativeValue);
        }
    }
    Ok(())
}

fn validate_share(share: f64) -> Result<(), ValidationError> {
    if !share.is_finite() || !(0.0..=1.0).contains(&share) {
        return Err(ValidationError::ShareOutOfRange(share));
    }
    Ok(())
}

fn validate_lift(range: LiftRange) -> Result<(), ValidationError> {
    finite_non_negative(&[range.min, range.max])?;
    if range.min > range.max {
        return Err(ValidationError::InvertedRange);
    }
    Ok(())
}

/// Validate a config before it is installed on a game.
pub fn validate_config(cfg: &SimConfig) -> Result<(), ValidationError> {
    if cfg.streams_clamp.min > cfg.streams_clamp.max {
        return Err(ValidationError::InvertedRange);
    }
    let m = &cfg.promo_multipliers;
    finite_non_negative(&[m.none, m.low, m.medium, m.high])?;
    let p = cfg.promo_consecutive_penalty;
    if !p.is_finite() || p <= 0.0 || p > 1.0 {
        return Err(ValidationError::PenaltyOutOfRange(p));
    }
    let d = &cfg.hype_decay;
    finite_non_negative(&[d.base, d.no_promo_bonus, d.high_promo_relief])?;
    let w = &cfg.chart_weights;
    finite_non_negative(&[cfg.sales_per_stream, w.streams, w.sales, w.hype])?;

    let r = &cfg.project_rules;
    if r.ep_min > r.ep_max || r.album_min > r.album_max || r.ep_max >= r.album_min {
        return Err(ValidationError::InvalidProjectRules);
    }

    let a = &cfg.platforms.aurafy;
    validate_share(a.audience_share)?;
    if a.payout_per_stream < Decimal::ZERO {
        return Err(ValidationError::NegativeMoney);
    }
    validate_lift(a.promo_lifts.banner)?;
    validate_lift(a.promo_lifts.editorial)?;
    validate_lift(a.promo_lifts.sponsored)?;

    let v = &cfg.platforms.streambox;
    validate_share(v.audience_share)?;
    validate_share(v.monetizable_share)?;
    finite_non_negative(&[v.stream_eq_per_view])?;
    if v.cpm_avg < Decimal::ZERO || v.artist_rev_share < Decimal::ZERO {
        return Err(ValidationError::NegativeMoney);
    }
    validate_lift(v.promo_lifts.featured)?;
    validate_lift(v.promo_lifts.trending)?;
    validate_lift(v.promo_lifts.preroll)?;
    Ok(())
}
