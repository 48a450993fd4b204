//! Per-platform audience split and payouts.
//!
//! Each song's weekly total is divided between the audio service (paid per
//! stream) and the video service (ad-funded, paid per thousand monetized
//! views). Both shares get independent variance, then any platform promo
//! lift already assigned to the song.

use rust_decimal::Decimal;
use sim_core::{
    sample_normal_clamped, AudioPlatform, AudioWeek, PlatformBreakdown, PlatformPromos,
    Platforms, UnitSource, VideoPlatform, VideoWeek,
};

/// Audio variance: N(1.0, 0.15) clamped to [0.75, 1.35].
const AUDIO_VARIANCE: (f64, f64, f64, f64) = (1.0, 0.15, 0.75, 1.35);
/// Video variance: N(1.0, 0.20) clamped to [0.7, 1.4].
const VIDEO_VARIANCE: (f64, f64, f64, f64) = (1.0, 0.20, 0.7, 1.4);

fn round_count(x: f64) -> u64 {
    let r = x.round();
    if r.is_finite() && r > 0.0 {
        r as u64
    } else {
        0
    }
}

fn vary<R: UnitSource + ?Sized>(rng: &mut R, audience: u64, band: (f64, f64, f64, f64)) -> u64 {
    let (mean, sd, lo, hi) = band;
    let factor = sample_normal_clamped(rng, mean, sd, lo, hi);
    round_count(audience as f64 * factor)
}

/// Multiply by an assigned lift, if any.
fn apply_lift(audience: u64, lift: Option<f64>) -> u64 {
    match lift {
        Some(lift) => round_count(audience as f64 * lift),
        None => audience,
    }
}

/// Audio-platform week for `total` streams. Consumes two draws.
pub fn audio_week<R: UnitSource + ?Sized>(
    total: u64,
    lift: Option<f64>,
    platform: &AudioPlatform,
    rng: &mut R,
) -> AudioWeek {
    let audience = round_count(total as f64 * platform.audience_share);
    let streams = apply_lift(vary(rng, audience, AUDIO_VARIANCE), lift);
    AudioWeek {
        streams,
        revenue: Decimal::from(streams) * platform.payout_per_stream,
    }
}

/// Video-platform week for `total` streams. Consumes two draws.
pub fn video_week<R: UnitSource + ?Sized>(
    total: u64,
    lift: Option<f64>,
    platform: &VideoPlatform,
    rng: &mut R,
) -> VideoWeek {
    let audience = round_count(total as f64 * platform.audience_share);
    let views = apply_lift(vary(rng, audience, VIDEO_VARIANCE), lift);
    let monetized_views = round_count(views as f64 * platform.monetizable_share);
    let ad_revenue = Decimal::from(monetized_views) / Decimal::ONE_THOUSAND * platform.cpm_avg;
    VideoWeek {
        views,
        monetized_views,
        ad_revenue,
        artist_revenue: ad_revenue * platform.artist_rev_share,
        stream_eq: round_count(views as f64 * platform.stream_eq_per_view),
    }
}

/// Split a song's weekly streams across both platforms.
///
/// Audio is resolved before video, so the draw order is fixed. Promo state
/// is only read here; assigning it is the caller's job.
pub fn split_platforms<R: UnitSource + ?Sized>(
    promos: &PlatformPromos,
    total_streams: u64,
    platforms: &Platforms,
    rng: &mut R,
) -> PlatformBreakdown {
    let aurafy = audio_week(
        total_streams,
        promos.aurafy.map(|p| p.lift),
        &platforms.aurafy,
        rng,
    );
    let streambox = video_week(
        total_streams,
        promos.streambox.map(|p| p.lift),
        &platforms.streambox,
        rng,
    );
    PlatformBreakdown { aurafy, streambox }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sim_core::{AudioPromoTier, Mulberry32, PlatformPromo, SimConfig, VideoPromoTier};

    /// Always returns the same unit value.
    struct Fixed(f64);

    impl UnitSource for Fixed {
        fn next_unit(&mut self) -> f64 {
            self.0
        }
    }

    // u = v = 1 - 0.75 = 0.25: cos(2*pi*0.25) = 0, so every normal draw hits the mean.
    fn neutral() -> Fixed {
        Fixed(0.75)
    }

    #[test]
    fn neutral_split_uses_shares_and_rates() {
        let cfg = SimConfig::default();
        let b = split_platforms(&PlatformPromos::default(), 10_000, &cfg.platforms, &mut neutral());
        assert_eq!(b.aurafy.streams, 5500);
        assert_eq!(b.aurafy.revenue, Decimal::new(1925, 2)); // 5500 * 0.0035
        assert_eq!(b.streambox.views, 4500);
        assert_eq!(b.streambox.monetized_views, 3375);
        // 3.375 * 2.2
        assert_eq!(b.streambox.ad_revenue, Decimal::new(7425, 3));
        // 7.425 * 0.45
        assert_eq!(b.streambox.artist_revenue, Decimal::new(334125, 5));
        assert_eq!(b.streambox.stream_eq, 3600);
        assert_eq!(b.artist_revenue(), Decimal::new(1925, 2) + Decimal::new(334125, 5));
    }

    #[test]
    fn lifts_multiply_audience() {
        let cfg = SimConfig::default();
        let promos = PlatformPromos {
            aurafy: Some(PlatformPromo { tier: AudioPromoTier::Editorial, lift: 2.0 }),
            streambox: Some(PlatformPromo { tier: VideoPromoTier::Featured, lift: 1.5 }),
        };
        let b = split_platforms(&promos, 10_000, &cfg.platforms, &mut neutral());
        assert_eq!(b.aurafy.streams, 11_000);
        assert_eq!(b.streambox.views, 6750);
    }

    #[test]
    fn split_consumes_four_draws() {
        let cfg = SimConfig::default();
        let mut a = Mulberry32::new(31);
        let _ = split_platforms(&PlatformPromos::default(), 5000, &cfg.platforms, &mut a);
        let mut b = Mulberry32::new(31);
        for _ in 0..4 {
            let _ = b.next_unit();
        }
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn variance_stays_in_band(total in 200u64..8_000_000, seed in any::<u32>()) {
            let cfg = SimConfig::default();
            let b = split_platforms(&PlatformPromos::default(), total, &cfg.platforms, &mut Mulberry32::new(seed));
            let a_base = (total as f64 * 0.55).round();
            let v_base = (total as f64 * 0.45).round();
            prop_assert!(b.aurafy.streams as f64 >= (a_base * 0.75).round());
            prop_assert!(b.aurafy.streams as f64 <= (a_base * 1.35).round());
            prop_assert!(b.streambox.views as f64 >= (v_base * 0.7).round());
            prop_assert!(b.streambox.views as f64 <= (v_base * 1.4).round());
            prop_assert!(b.streambox.monetized_views <= b.streambox.views);
        }
    }
}
