#![deny(warnings)]

//! Weekly tick runtime for the simulation.
//!
//! [`advance_week`] is the single state transition: it resolves the week's
//! activities and job, predicts and splits every released song's streams,
//! aggregates projects, ranks the charts, pays the artist, and rolls the
//! calendar. The caller owns the [`GameState`]; nothing here keeps state
//! between calls.

pub mod actions;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sim_core::{
    find_job, ActivityKind, Charts, GameState, Mulberry32, PlatformCharts, STAT_MAX,
    WEEKS_PER_YEAR,
};
use sim_econ::{
    decayed_hype, effective_consecutive, next_consecutive, predict_song_streams, project_week,
    rank, rank_by_metric, split_platforms, ChartInput,
};
use tracing::{debug, info, info_span};

/// Energy regained at the end of every week.
pub const ENERGY_RECOVERY: u32 = 10;

/// KPI summary of one or more resolved weeks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekReport {
    /// Weeks resolved.
    pub weeks_run: u32,
    /// Absolute week the state is now on.
    pub week: u32,
    pub calendar_week: u32,
    pub year: i32,
    /// Payouts from gigs.
    pub activity_payouts: Decimal,
    pub job_pay: Decimal,
    /// Aurafy revenue plus the artist's StreamBox share.
    pub platform_revenue: Decimal,
    pub song_streams: u64,
    pub project_streams: u64,
    pub activities_resolved: u32,
    pub cash: Decimal,
    pub energy: u32,
    pub hype: f64,
}

impl WeekReport {
    fn absorb(&mut self, week: &WeekReport) {
        self.weeks_run += week.weeks_run;
        self.week = week.week;
        self.calendar_week = week.calendar_week;
        self.year = week.year;
        self.activity_payouts += week.activity_payouts;
        self.job_pay += week.job_pay;
        self.platform_revenue += week.platform_revenue;
        self.song_streams += week.song_streams;
        self.project_streams += week.project_streams;
        self.activities_resolved += week.activities_resolved;
        self.cash = week.cash;
        self.energy = week.energy;
        self.hype = week.hype;
    }
}

fn add_hype(hype: f64, gain: f64) -> f64 {
    (hype + gain).min(f64::from(STAT_MAX))
}

/// Apply activities booked for the current calendar week. Returns the
/// payouts to credit and the number applied.
fn resolve_activities(state: &mut GameState) -> (Decimal, u32) {
    let calendar_week = state.calendar_week;
    let week = state.week;
    let artist = &mut state.artist;
    let mut payouts = Decimal::ZERO;
    let mut applied = 0;
    for a in state
        .activities
        .iter_mut()
        .filter(|a| a.week == calendar_week && !a.is_resolved())
    {
        artist.energy = artist.energy.saturating_sub(a.energy_cost);
        let gain = a.hype_gain();
        match a.kind {
            ActivityKind::Gig => {
                payouts += a.payout;
                artist.hype = add_hype(artist.hype, gain);
            }
            ActivityKind::Interview => {
                artist.hype = add_hype(artist.hype, gain);
            }
            ActivityKind::Promo => {}
        }
        a.resolved_week = Some(week);
        applied += 1;
        debug!(id = %a.id.0, kind = ?a.kind, energy = artist.energy, "activity resolved");
    }
    (payouts, applied)
}

/// Pay the held job and charge its energy. Returns the pay credited.
fn apply_job(state: &mut GameState) -> Decimal {
    let Some(job) = state.artist.job_id.as_ref().and_then(find_job) else {
        return Decimal::ZERO;
    };
    state.artist.cash += job.pay;
    state.artist.energy = state.artist.energy.saturating_sub(job.energy);
    job.pay
}

/// Clear last week's per-week results. Promotion counters persist.
fn reset_weekly_marks(state: &mut GameState) {
    for s in &mut state.songs {
        s.week_streams = 0;
        s.platform = None;
    }
    for p in &mut state.projects {
        p.week_streams = 0;
    }
}

/// Predict, split and decay every released song, in catalog order.
fn resolve_songs(state: &mut GameState, rng: &mut Mulberry32) -> u64 {
    let cfg = &state.config;
    let artist = &state.artist;
    let mut total = 0;
    for s in state.songs.iter_mut().filter(|s| s.is_released()) {
        let tier = s.active_promo;
        let consec = effective_consecutive(tier, s.consec_promo);
        let streams = predict_song_streams(s, artist, tier, consec, cfg, rng);
        s.week_streams = streams;
        s.platform = Some(split_platforms(&s.platform_promo, streams, &cfg.platforms, rng));
        s.hype = decayed_hype(s.hype, tier, cfg);
        s.consec_promo = next_consecutive(tier, s.consec_promo);
        total += streams;
        debug!(song = %s.id.0, streams, consec, hype = s.hype, "song week");
    }
    total
}

/// Aggregate released projects, applying the first-week bonus once.
fn resolve_projects(state: &mut GameState) -> u64 {
    let songs = &state.songs;
    let cfg = &state.config;
    let mut total = 0;
    for p in state.projects.iter_mut().filter(|p| p.is_released()) {
        let week = project_week(p, songs, cfg);
        if let Some(eligible) = week.eligible {
            debug!(
                project = %p.id.0,
                singles = eligible.len(),
                bonus = week.bonus,
                "first-week singles"
            );
            p.eligible_released_singles = Some(eligible);
            p.first_week_done = true;
        }
        p.week_streams = week.streams;
        p.consec_promo = next_consecutive(p.active_promo, p.consec_promo);
        total += week.streams;
    }
    total
}

/// Rank released songs and projects. The snapshot is labelled `week + 1`.
pub fn compute_charts(state: &GameState) -> Charts {
    let cfg = &state.config;
    let song_rows = state
        .songs
        .iter()
        .filter(|s| s.is_released())
        .map(|s| ChartInput {
            id: s.id.clone(),
            title: s.title.clone(),
            streams: s.week_streams,
            hype: s.hype,
        })
        .collect();
    let project_rows = state
        .projects
        .iter()
        .filter(|p| p.is_released())
        .map(|p| ChartInput {
            id: p.id.clone(),
            title: p.title.clone(),
            streams: p.week_streams,
            hype: p.hype,
        })
        .collect();
    Charts {
        week: state.week + 1,
        songs: rank(song_rows, &cfg.chart_weights, cfg.sales_per_stream),
        projects: rank(project_rows, &cfg.chart_weights, cfg.sales_per_stream),
    }
}

/// Per-platform top lists from the songs' current breakdowns.
pub fn compute_platform_charts(state: &GameState) -> PlatformCharts {
    let with_split = || {
        state
            .songs
            .iter()
            .filter(|s| s.is_released())
            .filter_map(|s| s.platform.as_ref().map(|b| (s, b)))
    };
    PlatformCharts {
        aurafy: rank_by_metric(
            with_split()
                .map(|(s, b)| (s.id.clone(), s.title.clone(), b.aurafy.streams))
                .collect(),
        ),
        streambox: rank_by_metric(
            with_split()
                .map(|(s, b)| (s.id.clone(), s.title.clone(), b.streambox.views))
                .collect(),
        ),
    }
}

/// Advance the game by one week in place.
///
/// Deterministic: the week's random stream is seeded from
/// `rng_seed + week`, so identical input states give identical results.
pub fn advance_week(state: &mut GameState) -> WeekReport {
    let span = info_span!("advance_week", week = state.week, calendar_week = state.calendar_week);
    let _enter = span.enter();
    let mut rng = Mulberry32::for_week(state.rng_seed, state.week);

    let (activity_payouts, activities_resolved) = resolve_activities(state);
    state.artist.cash += activity_payouts;
    let job_pay = apply_job(state);

    reset_weekly_marks(state);
    let song_streams = resolve_songs(state, &mut rng);
    let project_streams = resolve_projects(state);

    state.charts = compute_charts(state);
    state.platform_charts = compute_platform_charts(state);

    let platform_revenue: Decimal = state
        .songs
        .iter()
        .filter_map(|s| s.platform.as_ref())
        .map(|b| b.artist_revenue())
        .sum();
    state.artist.cash += platform_revenue;

    state.artist.energy = state.artist.energy.saturating_add(ENERGY_RECOVERY).min(STAT_MAX);

    state.calendar_week += 1;
    if state.calendar_week > WEEKS_PER_YEAR {
        state.calendar_week = 1;
        state.artist.year += 1;
        state.artist.age += 1;
    }
    state.week += 1;

    info!(
        song_streams,
        project_streams,
        %platform_revenue,
        cash = %state.artist.cash,
        energy = state.artist.energy,
        "week resolved"
    );

    WeekReport {
        weeks_run: 1,
        week: state.week,
        calendar_week: state.calendar_week,
        year: state.artist.year,
        activity_payouts,
        job_pay,
        platform_revenue,
        song_streams,
        project_streams,
        activities_resolved,
        cash: state.artist.cash,
        energy: state.artist.energy,
        hype: state.artist.hype,
    }
}

/// Advance `weeks` times in place, returning the cumulative report.
pub fn run_weeks_in_place(state: &mut GameState, weeks: u32) -> WeekReport {
    let mut report = WeekReport {
        week: state.week,
        calendar_week: state.calendar_week,
        year: state.artist.year,
        cash: state.artist.cash,
        energy: state.artist.energy,
        hype: state.artist.hype,
        ..WeekReport::default()
    };
    for _ in 0..weeks {
        let week = advance_week(state);
        report.absorb(&week);
    }
    report
}

/// Owned variant of [`run_weeks_in_place`].
pub fn run_weeks(mut state: GameState, weeks: u32) -> (GameState, WeekReport) {
    let report = run_weeks_in_place(&mut state, weeks);
    (state, report)
}
