//! Player actions between ticks.
//!
//! These build or flag entities on the [`GameState`] and reject inputs that
//! would break the invariants the weekly tick relies on. None of them advance
//! time.

use rand::Rng;
use rust_decimal::Decimal;
use sim_core::{
    find_job, project_kind_for, validate_config, Activity, ActivityId, ActivityKind,
    AudioPromoTier, GameState, JobId, LiftRange, PlatformPromo, Project, ProjectId, PromoTier,
    SimConfig, Song, SongId, SongStatus, ValidationError, VideoPromoTier, WEEKS_PER_YEAR,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Rejections surfaced to the action layer.
#[derive(Debug, Error, PartialEq)]
pub enum ActionError {
    #[error("unknown song: {0}")]
    UnknownSong(String),
    #[error("unknown project: {0}")]
    UnknownProject(String),
    #[error("unknown job: {0}")]
    UnknownJob(String),
    #[error("song {id} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        id: String,
        from: SongStatus,
        to: SongStatus,
    },
    /// Track count fits neither the EP nor the album window.
    #[error("invalid track count {0}: EP takes 3-7 songs, album 8-14")]
    InvalidTrackCount(usize),
    #[error("song {0} is listed more than once")]
    DuplicateTrack(String),
    #[error("song {0} is trashed")]
    TrashedTrack(String),
    #[error("project {0} is already released")]
    AlreadyReleased(String),
    /// Activities must be booked at least one week ahead; whole years wrap
    /// back onto the current calendar week.
    #[error("week offset must be at least 1 and not a multiple of 52")]
    InvalidOffset,
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ValidationError),
}

/// First `{prefix}{n}` id, counting up from `len + 1`, not already taken.
fn next_id<'a>(prefix: &str, len: usize, taken: impl Iterator<Item = &'a str> + Clone) -> String {
    let mut n = len + 1;
    loop {
        let candidate = format!("{prefix}{n}");
        if !taken.clone().any(|t| t == candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn rejected(err: ActionError) -> ActionError {
    warn!(%err, "action rejected");
    err
}

fn next_song_id(state: &GameState) -> SongId {
    SongId(next_id(
        "s",
        state.songs.len(),
        state.songs.iter().map(|s| s.id.0.as_str()),
    ))
}

fn song_mut<'a>(state: &'a mut GameState, id: &SongId) -> Result<&'a mut Song, ActionError> {
    state
        .song_mut(id)
        .ok_or_else(|| rejected(ActionError::UnknownSong(id.0.clone())))
}

fn project_mut<'a>(state: &'a mut GameState, id: &ProjectId) -> Result<&'a mut Project, ActionError> {
    state
        .project_mut(id)
        .ok_or_else(|| rejected(ActionError::UnknownProject(id.0.clone())))
}

/// Name, age and starting year chosen at onboarding.
pub fn onboard(state: &mut GameState, name: impl Into<String>, age: u32, year: i32) {
    state.artist.name = name.into();
    state.artist.age = age;
    state.artist.year = year;
}

/// Write a new song idea. Quality is drawn from [50, 90).
pub fn write_song<R: Rng + ?Sized>(state: &mut GameState, title: impl Into<String>, rng: &mut R) -> SongId {
    let id = next_song_id(state);
    let mut song = Song::new(id.clone(), title, SongStatus::Written, state.week);
    song.quality = f64::from(rng.gen_range(50u32..90));
    song.hype = 30.0;
    song.artist_popularity = 20.0;
    state.songs.push(song);
    id
}

/// Write and record a single in one step. Quality is drawn from [55, 90).
pub fn record_single<R: Rng + ?Sized>(state: &mut GameState, title: Option<&str>, rng: &mut R) -> SongId {
    let id = next_song_id(state);
    let title = title
        .filter(|t| !t.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("New Single {}", state.week));
    let mut song = Song::new(id.clone(), title, SongStatus::Unreleased, state.week);
    song.quality = f64::from(rng.gen_range(55u32..90));
    song.hype = 35.0;
    song.artist_popularity = 22.0;
    song.recorded_at_week = Some(state.week);
    state.songs.push(song);
    id
}

fn transition(state: &mut GameState, id: &SongId, to: SongStatus) -> Result<(), ActionError> {
    let week = state.week;
    let song = song_mut(state, id)?;
    if !song.status.can_become(to) {
        return Err(rejected(ActionError::InvalidTransition {
            id: id.0.clone(),
            from: song.status,
            to,
        }));
    }
    song.status = to;
    match to {
        SongStatus::Unreleased => song.recorded_at_week = Some(week),
        SongStatus::Released => song.released_at_week = Some(week),
        SongStatus::Written | SongStatus::Trashed => {}
    }
    Ok(())
}

/// WRITTEN -> UNRELEASED.
pub fn record_song(state: &mut GameState, id: &SongId) -> Result<(), ActionError> {
    transition(state, id, SongStatus::Unreleased)
}

/// UNRELEASED -> RELEASED, stamped with the current week.
pub fn release_song(state: &mut GameState, id: &SongId) -> Result<(), ActionError> {
    transition(state, id, SongStatus::Released)
}

/// UNRELEASED -> TRASHED.
pub fn trash_song(state: &mut GameState, id: &SongId) -> Result<(), ActionError> {
    transition(state, id, SongStatus::Trashed)
}

/// Bundle songs into an EP or album. The kind follows from the track count.
pub fn create_project(
    state: &mut GameState,
    title: Option<&str>,
    tracks: &[SongId],
) -> Result<ProjectId, ActionError> {
    let Some(kind) = project_kind_for(tracks.len(), &state.config.project_rules) else {
        return Err(rejected(ActionError::InvalidTrackCount(tracks.len())));
    };
    for (i, sid) in tracks.iter().enumerate() {
        let song = state
            .song(sid)
            .ok_or_else(|| rejected(ActionError::UnknownSong(sid.0.clone())))?;
        if song.status == SongStatus::Trashed {
            return Err(rejected(ActionError::TrashedTrack(sid.0.clone())));
        }
        if tracks[..i].contains(sid) {
            return Err(rejected(ActionError::DuplicateTrack(sid.0.clone())));
        }
    }

    let id = ProjectId(next_id(
        "p",
        state.projects.len(),
        state.projects.iter().map(|p| p.id.0.as_str()),
    ));
    let title = title
        .filter(|t| !t.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Project {}", state.week));
    state.projects.push(Project {
        id: id.clone(),
        title,
        kind,
        songs: tracks.to_vec(),
        hype: 40.0,
        released_at_week: None,
        active_promo: PromoTier::None,
        consec_promo: 0,
        week_streams: 0,
        first_week_done: false,
        eligible_released_singles: None,
    });
    info!(project = %id.0, ?kind, tracks = tracks.len(), "project created");
    Ok(id)
}

/// Release a project this week. Its singles bonus fires on the next tick.
pub fn release_project(state: &mut GameState, id: &ProjectId) -> Result<(), ActionError> {
    let week = state.week;
    let project = project_mut(state, id)?;
    if project.is_released() {
        return Err(rejected(ActionError::AlreadyReleased(id.0.clone())));
    }
    project.released_at_week = Some(week);
    project.first_week_done = false;
    Ok(())
}

/// Calendar week `offset` weeks after `calendar_week`, wrapping at 52.
pub fn scheduled_week(calendar_week: u32, offset: u32) -> u32 {
    (calendar_week + offset - 1) % WEEKS_PER_YEAR + 1
}

/// Parameters for booking an activity.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivityRequest {
    pub kind: ActivityKind,
    /// Weeks from now: at least 1 and not a whole number of years.
    pub week_offset: u32,
    pub energy_cost: u32,
    pub payout: Decimal,
    pub hype_gain: Option<f64>,
}

/// Book an activity `week_offset` weeks ahead.
pub fn schedule_activity(state: &mut GameState, req: ActivityRequest) -> Result<ActivityId, ActionError> {
    if req.week_offset % WEEKS_PER_YEAR == 0 {
        return Err(rejected(ActionError::InvalidOffset));
    }
    let id = ActivityId(next_id(
        "a",
        state.activities.len(),
        state.activities.iter().map(|a| a.id.0.as_str()),
    ));
    let week = scheduled_week(state.calendar_week, req.week_offset % WEEKS_PER_YEAR);
    debug!(id = %id.0, kind = ?req.kind, week, "activity booked");
    state.activities.push(Activity {
        id: id.clone(),
        kind: req.kind,
        week,
        energy_cost: req.energy_cost,
        payout: req.payout.max(Decimal::ZERO),
        hype_gain: req.hype_gain,
        resolved_week: None,
    });
    Ok(id)
}

/// Unresolved activities, soonest first. Ties keep booking order.
pub fn upcoming_activities(state: &GameState) -> Vec<&Activity> {
    let now = state.calendar_week;
    let mut out: Vec<&Activity> = state.activities.iter().filter(|a| !a.is_resolved()).collect();
    out.sort_by_key(|a| (a.week + WEEKS_PER_YEAR - now) % WEEKS_PER_YEAR);
    out
}

/// Take a job from the catalog, or quit with `None`.
pub fn take_job(state: &mut GameState, job: Option<JobId>) -> Result<(), ActionError> {
    if let Some(id) = &job {
        if find_job(id).is_none() {
            return Err(rejected(ActionError::UnknownJob(id.0.clone())));
        }
    }
    state.artist.job_id = job;
    Ok(())
}

/// Set a song's promotion tier. Its streak counter is left to the tick.
pub fn set_song_promo(state: &mut GameState, id: &SongId, tier: PromoTier) -> Result<(), ActionError> {
    song_mut(state, id)?.active_promo = tier;
    Ok(())
}

/// Set a project's promotion tier.
pub fn set_project_promo(state: &mut GameState, id: &ProjectId, tier: PromoTier) -> Result<(), ActionError> {
    project_mut(state, id)?.active_promo = tier;
    Ok(())
}

fn draw_lift<R: Rng + ?Sized>(range: LiftRange, rng: &mut R) -> f64 {
    if range.min >= range.max {
        return range.min;
    }
    rng.gen_range(range.min..=range.max)
}

/// Start an audio-platform promo on a song. The lift is drawn once here.
pub fn assign_audio_promo<R: Rng + ?Sized>(
    state: &mut GameState,
    id: &SongId,
    tier: AudioPromoTier,
    rng: &mut R,
) -> Result<f64, ActionError> {
    let range = state.config.platforms.aurafy.promo_lifts.get(tier);
    let lift = draw_lift(range, rng);
    song_mut(state, id)?.platform_promo.aurafy = Some(PlatformPromo { tier, lift });
    Ok(lift)
}

/// Start a video-platform promo on a song. The lift is drawn once here.
pub fn assign_video_promo<R: Rng + ?Sized>(
    state: &mut GameState,
    id: &SongId,
    tier: VideoPromoTier,
    rng: &mut R,
) -> Result<f64, ActionError> {
    let range = state.config.platforms.streambox.promo_lifts.get(tier);
    let lift = draw_lift(range, rng);
    song_mut(state, id)?.platform_promo.streambox = Some(PlatformPromo { tier, lift });
    Ok(lift)
}

/// Drop both platform promos from a song.
pub fn clear_platform_promos(state: &mut GameState, id: &SongId) -> Result<(), ActionError> {
    song_mut(state, id)?.platform_promo = Default::default();
    Ok(())
}

/// Replace the config with the defaults.
pub fn reset_config(state: &mut GameState) {
    state.config = SimConfig::default();
}

/// Replace the whole config after validating it.
pub fn override_config(state: &mut GameState, cfg: SimConfig) -> Result<(), ActionError> {
    validate_config(&cfg).map_err(|e| rejected(e.into()))?;
    state.config = cfg;
    Ok(())
}
