#![deny(warnings)]

//! Core domain models and invariants for Sound Empire.
//!
//! This crate defines the serializable game state advanced by the weekly
//! tick, its tunable config, the deterministic per-week random stream, and
//! validation helpers that guard the invariants snapshots must hold.

pub mod config;
pub mod rng;

pub use config::*;
pub use rng::{sample_normal, sample_normal_clamped, Mulberry32, UnitSource};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Engine version stamped on fresh games and configs.
pub const ENGINE_VERSION: &str = "1.2.0";
/// Save schema version.
pub const SCHEMA_VERSION: &str = "1.2.0";
/// Weeks per calendar year.
pub const WEEKS_PER_YEAR: u32 = 52;
/// Upper bound for energy and hype.
pub const STAT_MAX: u32 = 100;

/// Unique identifier for a song, e.g. "s2".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SongId(pub String);

/// Unique identifier for a project, e.g. "p1".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub String);

/// Unique identifier for a scheduled activity.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActivityId(pub String);

/// Catalog key for a job, e.g. "barista".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Song lifecycle. `Trashed` is absorbing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SongStatus {
    Written,
    Unreleased,
    Released,
    Trashed,
}

impl SongStatus {
    /// Whether `self -> next` is a legal one-way transition.
    pub fn can_become(self, next: SongStatus) -> bool {
        matches!(
            (self, next),
            (SongStatus::Written, SongStatus::Unreleased)
                | (SongStatus::Unreleased, SongStatus::Released)
                | (SongStatus::Unreleased, SongStatus::Trashed)
        )
    }
}

/// Song/project promotion tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromoTier {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl PromoTier {
    pub fn is_active(self) -> bool {
        self != PromoTier::None
    }
}

/// Promotion placements on the audio platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioPromoTier {
    Banner,
    Editorial,
    Sponsored,
}

/// Promotion placements on the video platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VideoPromoTier {
    Featured,
    Trending,
    Preroll,
}

/// A platform promotion with its lift drawn once at assignment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatformPromo<T> {
    pub tier: T,
    pub lift: f64,
}

/// Active platform promotions on a song, at most one per platform.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformPromos {
    pub aurafy: Option<PlatformPromo<AudioPromoTier>>,
    pub streambox: Option<PlatformPromo<VideoPromoTier>>,
}

/// One week of audio-platform results for a song.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioWeek {
    pub streams: u64,
    pub revenue: Decimal,
}

/// One week of video-platform results for a song.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoWeek {
    pub views: u64,
    pub monetized_views: u64,
    pub ad_revenue: Decimal,
    pub artist_revenue: Decimal,
    /// Views expressed as audio-stream equivalents.
    pub stream_eq: u64,
}

/// Per-platform split of a song's weekly streams.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformBreakdown {
    pub aurafy: AudioWeek,
    pub streambox: VideoWeek,
}

impl PlatformBreakdown {
    /// Revenue the artist keeps from both platforms.
    pub fn artist_revenue(&self) -> Decimal {
        self.aurafy.revenue + self.streambox.artist_revenue
    }
}

/// A song written by the artist.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub status: SongStatus,
    /// Fixed at creation, in [0, 100].
    #[serde(default)]
    pub quality: f64,
    /// In [0, 100]; decays weekly while released.
    #[serde(default)]
    pub hype: f64,
    /// Song-level popularity contribution, in [0, 100].
    #[serde(default)]
    pub artist_popularity: f64,
    pub created_at_week: u32,
    #[serde(default)]
    pub recorded_at_week: Option<u32>,
    #[serde(default)]
    pub released_at_week: Option<u32>,
    #[serde(default)]
    pub active_promo: PromoTier,
    #[serde(default)]
    pub platform_promo: PlatformPromos,
    /// Consecutive promoted weeks; survives the weekly reset.
    #[serde(default)]
    pub consec_promo: u32,
    /// Streams resolved in the most recent tick.
    #[serde(default)]
    pub week_streams: u64,
    /// Platform split from the most recent tick.
    #[serde(default)]
    pub platform: Option<PlatformBreakdown>,
}

impl Song {
    pub fn new(id: SongId, title: impl Into<String>, status: SongStatus, week: u32) -> Self {
        Self {
            id,
            title: title.into(),
            status,
            quality: 0.0,
            hype: 0.0,
            artist_popularity: 0.0,
            created_at_week: week,
            recorded_at_week: None,
            released_at_week: None,
            active_promo: PromoTier::None,
            platform_promo: PlatformPromos::default(),
            consec_promo: 0,
            week_streams: 0,
            platform: None,
        }
    }

    pub fn is_released(&self) -> bool {
        self.status == SongStatus::Released
    }
}

/// Release format, derived from track count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectKind {
    Ep,
    Album,
}

/// Map a track count to a release format, or `None` when it fits neither.
pub fn project_kind_for(track_count: usize, rules: &ProjectRules) -> Option<ProjectKind> {
    if (rules.album_min..=rules.album_max).contains(&track_count) {
        return Some(ProjectKind::Album);
    }
    if (rules.ep_min..=rules.ep_max).contains(&track_count) {
        return Some(ProjectKind::Ep);
    }
    None
}

/// An EP or album bundling existing songs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub kind: ProjectKind,
    /// Member songs in track order.
    pub songs: Vec<SongId>,
    #[serde(default)]
    pub hype: f64,
    #[serde(default)]
    pub released_at_week: Option<u32>,
    #[serde(default)]
    pub active_promo: PromoTier,
    #[serde(default)]
    pub consec_promo: u32,
    #[serde(default)]
    pub week_streams: u64,
    /// Set once the first post-release tick has applied the singles bonus.
    #[serde(default)]
    pub first_week_done: bool,
    /// Singles credited on the first post-release tick.
    #[serde(default)]
    pub eligible_released_singles: Option<Vec<SongId>>,
}

impl Project {
    pub fn is_released(&self) -> bool {
        self.released_at_week.is_some()
    }
}

/// Kinds of schedulable activities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    Gig,
    Interview,
    Promo,
}

impl ActivityKind {
    /// Hype gained when the activity does not specify one.
    pub fn default_hype_gain(self) -> f64 {
        match self {
            ActivityKind::Gig => 4.0,
            ActivityKind::Interview => 3.0,
            ActivityKind::Promo => 0.0,
        }
    }
}

/// An activity booked for a calendar week.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub kind: ActivityKind,
    /// Calendar week in [1, 52].
    pub week: u32,
    #[serde(default)]
    pub energy_cost: u32,
    #[serde(default)]
    pub payout: Decimal,
    #[serde(default)]
    pub hype_gain: Option<f64>,
    /// Absolute week the activity was applied, if it has been.
    #[serde(default)]
    pub resolved_week: Option<u32>,
}

impl Activity {
    pub fn is_resolved(&self) -> bool {
        self.resolved_week.is_some()
    }

    /// Hype applied on resolution. A missing, zero or non-finite gain falls
    /// back to the kind's default.
    pub fn hype_gain(&self) -> f64 {
        self.hype_gain
            .filter(|g| g.is_finite() && *g != 0.0)
            .unwrap_or_else(|| self.kind.default_hype_gain())
    }
}

/// A static job listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    /// Weekly pay in USD.
    pub pay: Decimal,
    /// Weekly energy cost.
    pub energy: u32,
}

/// All jobs the artist can take.
pub fn job_catalog() -> Vec<Job> {
    [
        ("warehouse", "Warehouse Attendant", 550, 23),
        ("engineer", "Studio Engineer (Assistant)", 650, 24),
        ("driver", "Driver", 420, 20),
        ("server", "Server", 500, 22),
        ("barista", "Barista", 300, 15),
        ("retail", "Retail Associate", 350, 18),
        ("tutor", "Tutor", 450, 20),
    ]
    .into_iter()
    .map(|(id, title, pay, energy)| Job {
        id: JobId(id.to_string()),
        title: title.to_string(),
        pay: Decimal::new(pay, 0),
        energy,
    })
    .collect()
}

/// Look up a job in the catalog.
pub fn find_job(id: &JobId) -> Option<Job> {
    job_catalog().into_iter().find(|j| &j.id == id)
}

/// The player's artist.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub year: i32,
    pub cash: Decimal,
    /// In [0, 100].
    pub energy: u32,
    /// In [0, 100].
    #[serde(default)]
    pub base_popularity: f64,
    /// In [0, 100].
    #[serde(default)]
    pub hype: f64,
    #[serde(default)]
    pub social_followers: u64,
    #[serde(default)]
    pub job_id: Option<JobId>,
}

impl Default for Artist {
    fn default() -> Self {
        Self {
            id: "artist-1".to_string(),
            name: String::new(),
            age: 0,
            year: 2025,
            cash: Decimal::new(1000, 0),
            energy: STAT_MAX,
            base_popularity: 35.0,
            hype: 30.0,
            social_followers: 250,
            job_id: None,
        }
    }
}

/// One ranked chart line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartRow<I> {
    /// 1-based.
    pub position: u32,
    pub id: I,
    pub title: String,
    pub streams: u64,
    pub sales: f64,
    pub hype: f64,
    /// Weighted z-score composite.
    pub points: f64,
}

/// Song and project charts from the most recent tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Charts {
    /// Labelled with the week index following the one just resolved.
    pub week: u32,
    pub songs: Vec<ChartRow<SongId>>,
    pub projects: Vec<ChartRow<ProjectId>>,
}

impl Charts {
    pub fn empty(week: u32) -> Self {
        Self {
            week,
            songs: Vec::new(),
            projects: Vec::new(),
        }
    }
}

/// One line of a per-platform top list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatformChartRow {
    pub position: u32,
    pub id: SongId,
    pub title: String,
    /// Streams on the audio platform, views on the video platform.
    pub metric: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformCharts {
    pub aurafy: Vec<PlatformChartRow>,
    pub streambox: Vec<PlatformChartRow>,
}

/// Root game state. Owned by the caller and advanced one week at a time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub engine_version: String,
    pub schema_version: String,
    #[serde(default)]
    pub config: SimConfig,
    /// Weeks elapsed since game start (starts at 1).
    pub week: u32,
    /// Week of the calendar year, in [1, 52].
    pub calendar_week: u32,
    /// Fixed at creation; combined with `week` for each tick's stream.
    pub rng_seed: u32,
    pub artist: Artist,
    #[serde(default)]
    pub songs: Vec<Song>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    pub charts: Charts,
    #[serde(default)]
    pub platform_charts: PlatformCharts,
}

impl GameState {
    /// New game with the starter catalog: one draft and one released single.
    pub fn fresh() -> Self {
        let mut draft = Song::new(SongId("s1".into()), "Demo Draft", SongStatus::Written, 1);
        draft.quality = 62.0;
        draft.hype = 28.0;
        draft.artist_popularity = 20.0;

        let mut single = Song::new(SongId("s2".into()), "Skylight", SongStatus::Released, 1);
        single.quality = 74.0;
        single.hype = 45.0;
        single.artist_popularity = 25.0;
        single.released_at_week = Some(1);

        Self {
            engine_version: ENGINE_VERSION.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            config: SimConfig::default(),
            week: 1,
            calendar_week: 1,
            rng_seed: 777,
            artist: Artist::default(),
            songs: vec![draft, single],
            projects: Vec::new(),
            activities: Vec::new(),
            charts: Charts::empty(1),
            platform_charts: PlatformCharts::default(),
        }
    }

    pub fn song(&self, id: &SongId) -> Option<&Song> {
        self.songs.iter().find(|s| &s.id == id)
    }

    pub fn song_mut(&mut self, id: &SongId) -> Option<&mut Song> {
        self.songs.iter_mut().find(|s| &s.id == id)
    }

    pub fn project(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| &p.id == id)
    }

    pub fn project_mut(&mut self, id: &ProjectId) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| &p.id == id)
    }
}

/// Validation errors for domain invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Numeric field must be finite.
    #[error("non-finite numeric value encountered")]
    NonFinite,
    /// Tunable or stat must be non-negative.
    #[error("negative value is invalid")]
    NegativeValue,
    /// Price, payout or cash must be non-negative.
    #[error("negative monetary value is invalid")]
    NegativeMoney,
    /// A min/max pair is inverted.
    #[error("range minimum exceeds maximum")]
    InvertedRange,
    /// Consecutive-promotion penalty must lie in (0, 1].
    #[error("promotion penalty {0} is outside (0, 1]")]
    PenaltyOutOfRange(f64),
    /// Audience or revenue share must lie in [0, 1].
    #[error("share {0} is outside [0, 1]")]
    ShareOutOfRange(f64),
    /// EP and album windows must be ordered and disjoint.
    #[error("project track-count rules overlap or are inverted")]
    InvalidProjectRules,
    /// A 0..=100 stat is out of range.
    #[error("{field} = {value} is outside [0, 100]")]
    StatOutOfRange { field: &'static str, value: f64 },
    /// Calendar week must lie in [1, 52].
    #[error("calendar week {0} is outside [1, 52]")]
    CalendarWeekOutOfRange(u32),
    /// Two entities share an id.
    #[error("duplicate id: {0}")]
    DuplicateId(String),
    /// A project references a song that does not exist.
    #[error("project {project} references unknown song {song}")]
    UnknownSong { project: String, song: String },
    /// A project's kind does not match its track count.
    #[error("project {0} has a track count that does not match its kind")]
    ProjectKindMismatch(String),
}

fn validate_stat(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite);
    }
    if !(0.0..=f64::from(STAT_MAX)).contains(&value) {
        return Err(ValidationError::StatOutOfRange { field, value });
    }
    Ok(())
}

/// Validate a song's bounded attributes.
pub fn validate_song(s: &Song) -> Result<(), ValidationError> {
    validate_stat("quality", s.quality)?;
    validate_stat("hype", s.hype)?;
    validate_stat("artist_popularity", s.artist_popularity)?;
    Ok(())
}

/// Validate the artist's bounded attributes.
pub fn validate_artist(a: &Artist) -> Result<(), ValidationError> {
    if a.cash < Decimal::ZERO {
        return Err(ValidationError::NegativeMoney);
    }
    validate_stat("energy", f64::from(a.energy))?;
    validate_stat("hype", a.hype)?;
    validate_stat("base_popularity", a.base_popularity)?;
    Ok(())
}

fn check_unique<'a>(ids: impl Iterator<Item = &'a str>) -> Result<(), ValidationError> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId(id.to_string()));
        }
    }
    Ok(())
}

/// Validate a full snapshot, including cross-references between projects and
/// songs. Used on load; the tick itself assumes a valid state.
pub fn validate_game_state(state: &GameState) -> Result<(), ValidationError> {
    validate_config(&state.config)?;
    if !(1..=WEEKS_PER_YEAR).contains(&state.calendar_week) {
        return Err(ValidationError::CalendarWeekOutOfRange(state.calendar_week));
    }
    validate_artist(&state.artist)?;

    check_unique(state.songs.iter().map(|s| s.id.0.as_str()))?;
    check_unique(state.projects.iter().map(|p| p.id.0.as_str()))?;
    check_unique(state.activities.iter().map(|a| a.id.0.as_str()))?;

    for s in &state.songs {
        validate_song(s)?;
    }
    for p in &state.projects {
        validate_stat("hype", p.hype)?;
        for sid in &p.songs {
            if state.song(sid).is_none() {
                return Err(ValidationError::UnknownSong {
                    project: p.id.0.clone(),
                    song: sid.0.clone(),
                });
            }
        }
        if project_kind_for(p.songs.len(), &state.config.project_rules) != Some(p.kind) {
            return Err(ValidationError::ProjectKindMismatch(p.id.0.clone()));
        }
    }
    for a in &state.activities {
        if !(1..=WEEKS_PER_YEAR).contains(&a.week) {
            return Err(ValidationError::CalendarWeekOutOfRange(a.week));
        }
        if a.payout < Decimal::ZERO {
            return Err(ValidationError::NegativeMoney);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn project(n: usize, kind: ProjectKind) -> Project {
        Project {
            id: ProjectId("p1".to_string()),
            title: "Tape".to_string(),
            kind,
            songs: (0..n).map(|i| SongId(format!("t{i}"))).collect(),
            hype: 40.0,
            released_at_week: None,
            active_promo: PromoTier::None,
            consec_promo: 0,
            week_streams: 0,
            first_week_done: false,
            eligible_released_singles: None,
        }
    }

    #[test]
    fn fresh_game_is_valid() {
        let g = GameState::fresh();
        validate_game_state(&g).unwrap();
        assert_eq!(g.rng_seed, 777);
        assert_eq!(g.charts.week, 1);
        assert!(g.song(&SongId("s2".into())).unwrap().is_released());
    }

    #[test]
    fn game_snapshot_roundtrip() {
        let mut g = GameState::fresh();
        g.artist.job_id = Some(JobId("barista".into()));
        g.activities.push(Activity {
            id: ActivityId("a1".into()),
            kind: ActivityKind::Gig,
            week: 3,
            energy_cost: 20,
            payout: Decimal::new(800, 0),
            hype_gain: None,
            resolved_week: None,
        });
        let s = serde_json::to_string_pretty(&g).unwrap();
        let back: GameState = serde_json::from_str(&s).unwrap();
        assert_eq!(back, g);
    }

    #[test]
    fn missing_numeric_fields_default_to_zero() {
        let json = r#"{ "id": "s9", "title": "Bare", "status": "RELEASED", "created_at_week": 4 }"#;
        let s: Song = serde_json::from_str(json).unwrap();
        assert_eq!(s.quality, 0.0);
        assert_eq!(s.hype, 0.0);
        assert_eq!(s.active_promo, PromoTier::None);
        assert_eq!(s.consec_promo, 0);
        assert!(s.platform.is_none());
    }

    #[test]
    fn status_transitions_are_one_way() {
        use SongStatus::*;
        assert!(Written.can_become(Unreleased));
        assert!(Unreleased.can_become(Released));
        assert!(Unreleased.can_become(Trashed));
        assert!(!Released.can_become(Unreleased));
        assert!(!Trashed.can_become(Written));
        assert!(!Trashed.can_become(Released));
        assert!(!Written.can_become(Released));
    }

    #[test]
    fn project_kind_boundaries() {
        let r = ProjectRules::default();
        assert_eq!(project_kind_for(3, &r), Some(ProjectKind::Ep));
        assert_eq!(project_kind_for(7, &r), Some(ProjectKind::Ep));
        assert_eq!(project_kind_for(8, &r), Some(ProjectKind::Album));
        assert_eq!(project_kind_for(14, &r), Some(ProjectKind::Album));
        assert_eq!(project_kind_for(2, &r), None);
        assert_eq!(project_kind_for(15, &r), None);
    }

    #[test]
    fn job_catalog_lookup() {
        let j = find_job(&JobId("engineer".into())).unwrap();
        assert_eq!(j.pay, Decimal::new(650, 0));
        assert_eq!(j.energy, 24);
        assert!(find_job(&JobId("astronaut".into())).is_none());
        assert_eq!(job_catalog().len(), 7);
    }

    #[test]
    fn zero_hype_gain_uses_kind_default() {
        let mut a = Activity {
            id: ActivityId("a1".into()),
            kind: ActivityKind::Gig,
            week: 2,
            energy_cost: 0,
            payout: Decimal::ZERO,
            hype_gain: Some(0.0),
            resolved_week: None,
        };
        assert_eq!(a.hype_gain(), 4.0);
        a.hype_gain = None;
        assert_eq!(a.hype_gain(), 4.0);
        a.hype_gain = Some(f64::NAN);
        assert_eq!(a.hype_gain(), 4.0);
        a.hype_gain = Some(6.5);
        assert_eq!(a.hype_gain(), 6.5);
        a.kind = ActivityKind::Interview;
        a.hype_gain = Some(0.0);
        assert_eq!(a.hype_gain(), 3.0);
    }

    #[test]
    fn rejects_mismatched_project_kind() {
        let mut g = GameState::fresh();
        for i in 0..3 {
            g.songs.push(Song::new(
                SongId(format!("t{i}")),
                "x",
                SongStatus::Unreleased,
                1,
            ));
        }
        g.projects.push(project(3, ProjectKind::Album));
        assert_eq!(
            validate_game_state(&g),
            Err(ValidationError::ProjectKindMismatch("p1".into()))
        );
        g.projects[0].kind = ProjectKind::Ep;
        validate_game_state(&g).unwrap();
    }

    #[test]
    fn rejects_dangling_project_song() {
        let mut g = GameState::fresh();
        g.projects.push(project(3, ProjectKind::Ep));
        assert!(matches!(
            validate_game_state(&g),
            Err(ValidationError::UnknownSong { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_song_ids() {
        let mut g = GameState::fresh();
        let dup = g.songs[0].clone();
        g.songs.push(dup);
        assert_eq!(
            validate_game_state(&g),
            Err(ValidationError::DuplicateId("s1".into()))
        );
    }

    #[test]
    fn rejects_bad_calendar_week() {
        let mut g = GameState::fresh();
        g.calendar_week = 53;
        assert_eq!(
            validate_game_state(&g),
            Err(ValidationError::CalendarWeekOutOfRange(53))
        );
    }

    proptest! {
        #[test]
        fn song_stats_in_range_validate(q in 0.0f64..=100.0, h in 0.0f64..=100.0, p in 0.0f64..=100.0) {
            let mut s = Song::new(SongId("s".into()), "t", SongStatus::Released, 1);
            s.quality = q;
            s.hype = h;
            s.artist_popularity = p;
            prop_assert!(validate_song(&s).is_ok());
        }

        #[test]
        fn kinds_never_overlap(n in 0usize..32) {
            let r = ProjectRules::default();
            let k = project_kind_for(n, &r);
            prop_assert_eq!(k.is_some(), (3..=14).contains(&n));
        }
    }
}
