//! Project (EP/album) weekly aggregation and the first-week singles bonus.

use crate::promo::promo_multiplier;
use sim_core::{Project, ProjectRules, SimConfig, Song, SongId};

/// Released member songs credited on a project's first week.
///
/// Most recently released first (stable for equal weeks), capped at
/// `rules.singles_cap`.
pub fn select_eligible_singles(project: &Project, songs: &[Song], rules: &ProjectRules) -> Vec<SongId> {
    let mut released: Vec<&Song> = project
        .songs
        .iter()
        .filter_map(|id| songs.iter().find(|s| &s.id == id))
        .filter(|s| s.is_released())
        .collect();
    released.sort_by(|a, b| {
        b.released_at_week
            .unwrap_or(0)
            .cmp(&a.released_at_week.unwrap_or(0))
    });
    released
        .into_iter()
        .take(rules.singles_cap)
        .map(|s| s.id.clone())
        .collect()
}

fn week_streams_of(id: &SongId, songs: &[Song]) -> u64 {
    songs
        .iter()
        .find(|s| &s.id == id)
        .map_or(0, |s| s.week_streams)
}

/// Outcome of one project week.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectWeek {
    /// Sum of member songs' streams this week.
    pub base: u64,
    /// One-time first-week singles credit, zero after the first week.
    pub bonus: u64,
    /// Singles selected for the bonus, only on the first week.
    pub eligible: Option<Vec<SongId>>,
    /// `round((base + bonus) * promo multiplier)`.
    pub streams: u64,
}

/// Resolve a released project's week from its members' current streams.
///
/// Reads `project.first_week_done`; the caller records the flag and the
/// eligible list so the bonus is never applied twice.
pub fn project_week(project: &Project, songs: &[Song], cfg: &SimConfig) -> ProjectWeek {
    let base: u64 = project
        .songs
        .iter()
        .map(|id| week_streams_of(id, songs))
        .sum();

    let (bonus, eligible) = if project.first_week_done {
        (0, None)
    } else {
        let elig = select_eligible_singles(project, songs, &cfg.project_rules);
        let bonus = elig.iter().map(|id| week_streams_of(id, songs)).sum();
        (bonus, Some(elig))
    };

    // Unlike songs, the stored streak applies even once the promo is off, so
    // the first unpromoted week still carries the fatigue.
    let mult = promo_multiplier(project.active_promo, project.consec_promo.max(1), cfg);
    let raw = ((base + bonus) as f64 * mult).round();
    let streams = if raw.is_finite() && raw > 0.0 { raw as u64 } else { 0 };

    ProjectWeek {
        base,
        bonus,
        eligible,
        streams,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::{ProjectId, ProjectKind, PromoTier, SongStatus};

    fn song(id: &str, status: SongStatus, released: Option<u32>, streams: u64) -> Song {
        let mut s = Song::new(SongId(id.into()), id, status, 1);
        s.released_at_week = released;
        s.week_streams = streams;
        s
    }

    fn ep(ids: &[&str]) -> Project {
        Project {
            id: ProjectId("p1".into()),
            title: "EP".into(),
            kind: ProjectKind::Ep,
            songs: ids.iter().map(|i| SongId(i.to_string())).collect(),
            hype: 40.0,
            released_at_week: Some(5),
            active_promo: PromoTier::None,
            consec_promo: 0,
            week_streams: 0,
            first_week_done: false,
            eligible_released_singles: None,
        }
    }

    #[test]
    fn singles_sorted_by_release_and_capped() {
        let songs = vec![
            song("a", SongStatus::Released, Some(1), 0),
            song("b", SongStatus::Released, Some(4), 0),
            song("c", SongStatus::Unreleased, None, 0),
            song("d", SongStatus::Released, Some(3), 0),
            song("e", SongStatus::Released, Some(2), 0),
            song("f", SongStatus::Released, Some(4), 0),
        ];
        let p = ep(&["a", "b", "c", "d", "e", "f"]);
        let mut rules = ProjectRules::default();
        let ids = select_eligible_singles(&p, &songs, &rules);
        let ids: Vec<_> = ids.iter().map(|s| s.0.as_str()).collect();
        assert_eq!(ids, ["b", "f", "d", "e"]);

        rules.singles_cap = 1;
        assert_eq!(select_eligible_singles(&p, &songs, &rules), vec![SongId("b".into())]);
    }

    #[test]
    fn first_week_adds_bonus() {
        let cfg = SimConfig::default();
        let songs = vec![
            song("a", SongStatus::Released, Some(1), 1000),
            song("b", SongStatus::Released, Some(2), 500),
            song("c", SongStatus::Released, Some(5), 0),
        ];
        let p = ep(&["a", "b", "c"]);
        let w = project_week(&p, &songs, &cfg);
        assert_eq!(w.base, 1500);
        assert_eq!(w.bonus, 1500);
        assert_eq!(w.streams, 3000);
        assert_eq!(w.eligible.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn later_weeks_skip_bonus() {
        let cfg = SimConfig::default();
        let songs = vec![
            song("a", SongStatus::Released, Some(1), 1000),
            song("b", SongStatus::Released, Some(2), 500),
            song("c", SongStatus::Released, Some(5), 250),
        ];
        let mut p = ep(&["a", "b", "c"]);
        p.first_week_done = true;
        let w = project_week(&p, &songs, &cfg);
        assert_eq!(w.bonus, 0);
        assert!(w.eligible.is_none());
        assert_eq!(w.streams, 1750);
    }

    #[test]
    fn project_promo_multiplies_total() {
        let cfg = SimConfig::default();
        let songs = vec![
            song("a", SongStatus::Released, Some(1), 1000),
            song("b", SongStatus::Unreleased, None, 0),
            song("c", SongStatus::Unreleased, None, 0),
        ];
        let mut p = ep(&["a", "b", "c"]);
        p.first_week_done = true;
        p.active_promo = PromoTier::High;
        p.consec_promo = 0;
        assert_eq!(project_week(&p, &songs, &cfg).streams, 1350);
        p.consec_promo = 2;
        // 1000 * 1.35 * 0.92
        assert_eq!(project_week(&p, &songs, &cfg).streams, 1242);
    }

    #[test]
    fn switched_off_promo_keeps_streak_fatigue() {
        let cfg = SimConfig::default();
        let songs = vec![
            song("a", SongStatus::Released, Some(1), 1000),
            song("b", SongStatus::Unreleased, None, 0),
            song("c", SongStatus::Unreleased, None, 0),
        ];
        let mut p = ep(&["a", "b", "c"]);
        p.first_week_done = true;
        p.active_promo = PromoTier::None;
        p.consec_promo = 3;
        // 1000 * 1.0 * 0.92^2
        assert_eq!(project_week(&p, &songs, &cfg).streams, 846);
        p.consec_promo = 0;
        assert_eq!(project_week(&p, &songs, &cfg).streams, 1000);
    }
}
