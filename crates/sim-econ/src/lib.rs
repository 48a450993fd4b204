#![deny(warnings)]

//! Economic models for Sound Empire's weekly tick.
//!
//! Every function here is pure over its inputs plus an explicit random
//! stream:
//! - promotion fatigue and hype decay ([`promo`])
//! - weekly stream prediction ([`streams`])
//! - audio/video platform split and payouts ([`platforms`])
//! - z-score chart ranking ([`charts`])
//! - project aggregation and the first-week singles bonus ([`projects`])

pub mod charts;
pub mod platforms;
pub mod projects;
pub mod promo;
pub mod streams;

pub use charts::{rank, rank_by_metric, z_scores, ChartInput};
pub use platforms::split_platforms;
pub use projects::{project_week, select_eligible_singles, ProjectWeek};
pub use promo::{decayed_hype, effective_consecutive, hype_decay, next_consecutive, promo_multiplier};
pub use streams::predict_song_streams;
