pub mod aggregator;
pub mod clock;
pub mod display;
pub mod error;
pub mod events;
pub mod progression;
pub mod recorder;
pub mod rest_timer;
pub mod session;

use serde::{Deserialize, Serialize};

use crate::models::WeightUnit;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{SessionError, ValidationError};
pub use events::SessionEvent;
pub use progression::{ExerciseProgress, ExerciseStatus, SetPhase};
pub use recorder::parse_weight;
pub use rest_timer::{RestPhase, RestTimer, RestTimerState};
pub use session::{ActiveSession, FinishRequest, SessionSnapshot};

/// Which exercise's `rest_seconds` applies between the last set of one
/// exercise and the first set of the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RestPolicy {
    #[default]
    #[serde(rename = "finishing")]
    FinishingExercise,
    #[serde(rename = "upcoming")]
    UpcomingExercise,
}

impl RestPolicy {
    pub fn parse(s: &str) -> Self {
        match s {
            "upcoming" => RestPolicy::UpcomingExercise,
            _ => RestPolicy::FinishingExercise,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub rest_policy: RestPolicy,
    pub rest_min_seconds: u32,
    pub rest_max_seconds: u32,
    pub max_weight: f64,
    pub max_reps: u32,
    pub max_sets_per_exercise: u32,
    pub weight_unit: WeightUnit,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rest_policy: RestPolicy::FinishingExercise,
            rest_min_seconds: 10,
            rest_max_seconds: 300,
            max_weight: 2000.0,
            max_reps: 1000,
            max_sets_per_exercise: 100,
            weight_unit: WeightUnit::Lbs,
        }
    }
}
