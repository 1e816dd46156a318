use serde::Serialize;

use crate::models::{CompletionSummary, SetRecord};

/// Everything observable that a session action did, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    SetRecorded {
        record: SetRecord,
    },
    RestStarted {
        seconds: u32,
        target_exercise_index: usize,
        target_set: u32,
    },
    RestAdjusted {
        seconds_remaining: u32,
    },
    RestCompleted {
        skipped: bool,
        target_exercise_index: usize,
        target_set: u32,
    },
    RestCancelled,
    ExerciseAdvanced {
        from_index: usize,
        to_index: usize,
    },
    ExerciseSkipped {
        index: usize,
        sets_abandoned: u32,
    },
    JumpedToExercise {
        from_index: usize,
        to_index: usize,
        current_set: u32,
    },
    WorkoutReadyToFinish,
    Paused,
    Resumed {
        paused_seconds: i64,
    },
    Finished {
        summary: CompletionSummary,
    },
    Cancelled {
        summary: CompletionSummary,
    },
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::SetRecorded { .. } => "set_recorded",
            SessionEvent::RestStarted { .. } => "rest_started",
            SessionEvent::RestAdjusted { .. } => "rest_adjusted",
            SessionEvent::RestCompleted { .. } => "rest_completed",
            SessionEvent::RestCancelled => "rest_cancelled",
            SessionEvent::ExerciseAdvanced { .. } => "exercise_advanced",
            SessionEvent::ExerciseSkipped { .. } => "exercise_skipped",
            SessionEvent::JumpedToExercise { .. } => "jumped_to_exercise",
            SessionEvent::WorkoutReadyToFinish => "workout_ready_to_finish",
            SessionEvent::Paused => "paused",
            SessionEvent::Resumed { .. } => "resumed",
            SessionEvent::Finished { .. } => "finished",
            SessionEvent::Cancelled { .. } => "cancelled",
        }
    }
}
