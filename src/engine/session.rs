//! Session lifecycle: active ⇄ paused, then completed or cancelled.
//!
//! Every action either succeeds or returns an error without touching state.
//! Actions and observable side effects are appended to an event outbox the
//! host drains after each call.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::aggregator;
use super::clock::Clock;
use super::display::format_clock;
use super::error::{Result, SessionError, ValidationError};
use super::events::SessionEvent;
use super::progression::{ExerciseProgress, Progression, SetPhase};
use super::rest_timer::{RestPhase, RestTimerState};
use super::SessionConfig;
use crate::models::{
    CompletionSummary, ExerciseSpec, SessionOutcome, SessionStatus, SetInput, SetRecord,
    WorkoutPlan,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FinishRequest {
    pub rating: Option<u8>,
    pub notes: Option<String>,
    #[serde(default)]
    pub early: bool,
}

impl FinishRequest {
    pub fn early() -> Self {
        Self {
            early: true,
            ..Self::default()
        }
    }
}

/// Serializable view of a session for UI rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub workout_id: String,
    pub workout_name: String,
    pub status: SessionStatus,
    pub phase: SetPhase,
    pub started_at: DateTime<Utc>,
    pub elapsed_seconds: i64,
    pub elapsed_display: String,
    pub total_pause_duration_seconds: i64,
    pub current_exercise_index: usize,
    pub current_set: u32,
    pub current_exercise: ExerciseSpec,
    pub rest_timer: Option<RestTimerState>,
    pub rest_phase: RestPhase,
    pub completion_percentage: f64,
    pub set_records: Vec<SetRecord>,
    pub exercises: Vec<ExerciseProgress>,
}

#[derive(Debug)]
pub struct ActiveSession {
    session_id: String,
    status: SessionStatus,
    started_at: DateTime<Utc>,
    paused_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    total_pause: Duration,
    rating: Option<u8>,
    notes: Option<String>,
    progression: Progression,
    config: SessionConfig,
    clock: Arc<dyn Clock>,
    events: Vec<SessionEvent>,
}

impl ActiveSession {
    /// Start a session at the first set of the first exercise.
    pub fn create(plan: WorkoutPlan, config: SessionConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        if plan.is_empty() {
            return Err(SessionError::InvalidPlan("plan has no exercises".to_string()));
        }
        let mut seen = HashSet::new();
        for e in &plan.exercises {
            if e.sets_planned == 0 {
                return Err(SessionError::InvalidPlan(format!(
                    "exercise {} has no planned sets",
                    e.exercise_id
                )));
            }
            if e.sets_planned > config.max_sets_per_exercise {
                return Err(SessionError::InvalidPlan(format!(
                    "exercise {} plans {} sets, the maximum is {}",
                    e.exercise_id, e.sets_planned, config.max_sets_per_exercise
                )));
            }
            if !seen.insert(e.exercise_id.as_str()) {
                return Err(SessionError::InvalidPlan(format!(
                    "exercise {} appears more than once",
                    e.exercise_id
                )));
            }
        }

        let plan = plan.normalized();
        let session_id = Uuid::new_v4().to_string();
        tracing::info!(
            session_id = %session_id,
            workout_id = %plan.workout_id,
            exercises = plan.len(),
            "Workout session started"
        );

        Ok(Self {
            session_id,
            status: SessionStatus::Active,
            started_at: clock.now(),
            paused_at: None,
            ended_at: None,
            total_pause: Duration::zero(),
            rating: None,
            notes: None,
            progression: Progression::new(plan),
            config,
            clock,
            events: Vec::new(),
        })
    }

    fn require(&self, allowed: &[SessionStatus], action: &'static str) -> Result<()> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                action,
                status: self.status,
            })
        }
    }

    fn require_active(&self, action: &'static str) -> Result<()> {
        self.require(&[SessionStatus::Active], action)
    }

    // Actions

    pub fn record_set(&mut self, input: &SetInput) -> Result<SetRecord> {
        self.require_active("record a set")?;
        let now = self.clock.now();
        self.progression
            .complete_current_set(&self.config, input, now, &mut self.events)
    }

    /// One timer tick. Ignored unless active.
    pub fn tick(&mut self) {
        if self.status == SessionStatus::Active {
            self.progression.tick(&mut self.events);
        }
    }

    pub fn skip_rest(&mut self) -> Result<()> {
        self.require_active("skip rest")?;
        self.progression.skip_rest(&mut self.events)
    }

    pub fn adjust_rest(&mut self, delta_seconds: i64) -> Result<u32> {
        self.require_active("adjust rest")?;
        self.progression
            .adjust_rest(&self.config, delta_seconds, &mut self.events)
    }

    pub fn skip_remaining_sets(&mut self) -> Result<()> {
        self.require_active("skip remaining sets")?;
        self.progression.skip_remaining_sets(&mut self.events)
    }

    pub fn jump_to_exercise(&mut self, target_index: usize) -> Result<()> {
        self.require_active("jump to an exercise")?;
        self.progression
            .jump_to_exercise(target_index, &mut self.events)
    }

    /// Freeze the reported clock and drop any running rest. The rest's
    /// remaining time is discarded, not preserved.
    pub fn pause(&mut self) -> Result<()> {
        self.require_active("pause")?;
        self.progression.cancel_rest(&mut self.events);
        self.paused_at = Some(self.clock.now());
        self.status = SessionStatus::Paused;
        self.events.push(SessionEvent::Paused);
        tracing::info!(session_id = %self.session_id, "Workout paused");
        Ok(())
    }

    /// Back to active at the "waiting for next set" point, with no rest.
    pub fn resume(&mut self) -> Result<()> {
        self.require(&[SessionStatus::Paused], "resume")?;
        let paused = self.close_pause(self.clock.now());
        self.status = SessionStatus::Active;
        self.events.push(SessionEvent::Resumed {
            paused_seconds: paused.num_seconds(),
        });
        tracing::info!(
            session_id = %self.session_id,
            paused_seconds = paused.num_seconds(),
            "Workout resumed"
        );
        Ok(())
    }

    /// Complete the workout. Without `early`, every planned set must have a
    /// record; sets skipped on the way still count as remaining.
    pub fn finish(&mut self, request: FinishRequest) -> Result<CompletionSummary> {
        self.require_active("finish")?;
        if let Some(rating) = request.rating {
            if !(1..=5).contains(&rating) {
                return Err(ValidationError::InvalidRating(rating).into());
            }
        }
        if !request.early {
            let remaining = aggregator::remaining_sets(self.plan(), self.records());
            if remaining > 0 {
                return Err(SessionError::SetsRemaining { remaining });
            }
        }

        self.progression.cancel_rest(&mut self.events);
        self.ended_at = Some(self.clock.now());
        self.status = SessionStatus::Completed;
        self.rating = request.rating;
        self.notes = request
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let summary = self.summary();
        self.events.push(SessionEvent::Finished {
            summary: summary.clone(),
        });
        tracing::info!(
            session_id = %self.session_id,
            duration_seconds = summary.duration_seconds,
            completion_percentage = summary.completion_percentage,
            "Workout finished"
        );
        Ok(summary)
    }

    /// Abandon the workout. Recorded sets are kept for hand-off.
    pub fn cancel(&mut self) -> Result<CompletionSummary> {
        self.require(&[SessionStatus::Active, SessionStatus::Paused], "cancel")?;
        let now = self.clock.now();
        if self.status == SessionStatus::Paused {
            self.close_pause(now);
        }
        self.progression.cancel_rest(&mut self.events);
        self.ended_at = Some(now);
        self.status = SessionStatus::Cancelled;

        let summary = self.summary();
        self.events.push(SessionEvent::Cancelled {
            summary: summary.clone(),
        });
        tracing::info!(
            session_id = %self.session_id,
            sets_performed = summary.sets_performed,
            "Workout cancelled"
        );
        Ok(summary)
    }

    fn close_pause(&mut self, now: DateTime<Utc>) -> Duration {
        let paused = self
            .paused_at
            .take()
            .map(|at| now - at)
            .unwrap_or_else(Duration::zero);
        self.total_pause += paused;
        paused
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // Selectors

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn workout_id(&self) -> &str {
        &self.plan().workout_id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn plan(&self) -> &WorkoutPlan {
        self.progression.plan()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn current_exercise_index(&self) -> usize {
        self.progression.exercise_index()
    }

    pub fn current_exercise(&self) -> &ExerciseSpec {
        self.progression.current_exercise()
    }

    pub fn current_set(&self) -> u32 {
        self.progression.current_set()
    }

    pub fn phase(&self) -> SetPhase {
        self.progression.phase()
    }

    pub fn records(&self) -> &[SetRecord] {
        self.progression.records()
    }

    pub fn rest_timer(&self) -> Option<RestTimerState> {
        self.progression.rest_state()
    }

    pub fn rest_phase(&self) -> RestPhase {
        self.progression.rest_phase()
    }

    pub fn exercise_progress(&self) -> Vec<ExerciseProgress> {
        self.progression.exercise_progress()
    }

    pub fn last_weight_for(&self, exercise_id: &str) -> Option<f64> {
        self.progression.last_weight_for(exercise_id)
    }

    fn reference_time(&self) -> DateTime<Utc> {
        self.ended_at.unwrap_or_else(|| self.clock.now())
    }

    /// Pause time so far, including a pause still in progress.
    pub fn total_pause_duration_seconds(&self) -> i64 {
        let ongoing = self
            .paused_at
            .map(|at| self.reference_time() - at)
            .unwrap_or_else(Duration::zero);
        (self.total_pause + ongoing).num_seconds()
    }

    /// Wall-clock time since start, minus all pauses. Frozen once the
    /// session ends.
    pub fn elapsed_seconds(&self) -> i64 {
        let wall = (self.reference_time() - self.started_at).num_seconds();
        (wall - self.total_pause_duration_seconds()).max(0)
    }

    pub fn elapsed_display(&self) -> String {
        format_clock(self.elapsed_seconds())
    }

    pub fn completion_percentage(&self) -> f64 {
        aggregator::completion_percentage(self.plan(), self.records())
    }

    pub fn summary(&self) -> CompletionSummary {
        let plan = self.plan();
        let records = self.records();
        CompletionSummary {
            session_id: self.session_id.clone(),
            workout_id: plan.workout_id.clone(),
            workout_name: plan.name.clone(),
            duration_seconds: self.elapsed_seconds(),
            total_pause_seconds: self.total_pause_duration_seconds(),
            sets_performed: records.len() as u32,
            total_weight_lifted: aggregator::total_weight_lifted(records),
            weight_unit: self.config.weight_unit,
            completion_percentage: aggregator::completion_percentage(plan, records),
            completed: aggregator::remaining_sets(plan, records) == 0,
            rating: self.rating,
            notes: self.notes.clone(),
            finished_at: self.reference_time(),
            exercises: aggregator::exercise_completions(plan, records),
        }
    }

    /// The hand-off record, once the session is completed or cancelled.
    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.status.is_terminal().then(|| SessionOutcome {
            status: self.status,
            summary: self.summary(),
            set_records: self.records().to_vec(),
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let plan = self.plan();
        SessionSnapshot {
            session_id: self.session_id.clone(),
            workout_id: plan.workout_id.clone(),
            workout_name: plan.name.clone(),
            status: self.status,
            phase: self.phase(),
            started_at: self.started_at,
            elapsed_seconds: self.elapsed_seconds(),
            elapsed_display: self.elapsed_display(),
            total_pause_duration_seconds: self.total_pause_duration_seconds(),
            current_exercise_index: self.current_exercise_index(),
            current_set: self.current_set(),
            current_exercise: self.current_exercise().clone(),
            rest_timer: self.rest_timer(),
            rest_phase: self.rest_phase(),
            completion_percentage: self.completion_percentage(),
            set_records: self.records().to_vec(),
            exercises: self.exercise_progress(),
        }
    }
}
