//! Exercise/set cursor and the policy for moving it.
//!
//! `current_set` is the authoritative progress cursor. Advancement looks only
//! at `sets_planned`, never at how many records exist, so repeating a set
//! after a jump-back does not count toward finishing an exercise.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::aggregator;
use super::error::{Result, SessionError};
use super::events::SessionEvent;
use super::recorder::SetRecorder;
use super::rest_timer::{RestComplete, RestPhase, RestTimer, RestTimerState};
use super::{RestPolicy, SessionConfig};
use crate::models::{ExerciseSpec, SetInput, SetRecord, WorkoutPlan};

/// Where the user is within the current exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetPhase {
    AwaitingSet,
    Resting,
    ReadyToFinish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseStatus {
    Completed,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseProgress {
    pub index: usize,
    pub exercise_id: String,
    pub name: String,
    pub status: ExerciseStatus,
    pub sets_completed: u32,
    pub sets_planned: u32,
    pub shows_weight_input: bool,
    pub last_weight_used: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Progression {
    plan: WorkoutPlan,
    exercise_index: usize,
    current_set: u32,
    ready_to_finish: bool,
    recorder: SetRecorder,
    rest: RestTimer,
}

impl Progression {
    pub fn new(plan: WorkoutPlan) -> Self {
        Self {
            plan,
            exercise_index: 0,
            current_set: 1,
            ready_to_finish: false,
            recorder: SetRecorder::new(),
            rest: RestTimer::new(),
        }
    }

    pub fn plan(&self) -> &WorkoutPlan {
        &self.plan
    }

    pub fn exercise_index(&self) -> usize {
        self.exercise_index
    }

    pub fn current_set(&self) -> u32 {
        self.current_set
    }

    pub fn current_exercise(&self) -> &ExerciseSpec {
        &self.plan.exercises[self.exercise_index]
    }

    pub fn records(&self) -> &[SetRecord] {
        self.recorder.records()
    }

    pub fn rest_state(&self) -> Option<RestTimerState> {
        self.rest.state()
    }

    /// How the most recent rest ended, or `Running` while one is in progress.
    pub fn rest_phase(&self) -> RestPhase {
        self.rest.phase()
    }

    pub fn phase(&self) -> SetPhase {
        if self.rest.is_running() {
            SetPhase::Resting
        } else if self.ready_to_finish {
            SetPhase::ReadyToFinish
        } else {
            SetPhase::AwaitingSet
        }
    }

    pub fn last_weight_for(&self, exercise_id: &str) -> Option<f64> {
        self.recorder.last_weight_for(exercise_id)
    }

    /// Record the set under the cursor and move the cursor on.
    pub fn complete_current_set(
        &mut self,
        config: &SessionConfig,
        input: &SetInput,
        now: DateTime<Utc>,
        events: &mut Vec<SessionEvent>,
    ) -> Result<SetRecord> {
        if self.ready_to_finish {
            return Err(SessionError::NoRemainingSets);
        }
        SetRecorder::validate(config, input)?;

        // Lifting before the rest ends counts as skipping it.
        if let Ok(done) = self.rest.skip() {
            self.on_rest_complete(done, events);
        }

        let exercise_id = self.current_exercise().exercise_id.clone();
        let record = self
            .recorder
            .record(config, &exercise_id, self.current_set, input, now)?
            .clone();
        events.push(SessionEvent::SetRecorded {
            record: record.clone(),
        });

        self.advance_after_set(config.rest_policy, events)?;
        Ok(record)
    }

    fn advance_after_set(
        &mut self,
        policy: RestPolicy,
        events: &mut Vec<SessionEvent>,
    ) -> Result<()> {
        let exercise = self.current_exercise();
        let sets_planned = exercise.sets_planned;
        let finishing_rest = exercise.rest_seconds;

        if self.current_set < sets_planned {
            self.current_set += 1;
            return self.start_rest(finishing_rest, events);
        }

        let from_index = self.exercise_index;
        let upcoming_rest = self.plan.exercise(from_index + 1).map(|e| e.rest_seconds);
        match upcoming_rest {
            Some(upcoming_rest) => {
                let rest_seconds = match policy {
                    RestPolicy::FinishingExercise => finishing_rest,
                    RestPolicy::UpcomingExercise => upcoming_rest,
                };
                self.exercise_index += 1;
                self.current_set = 1;
                events.push(SessionEvent::ExerciseAdvanced {
                    from_index,
                    to_index: self.exercise_index,
                });
                tracing::debug!(from_index, to_index = self.exercise_index, "Exercise advanced");
                self.start_rest(rest_seconds, events)
            }
            None => {
                self.park_at_end(events);
                Ok(())
            }
        }
    }

    fn start_rest(&mut self, seconds: u32, events: &mut Vec<SessionEvent>) -> Result<()> {
        if seconds == 0 {
            return Ok(());
        }
        self.rest
            .start(seconds, self.exercise_index, self.current_set)?;
        events.push(SessionEvent::RestStarted {
            seconds,
            target_exercise_index: self.exercise_index,
            target_set: self.current_set,
        });
        Ok(())
    }

    fn park_at_end(&mut self, events: &mut Vec<SessionEvent>) {
        self.current_set = self.current_exercise().sets_planned + 1;
        self.ready_to_finish = true;
        events.push(SessionEvent::WorkoutReadyToFinish);
        tracing::info!("All exercises done, ready to finish");
    }

    /// Abandon the rest of the current exercise without recording anything.
    pub fn skip_remaining_sets(&mut self, events: &mut Vec<SessionEvent>) -> Result<()> {
        if self.ready_to_finish {
            return Err(SessionError::NoRemainingSets);
        }
        self.cancel_rest(events);

        let index = self.exercise_index;
        let sets_abandoned = (self.current_exercise().sets_planned + 1).saturating_sub(self.current_set);
        events.push(SessionEvent::ExerciseSkipped {
            index,
            sets_abandoned,
        });
        tracing::debug!(index, sets_abandoned, "Remaining sets skipped");

        if index + 1 < self.plan.len() {
            self.exercise_index += 1;
            self.current_set = 1;
            events.push(SessionEvent::ExerciseAdvanced {
                from_index: index,
                to_index: self.exercise_index,
            });
        } else {
            self.park_at_end(events);
        }
        Ok(())
    }

    /// Move the cursor to any exercise. The set cursor resumes after the
    /// sets already recorded there, clamped to the plan.
    pub fn jump_to_exercise(&mut self, target: usize, events: &mut Vec<SessionEvent>) -> Result<()> {
        let exercise = self
            .plan
            .exercise(target)
            .ok_or(SessionError::ExerciseOutOfRange {
                index: target,
                len: self.plan.len(),
            })?;
        let existing = self.recorder.count_for(&exercise.exercise_id);
        let current_set = (existing + 1).min(exercise.sets_planned);

        self.cancel_rest(events);

        let from_index = self.exercise_index;
        self.exercise_index = target;
        self.current_set = current_set;
        self.ready_to_finish = false;
        events.push(SessionEvent::JumpedToExercise {
            from_index,
            to_index: target,
            current_set,
        });
        tracing::debug!(from_index, to_index = target, current_set, "Jumped to exercise");
        Ok(())
    }

    pub fn tick(&mut self, events: &mut Vec<SessionEvent>) {
        if let Some(done) = self.rest.tick() {
            self.on_rest_complete(done, events);
        }
    }

    pub fn skip_rest(&mut self, events: &mut Vec<SessionEvent>) -> Result<()> {
        let done = self.rest.skip()?;
        self.on_rest_complete(done, events);
        Ok(())
    }

    pub fn adjust_rest(
        &mut self,
        config: &SessionConfig,
        delta_seconds: i64,
        events: &mut Vec<SessionEvent>,
    ) -> Result<u32> {
        let seconds_remaining =
            self.rest
                .adjust(delta_seconds, config.rest_min_seconds, config.rest_max_seconds)?;
        events.push(SessionEvent::RestAdjusted { seconds_remaining });
        Ok(seconds_remaining)
    }

    /// Drop any running rest without advancing. Returns whether one ran.
    pub fn cancel_rest(&mut self, events: &mut Vec<SessionEvent>) -> bool {
        let cancelled = self.rest.cancel();
        if cancelled {
            events.push(SessionEvent::RestCancelled);
        }
        cancelled
    }

    fn on_rest_complete(&mut self, done: RestComplete, events: &mut Vec<SessionEvent>) {
        debug_assert_eq!(
            (done.target_exercise_index, done.target_set),
            (self.exercise_index, self.current_set)
        );
        events.push(SessionEvent::RestCompleted {
            skipped: done.skipped,
            target_exercise_index: done.target_exercise_index,
            target_set: done.target_set,
        });
    }

    pub fn exercise_progress(&self) -> Vec<ExerciseProgress> {
        let records = self.recorder.records();
        self.plan
            .exercises
            .iter()
            .enumerate()
            .map(|(index, e)| {
                let sets_completed = aggregator::distinct_sets(records, &e.exercise_id).min(e.sets_planned);
                let status = if index == self.exercise_index && !self.ready_to_finish {
                    ExerciseStatus::Current
                } else if sets_completed >= e.sets_planned {
                    ExerciseStatus::Completed
                } else if index == self.exercise_index {
                    // parked at the end after skipping
                    ExerciseStatus::Current
                } else {
                    ExerciseStatus::Upcoming
                };
                ExerciseProgress {
                    index,
                    exercise_id: e.exercise_id.clone(),
                    name: e.name.clone(),
                    status,
                    sets_completed,
                    sets_planned: e.sets_planned,
                    shows_weight_input: e.equipment_class.shows_weight_input(),
                    last_weight_used: self.recorder.last_weight_for(&e.exercise_id),
                }
            })
            .collect()
    }
}
