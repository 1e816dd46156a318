//! End-of-workout totals, computed on demand from the plan and set records.

use std::collections::BTreeSet;

use crate::models::{ExerciseCompletion, SetRecord, WorkoutPlan};

/// Distinct set numbers recorded for an exercise. A set repeated after a
/// jump-back counts once.
pub fn distinct_sets(records: &[SetRecord], exercise_id: &str) -> u32 {
    records
        .iter()
        .filter(|r| r.exercise_id == exercise_id)
        .map(|r| r.set_number)
        .collect::<BTreeSet<_>>()
        .len() as u32
}

/// Σ weight × reps over weighted sets.
pub fn total_weight_lifted(records: &[SetRecord]) -> f64 {
    records.iter().map(SetRecord::volume).sum()
}

pub fn exercise_completions(plan: &WorkoutPlan, records: &[SetRecord]) -> Vec<ExerciseCompletion> {
    plan.exercises
        .iter()
        .map(|e| ExerciseCompletion {
            exercise_id: e.exercise_id.clone(),
            sets_completed: distinct_sets(records, &e.exercise_id).min(e.sets_planned),
            sets_planned: e.sets_planned,
        })
        .collect()
}

/// Percentage of planned sets covered by at least one record, in `[0, 100]`.
pub fn completion_percentage(plan: &WorkoutPlan, records: &[SetRecord]) -> f64 {
    let planned = plan.total_sets_planned();
    if planned == 0 {
        return 0.0;
    }
    let done: u32 = exercise_completions(plan, records)
        .iter()
        .map(|c| c.sets_completed)
        .sum();
    (f64::from(done) / f64::from(planned) * 100.0).clamp(0.0, 100.0)
}

/// Planned sets not yet covered by any record.
pub fn remaining_sets(plan: &WorkoutPlan, records: &[SetRecord]) -> u32 {
    exercise_completions(plan, records)
        .iter()
        .map(|c| c.sets_planned - c.sets_completed)
        .sum()
}
