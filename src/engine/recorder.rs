//! Set performance capture and validation.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::ValidationError;
use super::SessionConfig;
use crate::models::{SetInput, SetRecord, WeightInput};

/// Parse free-text weight entry. Empty text means "no weight" (bodyweight).
pub fn parse_weight(input: &str) -> Result<Option<f64>, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidWeight(trimmed.to_string()))?;
    validate_weight(Some(value), f64::MAX)
}

fn validate_weight(weight: Option<f64>, max: f64) -> Result<Option<f64>, ValidationError> {
    match weight {
        None => Ok(None),
        Some(w) if !w.is_finite() || w <= 0.0 => {
            Err(ValidationError::InvalidWeight(w.to_string()))
        }
        Some(w) if w > max => Err(ValidationError::OutOfRange {
            field: "weight_used",
            max,
        }),
        Some(w) => Ok(Some(w)),
    }
}

fn validate_reps(reps: Option<i64>, max: u32) -> Result<u32, ValidationError> {
    let reps = reps.ok_or(ValidationError::MissingRequiredField("reps_performed"))?;
    if reps < 0 {
        return Err(ValidationError::InvalidReps(reps));
    }
    if reps > i64::from(max) {
        return Err(ValidationError::OutOfRange {
            field: "reps_performed",
            max: f64::from(max),
        });
    }
    Ok(reps as u32)
}

/// Owns the ordered list of completed sets for one session.
#[derive(Debug, Clone, Default)]
pub struct SetRecorder {
    records: Vec<SetRecord>,
}

impl SetRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check input without recording anything.
    pub fn validate(
        config: &SessionConfig,
        input: &SetInput,
    ) -> Result<(u32, Option<f64>), ValidationError> {
        let reps = validate_reps(input.reps_performed, config.max_reps)?;
        let weight = match &input.weight_used {
            None => None,
            Some(WeightInput::Number(w)) => Some(*w),
            Some(WeightInput::Text(text)) => parse_weight(text)?,
        };
        let weight = validate_weight(weight, config.max_weight)?;
        Ok((reps, weight))
    }

    /// Validate and append a record stamped with `now`. Recording the same
    /// `(exercise_id, set_number)` twice yields two distinct records.
    pub fn record(
        &mut self,
        config: &SessionConfig,
        exercise_id: &str,
        set_number: u32,
        input: &SetInput,
        now: DateTime<Utc>,
    ) -> Result<&SetRecord, ValidationError> {
        let (reps_performed, weight_used) = Self::validate(config, input)?;
        let notes = input
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        self.records.push(SetRecord {
            id: Uuid::new_v4().to_string(),
            exercise_id: exercise_id.to_string(),
            set_number,
            reps_performed,
            weight_used,
            notes,
            completed_at: now,
        });

        tracing::debug!(
            exercise_id,
            set_number,
            reps_performed,
            ?weight_used,
            "Set recorded"
        );

        Ok(&self.records[self.records.len() - 1])
    }

    pub fn records(&self) -> &[SetRecord] {
        &self.records
    }

    pub fn for_exercise<'a>(&'a self, exercise_id: &'a str) -> impl Iterator<Item = &'a SetRecord> {
        self.records.iter().filter(move |r| r.exercise_id == exercise_id)
    }

    pub fn count_for(&self, exercise_id: &str) -> u32 {
        self.for_exercise(exercise_id).count() as u32
    }

    pub fn last_weight_for(&self, exercise_id: &str) -> Option<f64> {
        self.for_exercise(exercise_id)
            .filter_map(|r| r.weight_used)
            .last()
    }
}
