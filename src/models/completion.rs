use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::{FromSqliteRow, SetRecord, WeightUnit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Active,
    Paused,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Paused => "paused",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "paused" => SessionStatus::Paused,
            "completed" => SessionStatus::Completed,
            "cancelled" => SessionStatus::Cancelled,
            _ => SessionStatus::Active,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Cancelled)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseCompletion {
    pub exercise_id: String,
    pub sets_completed: u32,
    pub sets_planned: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionSummary {
    pub session_id: String,
    pub workout_id: String,
    pub workout_name: String,
    pub duration_seconds: i64,
    pub total_pause_seconds: i64,
    pub sets_performed: u32,
    pub total_weight_lifted: f64,
    pub weight_unit: WeightUnit,
    pub completion_percentage: f64,
    pub completed: bool,
    pub rating: Option<u8>,
    pub notes: Option<String>,
    pub finished_at: DateTime<Utc>,
    pub exercises: Vec<ExerciseCompletion>,
}

impl FromSqliteRow for CompletionSummary {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let unit: String = row.get("weight_unit")?;
        Ok(Self {
            session_id: row.get("session_id")?,
            workout_id: row.get("workout_id")?,
            workout_name: row.get("workout_name")?,
            duration_seconds: row.get("duration_seconds")?,
            total_pause_seconds: row.get("total_pause_seconds")?,
            sets_performed: row.get("sets_performed")?,
            total_weight_lifted: row.get("total_weight_lifted")?,
            weight_unit: WeightUnit::parse(&unit),
            completion_percentage: row.get("completion_percentage")?,
            completed: row.get("completed")?,
            rating: row.get("rating")?,
            notes: row.get("notes")?,
            finished_at: row.get("finished_at")?,
            exercises: Vec::new(),
        })
    }
}

/// What a finished or cancelled session hands to the persistence sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub status: SessionStatus,
    pub summary: CompletionSummary,
    pub set_records: Vec<SetRecord>,
}

impl SessionOutcome {
    /// The same outcome with every weight expressed in `unit`.
    pub fn in_unit(mut self, unit: WeightUnit) -> Self {
        let from = self.summary.weight_unit;
        if from == unit {
            return self;
        }
        self.summary.total_weight_lifted = from.convert(self.summary.total_weight_lifted, unit);
        self.summary.weight_unit = unit;
        for record in &mut self.set_records {
            record.weight_used = record.weight_used.map(|w| from.convert(w, unit));
        }
        self
    }
}
