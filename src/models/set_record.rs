use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

/// One completed set. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    pub id: String,
    pub exercise_id: String,
    pub set_number: u32,
    pub reps_performed: u32,
    pub weight_used: Option<f64>,
    pub notes: Option<String>,
    pub completed_at: DateTime<Utc>,
}

impl SetRecord {
    /// weight × reps, zero for bodyweight sets.
    pub fn volume(&self) -> f64 {
        self.weight_used
            .map(|w| w * f64::from(self.reps_performed))
            .unwrap_or(0.0)
    }
}

impl FromSqliteRow for SetRecord {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            exercise_id: row.get("exercise_id")?,
            set_number: row.get("set_number")?,
            reps_performed: row.get("reps_performed")?,
            weight_used: row.get("weight_used")?,
            notes: row.get("notes")?,
            completed_at: row.get("completed_at")?,
        })
    }
}

/// Weight as the client sent it: a JSON number, or text from a form field.
/// Text is parsed during validation so a bad entry is a validation error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WeightInput {
    Number(f64),
    Text(String),
}

impl From<f64> for WeightInput {
    fn from(value: f64) -> Self {
        WeightInput::Number(value)
    }
}

/// Raw performance as entered by the user, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetInput {
    pub reps_performed: Option<i64>,
    #[serde(default)]
    pub weight_used: Option<WeightInput>,
    pub notes: Option<String>,
}

impl SetInput {
    pub fn new(reps_performed: i64, weight_used: Option<f64>) -> Self {
        Self {
            reps_performed: Some(reps_performed),
            weight_used: weight_used.map(WeightInput::from),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_ignores_bodyweight_sets() {
        let mut record = SetRecord {
            id: "r1".to_string(),
            exercise_id: "bench".to_string(),
            set_number: 1,
            reps_performed: 8,
            weight_used: Some(185.0),
            notes: None,
            completed_at: Utc::now(),
        };
        assert_eq!(record.volume(), 1480.0);

        record.weight_used = None;
        assert_eq!(record.volume(), 0.0);
    }

    #[test]
    fn test_set_input_keeps_weight_as_sent() {
        let input: SetInput =
            serde_json::from_str(r#"{"reps_performed": 10, "weight_used": ""}"#).unwrap();
        assert_eq!(input.reps_performed, Some(10));
        assert_eq!(input.weight_used, Some(WeightInput::Text(String::new())));

        let input: SetInput =
            serde_json::from_str(r#"{"reps_performed": 8, "weight_used": 185.5}"#).unwrap();
        assert_eq!(input.weight_used, Some(WeightInput::Number(185.5)));

        let input: SetInput = serde_json::from_str(r#"{"reps_performed": 8}"#).unwrap();
        assert_eq!(input.weight_used, None);
    }

    #[test]
    fn test_set_input_accepts_non_numeric_weight_text() {
        let input: SetInput =
            serde_json::from_str(r#"{"reps_performed": 8, "weight_used": "heavy"}"#).unwrap();
        assert_eq!(input.weight_used, Some(WeightInput::Text("heavy".to_string())));
    }
}
