//! Persistence hand-off.
//!
//! The engine never calls a sink itself. The host drains session events and
//! forwards sets and the final outcome here. A failed save is logged and
//! reported; the in-memory session is never rolled back because of it.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{SessionOutcome, SetRecord, WorkoutPlan};

pub trait SessionSink: Send + Sync {
    fn save_started(&self, session_id: &str, plan: &WorkoutPlan, started_at: DateTime<Utc>) -> Result<()>;

    fn save_set(&self, session_id: &str, record: &SetRecord) -> Result<()>;

    fn save_outcome(&self, outcome: &SessionOutcome) -> Result<()>;
}

/// Keeps everything in memory. Used by tests and when no database is wanted.
#[derive(Clone, Default)]
pub struct MemorySink {
    started: Arc<Mutex<Vec<String>>>,
    sets: Arc<Mutex<Vec<(String, SetRecord)>>>,
    outcomes: Arc<Mutex<Vec<SessionOutcome>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn sets(&self) -> Vec<(String, SetRecord)> {
        self.sets.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn outcomes(&self) -> Vec<SessionOutcome> {
        self.outcomes.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl SessionSink for MemorySink {
    fn save_started(&self, session_id: &str, _plan: &WorkoutPlan, _started_at: DateTime<Utc>) -> Result<()> {
        self.started
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(session_id.to_string());
        Ok(())
    }

    fn save_set(&self, session_id: &str, record: &SetRecord) -> Result<()> {
        self.sets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((session_id.to_string(), record.clone()));
        Ok(())
    }

    fn save_outcome(&self, outcome: &SessionOutcome) -> Result<()> {
        self.outcomes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(outcome.clone());
        Ok(())
    }
}
