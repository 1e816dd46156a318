//! In-process registry of live sessions.
//!
//! Every action on a session runs under one lock, so actions and timer ticks
//! are applied one at a time in arrival order. Nothing awaits while the lock
//! is held.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::engine::{
    ActiveSession, Clock, RestPhase, SessionConfig, SessionError, SessionEvent, SessionSnapshot,
};
use crate::error::{AppError, Result};
use crate::models::{SessionOutcome, WorkoutPlan};
use crate::sink::SessionSink;

/// What an action produced, captured before the lock is released.
pub struct Applied<T> {
    pub value: T,
    pub snapshot: SessionSnapshot,
    pub events: Vec<SessionEvent>,
    pub outcome: Option<SessionOutcome>,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, ActiveSession>>>,
    clock: Arc<dyn Clock>,
    config: SessionConfig,
}

impl SessionStore {
    pub fn new(clock: Arc<dyn Clock>, config: SessionConfig) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            clock,
            config,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ActiveSession>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn create(&self, plan: WorkoutPlan) -> Result<SessionSnapshot> {
        let session = ActiveSession::create(plan, self.config.clone(), self.clock.clone())?;
        let snapshot = session.snapshot();
        self.lock().insert(snapshot.session_id.clone(), session);
        Ok(snapshot)
    }

    pub fn snapshot(&self, session_id: &str) -> Result<SessionSnapshot> {
        self.lock()
            .get(session_id)
            .map(ActiveSession::snapshot)
            .ok_or_else(|| not_found(session_id))
    }

    /// Run one action. A rejected action leaves the session as it was. A
    /// session that ends here is removed once its outcome is captured.
    pub fn apply<T, F>(&self, session_id: &str, action: F) -> Result<Applied<T>>
    where
        F: FnOnce(&mut ActiveSession) -> std::result::Result<T, SessionError>,
    {
        let mut sessions = self.lock();
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| not_found(session_id))?;

        let value = action(session)?;
        let events = session.drain_events();
        let snapshot = session.snapshot();
        let outcome = session.outcome();
        if outcome.is_some() {
            sessions.remove(session_id);
        }

        Ok(Applied {
            value,
            snapshot,
            events,
            outcome,
        })
    }

    /// Deliver one timer tick to every live session. Events raised by a tick
    /// stay buffered on the session and go out with the next action response.
    pub fn tick_all(&self) {
        let mut sessions = self.lock();
        for (id, session) in sessions.iter_mut() {
            let was_running = session.rest_phase() == RestPhase::Running;
            session.tick();
            if was_running && session.rest_phase() == RestPhase::Expired {
                tracing::debug!(session_id = %id, "Rest expired");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

fn not_found(session_id: &str) -> AppError {
    AppError::NotFound(format!("Session {} not found", session_id))
}

pub fn spawn_ticker(store: SessionStore, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            store.tick_all();
        }
    })
}

/// Forward recorded sets and any final outcome to the sink. Returns whether
/// everything was saved; failures are logged and never undo local state.
pub async fn hand_off(
    sink: Arc<dyn SessionSink>,
    session_id: String,
    events: Vec<SessionEvent>,
    outcome: Option<SessionOutcome>,
) -> bool {
    let saved = tokio::task::spawn_blocking(move || -> Result<()> {
        for event in &events {
            if let SessionEvent::SetRecorded { record } = event {
                sink.save_set(&session_id, record)?;
            }
        }
        if let Some(outcome) = &outcome {
            sink.save_outcome(outcome)?;
        }
        Ok(())
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))
    .and_then(|r| r);

    match saved {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Failed to persist session data: {}", e);
            false
        }
    }
}
