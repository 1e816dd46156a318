//! Countdown between sets.
//!
//! The timer holds no thread or task of its own. It moves only when the owner
//! calls [`RestTimer::tick`], so cancelling is synchronous: once `cancel`
//! returns, no later tick can report a completed rest.

use serde::{Deserialize, Serialize};

use super::error::{Result, SessionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestPhase {
    #[default]
    Idle,
    Running,
    Expired,
    Skipped,
    Cancelled,
}

/// Display state of a running rest. Only exists while resting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestTimerState {
    pub is_active: bool,
    pub seconds_remaining: u32,
    pub target_exercise_index: usize,
    pub target_set: u32,
}

/// Emitted when a rest ends by expiry or skip. Both advance the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestComplete {
    pub target_exercise_index: usize,
    pub target_set: u32,
    pub skipped: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RestTimer {
    phase: RestPhase,
    seconds_remaining: u32,
    target_exercise_index: usize,
    target_set: u32,
}

impl RestTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RestPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == RestPhase::Running
    }

    pub fn state(&self) -> Option<RestTimerState> {
        self.is_running().then_some(RestTimerState {
            is_active: true,
            seconds_remaining: self.seconds_remaining,
            target_exercise_index: self.target_exercise_index,
            target_set: self.target_set,
        })
    }

    pub fn start(
        &mut self,
        duration_seconds: u32,
        target_exercise_index: usize,
        target_set: u32,
    ) -> Result<()> {
        if self.is_running() {
            return Err(SessionError::TimerAlreadyActive);
        }
        self.phase = RestPhase::Running;
        self.seconds_remaining = duration_seconds;
        self.target_exercise_index = target_exercise_index;
        self.target_set = target_set;
        tracing::debug!(duration_seconds, target_exercise_index, target_set, "Rest started");
        Ok(())
    }

    /// One clock tick. Returns the completion when this tick ends the rest.
    pub fn tick(&mut self) -> Option<RestComplete> {
        if !self.is_running() {
            return None;
        }
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining > 0 {
            return None;
        }
        self.phase = RestPhase::Expired;
        tracing::debug!("Rest expired");
        Some(self.completion(false))
    }

    pub fn skip(&mut self) -> Result<RestComplete> {
        if !self.is_running() {
            return Err(SessionError::NoActiveTimer);
        }
        self.phase = RestPhase::Skipped;
        self.seconds_remaining = 0;
        tracing::debug!("Rest skipped");
        Ok(self.completion(true))
    }

    /// Stop without completing. Returns whether a rest was running.
    pub fn cancel(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.phase = RestPhase::Cancelled;
        self.seconds_remaining = 0;
        tracing::debug!("Rest cancelled");
        true
    }

    /// Add or remove time from a running rest, clamped to `[min, max]`.
    pub fn adjust(&mut self, delta_seconds: i64, min: u32, max: u32) -> Result<u32> {
        if !self.is_running() {
            return Err(SessionError::NoActiveTimer);
        }
        let adjusted = (i64::from(self.seconds_remaining) + delta_seconds)
            .clamp(i64::from(min), i64::from(max));
        self.seconds_remaining = adjusted as u32;
        Ok(self.seconds_remaining)
    }

    fn completion(&self, skipped: bool) -> RestComplete {
        RestComplete {
            target_exercise_index: self.target_exercise_index,
            target_set: self.target_set,
            skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_and_expires() {
        let mut timer = RestTimer::new();
        timer.start(3, 0, 2).unwrap();
        assert_eq!(timer.state().unwrap().seconds_remaining, 3);

        assert_eq!(timer.tick(), None);
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.state().unwrap().seconds_remaining, 1);

        let done = timer.tick().unwrap();
        assert!(!done.skipped);
        assert_eq!(done.target_set, 2);
        assert_eq!(timer.phase(), RestPhase::Expired);
        assert!(timer.state().is_none());

        // Further ticks are inert.
        assert_eq!(timer.tick(), None);
    }

    #[test]
    fn test_second_start_is_rejected() {
        let mut timer = RestTimer::new();
        timer.start(60, 0, 2).unwrap();
        assert_eq!(timer.start(90, 1, 1), Err(SessionError::TimerAlreadyActive));
        assert_eq!(timer.state().unwrap().seconds_remaining, 60);
    }

    #[test]
    fn test_skip_completes_like_expiry() {
        let mut timer = RestTimer::new();
        timer.start(120, 1, 1).unwrap();
        let done = timer.skip().unwrap();
        assert!(done.skipped);
        assert_eq!(done.target_exercise_index, 1);
        assert_eq!(timer.phase(), RestPhase::Skipped);
        assert_eq!(timer.skip(), Err(SessionError::NoActiveTimer));
    }

    #[test]
    fn test_cancel_suppresses_completion() {
        let mut timer = RestTimer::new();
        timer.start(1, 0, 2).unwrap();
        assert!(timer.cancel());
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.phase(), RestPhase::Cancelled);
        assert!(!timer.cancel());
    }

    #[test]
    fn test_restart_after_finish() {
        let mut timer = RestTimer::new();
        timer.start(1, 0, 2).unwrap();
        timer.tick();
        assert!(timer.start(5, 0, 3).is_ok());
    }

    #[test]
    fn test_adjust_clamps() {
        let mut timer = RestTimer::new();
        assert_eq!(timer.adjust(15, 10, 300), Err(SessionError::NoActiveTimer));

        timer.start(90, 0, 2).unwrap();
        assert_eq!(timer.adjust(15, 10, 300).unwrap(), 105);
        assert_eq!(timer.adjust(-200, 10, 300).unwrap(), 10);
        assert_eq!(timer.adjust(1000, 10, 300).unwrap(), 300);
    }
}
