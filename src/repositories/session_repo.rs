use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{
    CompletionSummary, FromSqliteRow, SessionOutcome, SessionStatus, SetRecord, WorkoutPlan,
};
use crate::sink::SessionSink;

/// SQLite-backed [`SessionSink`] plus read-back queries for finished sessions.
#[derive(Clone)]
pub struct SessionRepository {
    pool: DbPool,
}

impl SessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// All sets saved for a session, in completion order.
    pub async fn find_sets_by_session(&self, session_id: &str) -> Result<Vec<SetRecord>> {
        let pool = self.pool.clone();
        let session_id = session_id.to_string();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let sets = SetRecord::query_all(
                &conn,
                "SELECT id, exercise_id, set_number, reps_performed, weight_used, notes, completed_at
                 FROM session_sets
                 WHERE session_id = ?
                 ORDER BY completed_at, rowid",
                [&session_id],
            )?;
            Ok(sets)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// The saved outcome of a completed or cancelled session. Per-exercise
    /// breakdowns are not stored and come back empty.
    pub async fn find_outcome(&self, session_id: &str) -> Result<Option<SessionOutcome>> {
        let pool = self.pool.clone();
        let id = session_id.to_string();

        let row = tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let row: Option<(String, CompletionSummary)> = conn
                .query_row(
                    "SELECT id AS session_id, workout_id, workout_name, status, finished_at,
                            duration_seconds, total_pause_seconds, sets_performed,
                            total_weight_lifted, weight_unit, completion_percentage, completed,
                            rating, notes
                     FROM workout_sessions
                     WHERE id = ? AND status IN ('completed', 'cancelled')",
                    [&id],
                    |row| Ok((row.get("status")?, CompletionSummary::from_row(row)?)),
                )
                .optional()?;
            Ok::<_, AppError>(row)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        let Some((status, summary)) = row else {
            return Ok(None);
        };
        let set_records = self.find_sets_by_session(session_id).await?;

        Ok(Some(SessionOutcome {
            status: SessionStatus::parse(&status),
            summary,
            set_records,
        }))
    }

    fn insert_set(conn: &rusqlite::Connection, session_id: &str, record: &SetRecord) -> Result<()> {
        conn.execute(
            "INSERT OR IGNORE INTO session_sets
                (id, session_id, exercise_id, set_number, reps_performed, weight_used, notes, completed_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                record.id,
                session_id,
                record.exercise_id,
                record.set_number,
                record.reps_performed,
                record.weight_used,
                record.notes,
                record.completed_at,
            ],
        )?;
        Ok(())
    }
}

impl SessionSink for SessionRepository {
    fn save_started(&self, session_id: &str, plan: &WorkoutPlan, started_at: DateTime<Utc>) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO workout_sessions (id, workout_id, workout_name, status, started_at)
             VALUES (?, ?, ?, 'active', ?)",
            rusqlite::params![session_id, plan.workout_id, plan.name, started_at],
        )?;
        Ok(())
    }

    fn save_set(&self, session_id: &str, record: &SetRecord) -> Result<()> {
        let conn = self.pool.get()?;
        Self::insert_set(&conn, session_id, record)
    }

    /// Writes the summary and any sets an earlier `save_set` missed, in one
    /// transaction.
    fn save_outcome(&self, outcome: &SessionOutcome) -> Result<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        let summary = &outcome.summary;

        let updated = tx.execute(
            "UPDATE workout_sessions SET
                status = ?, finished_at = ?, duration_seconds = ?, total_pause_seconds = ?,
                sets_performed = ?, total_weight_lifted = ?, weight_unit = ?,
                completion_percentage = ?, completed = ?, rating = ?, notes = ?
             WHERE id = ?",
            rusqlite::params![
                outcome.status.as_str(),
                summary.finished_at,
                summary.duration_seconds,
                summary.total_pause_seconds,
                summary.sets_performed,
                summary.total_weight_lifted,
                summary.weight_unit.as_str(),
                summary.completion_percentage,
                summary.completed,
                summary.rating,
                summary.notes,
                summary.session_id,
            ],
        )?;
        if updated == 0 {
            return Err(AppError::NotFound(format!(
                "Session {} was never saved",
                summary.session_id
            )));
        }

        for record in &outcome.set_records {
            Self::insert_set(&tx, &summary.session_id, record)?;
        }

        tx.commit()?;
        Ok(())
    }
}
