mod common;

use liftflow::engine::{
    FinishRequest, RestPolicy, SessionConfig, SessionError, SessionEvent, SetPhase,
    ValidationError,
};
use liftflow::models::{SessionStatus, SetInput};
use tokio_test::{assert_err, assert_ok};

fn set(reps: i64, weight: f64) -> SetInput {
    SetInput::new(reps, Some(weight))
}

#[test]
fn test_rest_between_sets_but_not_after_final_set() {
    let (mut session, _clock) = common::start_session(common::plan_of(&[(4, 120)]));

    for expected_set in 2..=4 {
        assert_ok!(session.record_set(&set(8, 135.0)));
        assert_eq!(session.current_set(), expected_set);
        let rest = session.rest_timer().expect("rest should be running");
        assert_eq!(rest.seconds_remaining, 120);
        assert_eq!(rest.target_set, expected_set);
    }

    session.drain_events();
    assert_ok!(session.record_set(&set(8, 135.0)));

    assert!(session.rest_timer().is_none());
    assert_eq!(session.phase(), SetPhase::ReadyToFinish);
    let events = session.drain_events();
    assert!(events.contains(&SessionEvent::WorkoutReadyToFinish));
    assert!(!events
        .iter()
        .any(|e| matches!(e, SessionEvent::RestStarted { .. })));
}

#[test]
fn test_final_set_of_exercise_advances_to_next() {
    let (mut session, _clock) = common::start_session(common::plan_of(&[(4, 90), (3, 60)]));

    for _ in 0..4 {
        assert_ok!(session.record_set(&set(5, 185.0)));
    }

    assert_eq!(session.current_exercise_index(), 1);
    assert_eq!(session.current_set(), 1);
    assert_eq!(session.current_exercise().exercise_id, "ex-1");
    // Rest before the next exercise uses the finishing exercise's duration.
    assert_eq!(session.rest_timer().unwrap().seconds_remaining, 90);
}

#[test]
fn test_upcoming_rest_policy_uses_next_exercise_rest() {
    let config = SessionConfig {
        rest_policy: RestPolicy::UpcomingExercise,
        ..SessionConfig::default()
    };
    let (mut session, _clock) =
        common::start_session_with(common::plan_of(&[(1, 90), (3, 45)]), config);

    assert_ok!(session.record_set(&set(5, 185.0)));

    assert_eq!(session.current_exercise_index(), 1);
    assert_eq!(session.rest_timer().unwrap().seconds_remaining, 45);
}

#[test]
fn test_jump_resumes_after_recorded_sets_and_cancels_rest() {
    let (mut session, _clock) =
        common::start_session(common::plan_of(&[(1, 60), (3, 60), (4, 60)]));

    assert_ok!(session.jump_to_exercise(2));
    assert_ok!(session.record_set(&set(10, 50.0)));
    assert!(session.rest_timer().is_some());

    assert_ok!(session.jump_to_exercise(0));
    session.drain_events();
    assert_ok!(session.jump_to_exercise(2));

    assert_eq!(session.current_exercise_index(), 2);
    assert_eq!(session.current_set(), 2);
    assert!(session.rest_timer().is_none());
}

#[test]
fn test_jump_cancels_running_rest() {
    let (mut session, _clock) =
        common::start_session(common::plan_of(&[(3, 60), (3, 60), (3, 60)]));
    assert_ok!(session.record_set(&set(10, 50.0)));
    session.drain_events();

    assert_ok!(session.jump_to_exercise(2));

    assert!(session.rest_timer().is_none());
    let events = session.drain_events();
    assert_eq!(events[0], SessionEvent::RestCancelled);

    // A tick after the cancel never completes the old rest.
    session.tick();
    assert!(session.drain_events().is_empty());
}

#[test]
fn test_jump_out_of_range_is_rejected() {
    let (mut session, _clock) = common::start_session(common::plan_of(&[(3, 60)]));

    let err = assert_err!(session.jump_to_exercise(1));
    assert_eq!(err, SessionError::ExerciseOutOfRange { index: 1, len: 1 });
    assert_eq!(session.current_exercise_index(), 0);
}

#[test]
fn test_skip_remaining_sets_leaves_no_records() {
    let (mut session, _clock) = common::start_session(common::plan_of(&[(4, 60), (4, 60)]));
    assert_ok!(session.record_set(&set(8, 100.0)));
    assert_ok!(session.record_set(&set(8, 100.0)));

    assert_ok!(session.skip_remaining_sets());

    assert_eq!(session.current_exercise_index(), 1);
    assert_eq!(session.current_set(), 1);
    assert!(session.rest_timer().is_none());
    assert_eq!(session.records().len(), 2);
    assert!(session.records().iter().all(|r| r.set_number <= 2));
    assert!((session.completion_percentage() - 25.0).abs() < f64::EPSILON);
}

#[test]
fn test_cancel_keeps_recorded_sets() {
    let (mut session, _clock) = common::start_session(common::plan_of(&[(5, 60), (5, 60)]));
    assert_ok!(session.record_set(&set(8, 100.0)));
    assert_ok!(session.record_set(&set(8, 100.0)));

    let summary = assert_ok!(session.cancel());

    assert_eq!(session.status(), SessionStatus::Cancelled);
    assert!(!summary.completed);
    assert!((summary.completion_percentage - 20.0).abs() < f64::EPSILON);
    assert_eq!(summary.sets_performed, 2);

    let outcome = session.outcome().expect("cancelled session has an outcome");
    assert_eq!(outcome.status, SessionStatus::Cancelled);
    assert_eq!(outcome.set_records.len(), 2);
}

#[test]
fn test_invalid_input_leaves_session_unchanged() {
    let (mut session, _clock) = common::start_session(common::plan_of(&[(3, 60)]));

    let err = assert_err!(session.record_set(&set(8, 0.0)));
    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::InvalidWeight(_))
    ));
    let err = assert_err!(session.record_set(&SetInput::default()));
    assert_eq!(
        err,
        SessionError::Validation(ValidationError::MissingRequiredField("reps_performed"))
    );

    assert!(session.records().is_empty());
    assert_eq!(session.current_set(), 1);
    assert!(session.drain_events().is_empty());
}

#[test]
fn test_tick_completes_rest_without_moving_cursor() {
    let (mut session, _clock) = common::start_session(common::plan_of(&[(3, 2)]));
    assert_ok!(session.record_set(&set(8, 100.0)));
    session.drain_events();

    session.tick();
    assert_eq!(session.rest_timer().unwrap().seconds_remaining, 1);
    session.tick();

    assert!(session.rest_timer().is_none());
    assert_eq!(session.current_set(), 2);
    assert_eq!(session.phase(), SetPhase::AwaitingSet);
    assert_eq!(
        session.drain_events(),
        vec![SessionEvent::RestCompleted {
            skipped: false,
            target_exercise_index: 0,
            target_set: 2,
        }]
    );
}

#[test]
fn test_skip_and_adjust_rest() {
    let (mut session, _clock) = common::start_session(common::plan_of(&[(3, 60)]));

    assert_eq!(assert_err!(session.skip_rest()), SessionError::NoActiveTimer);

    assert_ok!(session.record_set(&set(8, 100.0)));
    assert_eq!(assert_ok!(session.adjust_rest(30)), 90);
    assert_eq!(assert_ok!(session.adjust_rest(-500)), 10);
    assert_eq!(assert_ok!(session.adjust_rest(1000)), 300);

    assert_ok!(session.skip_rest());
    assert!(session.rest_timer().is_none());
    assert_eq!(session.current_set(), 2);
}

#[test]
fn test_recording_during_rest_skips_it() {
    let (mut session, _clock) = common::start_session(common::plan_of(&[(3, 60)]));
    assert_ok!(session.record_set(&set(8, 100.0)));
    session.drain_events();

    assert_ok!(session.record_set(&set(8, 100.0)));

    let events = session.drain_events();
    assert!(matches!(
        events[0],
        SessionEvent::RestCompleted { skipped: true, .. }
    ));
    assert_eq!(session.current_set(), 3);
    assert_eq!(session.rest_timer().unwrap().seconds_remaining, 60);
}

#[test]
fn test_pause_and_resume_round_trip() {
    let (mut session, clock) = common::start_session(common::plan_of(&[(3, 60)]));
    clock.advance_secs(100);
    assert_ok!(session.record_set(&set(8, 100.0)));

    assert_ok!(session.pause());
    assert_eq!(session.status(), SessionStatus::Paused);
    assert!(session.rest_timer().is_none());
    assert_eq!(
        assert_err!(session.record_set(&set(8, 100.0))),
        SessionError::InvalidTransition {
            action: "record a set",
            status: SessionStatus::Paused,
        }
    );

    clock.advance_secs(40);
    assert_eq!(session.elapsed_seconds(), 100);

    assert_ok!(session.resume());
    assert_eq!(session.status(), SessionStatus::Active);
    assert_eq!(session.total_pause_duration_seconds(), 40);
    assert_eq!(session.current_set(), 2);
    assert!(session.rest_timer().is_none());

    clock.advance_secs(20);
    assert_eq!(session.elapsed_seconds(), 120);
    assert_eq!(session.elapsed_display(), "2:00");
}

#[test]
fn test_finish_requires_all_sets_unless_early() {
    let (mut session, clock) = common::start_session(common::plan_of(&[(2, 60)]));
    assert_ok!(session.record_set(&set(8, 100.0)));

    assert_eq!(
        assert_err!(session.finish(FinishRequest::default())),
        SessionError::SetsRemaining { remaining: 1 }
    );

    clock.advance_secs(300);
    let summary = assert_ok!(session.finish(FinishRequest::early()));
    assert_eq!(session.status(), SessionStatus::Completed);
    assert!(!summary.completed);
    assert!((summary.completion_percentage - 50.0).abs() < f64::EPSILON);
    assert_eq!(summary.duration_seconds, 300);
    assert!(session.rest_timer().is_none());

    // Terminal: nothing else is accepted.
    assert!(session.cancel().is_err());
    assert!(session.pause().is_err());
}

#[test]
fn test_finish_after_last_set_carries_rating_and_notes() {
    let (mut session, _clock) = common::start_session(common::plan_of(&[(2, 60)]));
    assert_ok!(session.record_set(&set(10, 100.0)));
    assert_ok!(session.record_set(&set(8, 100.0)));

    let err = assert_err!(session.finish(FinishRequest {
        rating: Some(6),
        ..FinishRequest::default()
    }));
    assert_eq!(err, SessionError::Validation(ValidationError::InvalidRating(6)));

    let summary = assert_ok!(session.finish(FinishRequest {
        rating: Some(4),
        notes: Some("  felt strong  ".to_string()),
        early: false,
    }));

    assert!(summary.completed);
    assert_eq!(summary.rating, Some(4));
    assert_eq!(summary.notes.as_deref(), Some("felt strong"));
    assert!((summary.total_weight_lifted - 1800.0).abs() < f64::EPSILON);
    assert!((summary.completion_percentage - 100.0).abs() < f64::EPSILON);
}

#[test]
fn test_cursor_stays_within_plan_bounds() {
    let (mut session, _clock) = common::start_session(common::plan_of(&[(2, 0), (1, 0), (3, 0)]));

    let mut last_percentage = 0.0;
    for step in 0..40 {
        match step % 5 {
            0 => {
                let _ = session.record_set(&set(5, 100.0));
            }
            1 => {
                let _ = session.skip_remaining_sets();
            }
            2 => {
                let _ = session.jump_to_exercise(1);
            }
            3 => {
                let _ = session.jump_to_exercise(7);
            }
            _ => session.tick(),
        }

        let index = session.current_exercise_index();
        assert!(index < session.plan().len());
        let sets_planned = session.current_exercise().sets_planned;
        assert!(session.current_set() >= 1);
        assert!(session.current_set() <= sets_planned + 1);

        let percentage = session.completion_percentage();
        assert!(percentage >= last_percentage);
        assert!((0.0..=100.0).contains(&percentage));
        last_percentage = percentage;
    }
}

#[test]
fn test_snapshot_reflects_progress() {
    let (mut session, _clock) = common::start_session(common::plan_of(&[(2, 60), (2, 60)]));
    assert_ok!(session.record_set(&set(8, 100.0)));

    let snapshot = session.snapshot();
    assert_eq!(snapshot.status, SessionStatus::Active);
    assert_eq!(snapshot.phase, SetPhase::Resting);
    assert_eq!(snapshot.current_set, 2);
    assert_eq!(snapshot.set_records.len(), 1);
    assert_eq!(snapshot.exercises[0].sets_completed, 1);
    assert_eq!(snapshot.exercises[0].last_weight_used, Some(100.0));
    assert!((snapshot.completion_percentage - 25.0).abs() < f64::EPSILON);
}
