#![allow(dead_code)]

use std::sync::Arc;

use axum::{body::Body, http::Request, response::Response, Router};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use liftflow::db::{create_memory_pool, DbPool};
use liftflow::engine::{ActiveSession, ManualClock, SessionConfig};
use liftflow::handlers::{history, sessions};
use liftflow::migrations::run_migrations;
use liftflow::models::{EquipmentClass, ExerciseSpec, RepsPlanned, WorkoutPlan};
use liftflow::repositories::SessionRepository;
use liftflow::sink::{MemorySink, SessionSink};
use liftflow::store::SessionStore;

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations(&pool).expect("Failed to run migrations");
    pool
}

pub struct TestApp {
    pub router: Router,
    pub store: SessionStore,
    pub clock: ManualClock,
}

fn build_app(pool: DbPool, sink: Arc<dyn SessionSink>) -> TestApp {
    let clock = ManualClock::default();
    let store = SessionStore::new(Arc::new(clock.clone()), SessionConfig::default());

    let sessions_state = sessions::SessionsState {
        store: store.clone(),
        sink,
    };
    let history_state = history::HistoryState {
        session_repo: SessionRepository::new(pool),
    };

    TestApp {
        router: liftflow::routes::create_router(sessions_state, history_state),
        store,
        clock,
    }
}

/// App whose sessions are saved to the given database.
pub fn create_test_app(pool: DbPool) -> TestApp {
    let sink = Arc::new(SessionRepository::new(pool.clone()));
    build_app(pool, sink)
}

/// App whose sessions are saved to an in-memory sink the test can inspect.
pub fn create_test_app_with_sink(pool: DbPool, sink: MemorySink) -> TestApp {
    build_app(pool, Arc::new(sink))
}

pub fn exercise(id: &str, sets_planned: u32, rest_seconds: u32, order_index: u32) -> ExerciseSpec {
    ExerciseSpec {
        exercise_id: id.to_string(),
        name: id.to_string(),
        equipment_class: EquipmentClass::Barbell,
        sets_planned,
        reps_planned: RepsPlanned::Range { min: 8, max: 12 },
        rest_seconds,
        order_index,
    }
}

pub fn plan(exercises: Vec<ExerciseSpec>) -> WorkoutPlan {
    WorkoutPlan {
        workout_id: "w-1".to_string(),
        name: "Test Day".to_string(),
        exercises,
    }
}

/// Plan with one exercise per `(sets_planned, rest_seconds)` pair.
pub fn plan_of(shape: &[(u32, u32)]) -> WorkoutPlan {
    plan(
        shape
            .iter()
            .enumerate()
            .map(|(i, &(sets, rest))| exercise(&format!("ex-{}", i), sets, rest, i as u32))
            .collect(),
    )
}

pub fn start_session(plan: WorkoutPlan) -> (ActiveSession, ManualClock) {
    start_session_with(plan, SessionConfig::default())
}

pub fn start_session_with(plan: WorkoutPlan, config: SessionConfig) -> (ActiveSession, ManualClock) {
    let clock = ManualClock::default();
    let session = ActiveSession::create(plan, config, Arc::new(clock.clone()))
        .expect("Failed to start session");
    (session, clock)
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
