use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{health, history, sessions};

pub fn create_router(
    sessions_state: sessions::SessionsState,
    history_state: history::HistoryState,
) -> Router {
    let store = sessions_state.store.clone();

    Router::new()
        // Health
        .route("/health", get(health::health_check))
        .with_state(store)
        // Live sessions
        .route("/sessions", post(sessions::create))
        .route("/sessions/{id}", get(sessions::show))
        .route("/sessions/{id}/sets", post(sessions::record_set))
        .route("/sessions/{id}/rest/skip", post(sessions::skip_rest))
        .route("/sessions/{id}/rest/adjust", post(sessions::adjust_rest))
        .route("/sessions/{id}/skip-sets", post(sessions::skip_sets))
        .route("/sessions/{id}/jump", post(sessions::jump))
        .route("/sessions/{id}/pause", post(sessions::pause))
        .route("/sessions/{id}/resume", post(sessions::resume))
        .route("/sessions/{id}/finish", post(sessions::finish))
        .route("/sessions/{id}/cancel", post(sessions::cancel))
        .with_state(sessions_state)
        // Handed-off sessions
        .route("/history/{id}", get(history::show))
        .with_state(history_state)
}
