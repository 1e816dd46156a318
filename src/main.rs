use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use liftflow::config::Config;
use liftflow::engine::SystemClock;
use liftflow::handlers::{history, sessions};
use liftflow::repositories::SessionRepository;
use liftflow::store::{self, SessionStore};
use liftflow::{db, migrations, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "liftflow=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database: {}", config.database_url);

    let pool = db::create_pool(&config.database_url)?;
    migrations::run_migrations(&pool)?;

    let session_repo = SessionRepository::new(pool.clone());
    let session_store = SessionStore::new(Arc::new(SystemClock), config.session_config());

    // Rest timers advance on this single ticker.
    let _ticker = store::spawn_ticker(session_store.clone(), config.tick_interval());

    let sessions_state = sessions::SessionsState {
        store: session_store,
        sink: Arc::new(session_repo.clone()),
    };
    let history_state = history::HistoryState { session_repo };

    let app = routes::create_router(sessions_state, history_state);

    let addr = config.server_addr();
    tracing::info!("Starting server at http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
