use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use keygate_api::{build_router, AppState};
use keygate_core::repositories::SessionStore;
use keygate_core::services::{AuthService, SessionGuard};
use keygate_infrastructure::{
    create_pool, create_redis_pool, run_migrations, MemorySessionStore, PgUserRepository,
    RedisSessionStore,
};
use keygate_security::{PasswordService, TokenCodec};
use keygate_shared::config::{AppConfig, SessionBackend};
use keygate_shared::telemetry::init_telemetry;
use keygate_shared::utils::redact_url;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("failed to load configuration")?;

    // Initialize telemetry; the guard flushes file logs on drop
    let _log_guard = init_telemetry(&config.log).context("failed to initialise telemetry")?;

    info!("{} starting (env: {})", config.app.name, config.app.env);

    // Connect to Database
    info!("Connecting to database at {}...", redact_url(&config.database.url));
    let pool = create_pool(&config.database)
        .await
        .context("failed to connect to database")?;
    if config.database.run_migrations {
        run_migrations(&pool).await.context("failed to run migrations")?;
    }
    info!("Database connection established.");

    // Session store
    let (sessions, purge_task) = build_session_store(&config)?;

    // Services
    let codec = Arc::new(TokenCodec::from_settings(&config.jwt).context("invalid jwt settings")?);
    let auth = Arc::new(AuthService::new(
        Arc::new(PgUserRepository::new(pool)),
        sessions.clone(),
        Arc::new(PasswordService),
        codec.clone(),
    ));
    let guard = SessionGuard::new(codec, sessions.clone());

    let app = build_router(AppState::new(auth, guard, sessions), &config.app);

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse().context("invalid app.host")?;
    let addr = SocketAddr::from((host, config.app.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(task) = purge_task {
        task.abort();
    }
    info!("Server stopped");
    Ok(())
}

fn build_session_store(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn SessionStore>, Option<JoinHandle<()>>)> {
    match config.session.backend {
        SessionBackend::Redis => {
            info!("Using Redis session store at {}", redact_url(&config.redis.url));
            let pool = create_redis_pool(&config.redis).context("failed to create redis pool")?;
            let store: Arc<dyn SessionStore> =
                Arc::new(RedisSessionStore::from_settings(pool, &config.redis));
            Ok((store, None))
        }
        SessionBackend::Memory => {
            warn!("Using in-memory session store; sessions are lost on restart and not shared between instances");
            let store = Arc::new(MemorySessionStore::new());
            let task = store
                .clone()
                .spawn_purge_task(Duration::from_secs(config.session.purge_interval_secs.max(1)));
            let store: Arc<dyn SessionStore> = store;
            Ok((store, Some(task)))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
