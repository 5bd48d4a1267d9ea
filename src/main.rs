//! Scriptorium server entry point.

use std::process::ExitCode;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use scriptorium::adapters::http::{api_router, with_http_layers, AppState};
use scriptorium::adapters::memory::{InMemoryAccountStore, InMemorySessionRepository};
use scriptorium::adapters::postgres::{
    run_migrations, PostgresSessionRepository, PostgresSubscriptionLedger, PostgresUserRepository,
};
use scriptorium::adapters::rate_limiter::InMemoryRateLimiter;
use scriptorium::application::handlers::identity::IdentityPolicy;
use scriptorium::application::reconciliation::PollPolicy;
use scriptorium::config::{AppConfig, DatabaseConfig};
use scriptorium::domain::identity::PasswordHasher;
use scriptorium::domain::subscription::{OrderingPolicy, WebhookVerifier};
use scriptorium::ports::{SessionRepository, SubscriptionLedger, UserRepository};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server exited with error");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.server.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn run(config: AppConfig) -> Result<(), BoxError> {
    let state = build_state(&config).await?;

    let app = with_http_layers(
        api_router(state),
        config.server.request_timeout(),
        &config.server.cors_origins_list(),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Scriptorium listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Scriptorium stopped");
    Ok(())
}

async fn build_state(config: &AppConfig) -> Result<AppState, BoxError> {
    let (users, sessions, ledger) = match &config.database {
        Some(database) => {
            let pool = connect(database).await?;
            let users: Arc<dyn UserRepository> =
                Arc::new(PostgresUserRepository::new(pool.clone()));
            let sessions: Arc<dyn SessionRepository> =
                Arc::new(PostgresSessionRepository::new(pool.clone()));
            let ledger: Arc<dyn SubscriptionLedger> =
                Arc::new(PostgresSubscriptionLedger::new(pool));
            (users, sessions, ledger)
        }
        None => {
            tracing::warn!("No database configured, using in-memory stores; data is lost on restart");
            let accounts = Arc::new(InMemoryAccountStore::new());
            let users: Arc<dyn UserRepository> = accounts.clone();
            let sessions: Arc<dyn SessionRepository> = Arc::new(InMemorySessionRepository::new());
            let ledger: Arc<dyn SubscriptionLedger> = accounts;
            (users, sessions, ledger)
        }
    };

    let hasher = PasswordHasher::with_cost(
        config.auth.argon2_memory_kib,
        config.auth.argon2_iterations,
        config.auth.argon2_parallelism,
        config.auth.password_pepper.clone(),
    )?;

    let webhook_verifier = match config.payment.webhook_secret() {
        Some(secret) => Some(Arc::new(WebhookVerifier::new(
            secret.clone(),
            config.payment.signature_tolerance_secs,
        ))),
        None => {
            tracing::warn!(
                target: "security",
                "No webhook secret configured, webhook deliveries will NOT be verified"
            );
            None
        }
    };

    let subscription = &config.subscription;
    let rate_limiter = InMemoryRateLimiter::new(
        subscription.manual_activation_limit,
        subscription.manual_activation_window_secs,
    );

    Ok(AppState {
        users,
        sessions,
        ledger,
        rate_limiter: Arc::new(rate_limiter),
        hasher: Arc::new(hasher),
        webhook_verifier,
        identity_policy: IdentityPolicy {
            session_ttl: config.auth.session_ttl(),
            password_min_length: config.auth.password_min_length,
        },
        ordering_policy: OrderingPolicy::from_flag(subscription.reject_stale_events),
        poll_policy: PollPolicy {
            interval: subscription.poll_interval(),
            max_attempts: subscription.poll_attempts,
        },
        default_period_days: subscription.default_period_days,
    })
}

async fn connect(database: &DatabaseConfig) -> Result<sqlx::PgPool, BoxError> {
    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .connect(&database.url)
        .await?;

    if database.run_migrations {
        run_migrations(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    Ok(pool)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
