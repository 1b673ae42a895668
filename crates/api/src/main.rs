use std::net::SocketAddr;
use std::sync::Arc;

use programking_api::config::{ProviderMode, ServerConfig};
use programking_api::router::build_app_router;
use programking_api::state::AppState;
use programking_db::{KvStore, MemoryKvStore, PgKvStore};
use programking_events::{build_mailer, EmailConfig, EnquiryMailer, RecordingMailer};
use programking_identity::{IdentityProvider, InMemoryIdentity, SupabaseAuth, SupabaseConfig};
use programking_payments::{InMemoryPayments, PaymentProvider, StripeClient, StripeConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "programking_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(
        prefix = %config.api_prefix,
        providers = ?config.provider_mode,
        "Loaded server configuration",
    );

    let state = match config.provider_mode {
        ProviderMode::Live => live_state(config.clone()).await,
        ProviderMode::Memory => memory_state(config.clone()),
    };

    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(config.host.parse().expect("Invalid HOST"), config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server shut down");
}

/// Postgres store and real third-party providers.
async fn live_state(config: ServerConfig) -> AppState {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = programking_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    programking_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    let store: Arc<dyn KvStore> = Arc::new(PgKvStore::new(pool));
    store
        .health_check()
        .await
        .expect("Key-value store health check failed");

    let stripe = StripeConfig::from_env().expect("STRIPE_SECRET_KEY must be set");
    let payments: Arc<dyn PaymentProvider> =
        Arc::new(StripeClient::new(stripe).expect("Failed to build Stripe client"));

    let supabase = SupabaseConfig::from_env()
        .expect("SUPABASE_URL, SUPABASE_SERVICE_ROLE_KEY and SUPABASE_ANON_KEY must be set");
    let identity: Arc<dyn IdentityProvider> =
        Arc::new(SupabaseAuth::new(supabase).expect("Failed to build Supabase client"));

    let mailer = match EmailConfig::from_env() {
        Some(email) => Some(build_mailer(email).expect("Failed to build enquiry mailer")),
        None => {
            tracing::warn!("Email not configured, /enquiries will fail");
            None
        }
    };

    if config.payment_webhook_secret.is_none() {
        tracing::warn!("STRIPE_WEBHOOK_SECRET not set, payment webhooks are unsigned");
    }

    AppState::new(config, store, payments, identity, mailer)
}

/// Everything in memory, for local development without credentials.
fn memory_state(config: ServerConfig) -> AppState {
    tracing::warn!("Running with in-memory providers; nothing is persisted");

    let mailer: Arc<dyn EnquiryMailer> = Arc::new(RecordingMailer::new());
    AppState::new(
        config,
        Arc::new(MemoryKvStore::new()),
        Arc::new(InMemoryPayments::new()),
        Arc::new(InMemoryIdentity::new()),
        Some(mailer),
    )
}

/// Resolve when SIGINT (Ctrl+C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
