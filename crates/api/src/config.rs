/// How the server obtains its store and third-party providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderMode {
    /// Postgres-backed store, Stripe, Supabase auth, configured email.
    Live,
    /// Everything in process memory. Local development only.
    Memory,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// Provider credentials are loaded separately by each provider crate.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// A single `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Path prefix every API route is nested under (default: `/api/v1`).
    pub api_prefix: String,
    pub provider_mode: ProviderMode,
    /// Signing secret for payment webhooks. Unsigned webhooks are accepted
    /// when unset.
    pub payment_webhook_secret: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default     |
    /// |-------------------------|-------------|
    /// | `HOST`                  | `0.0.0.0`   |
    /// | `PORT`                  | `3000`      |
    /// | `CORS_ORIGINS`          | `*`         |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`        |
    /// | `API_PREFIX`            | `/api/v1`   |
    /// | `PROVIDERS`             | `live`      |
    /// | `STRIPE_WEBHOOK_SECRET` | -           |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let api_prefix = normalize_prefix(
            &std::env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".into()),
        );

        let provider_mode = match std::env::var("PROVIDERS").as_deref() {
            Ok("memory") => ProviderMode::Memory,
            Ok("live") | Err(_) => ProviderMode::Live,
            Ok(other) => panic!("PROVIDERS must be 'live' or 'memory', got '{other}'"),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            api_prefix,
            provider_mode,
            payment_webhook_secret: std::env::var("STRIPE_WEBHOOK_SECRET").ok(),
        }
    }

    /// Whether CORS should allow any origin.
    pub fn cors_allows_any(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

/// Ensure a leading slash and no trailing slash.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    format!("/{trimmed}")
}
