use std::sync::Arc;

use programking_db::KvStore;
use programking_events::EnquiryMailer;
use programking_identity::IdentityProvider;
use programking_payments::PaymentProvider;

use crate::config::ServerConfig;
use crate::engine::checkout::Checkout;
use crate::engine::locks::UserLocks;
use crate::engine::progress::ProgressTracker;
use crate::engine::rewards::RewardEngine;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Key-value store holding every record.
    pub store: Arc<dyn KvStore>,
    pub payments: Arc<dyn PaymentProvider>,
    pub identity: Arc<dyn IdentityProvider>,
    /// Enquiry email delivery; `None` when email is not configured.
    pub mailer: Option<Arc<dyn EnquiryMailer>>,
    pub rewards: Arc<RewardEngine>,
    pub progress: Arc<ProgressTracker>,
    pub checkout: Arc<Checkout>,
}

impl AppState {
    /// Wire the workflow engines on top of the given store and providers.
    ///
    /// All engines share one [`UserLocks`] so completion, claim and redeem
    /// sequences for the same user never interleave within this process.
    pub fn new(
        config: ServerConfig,
        store: Arc<dyn KvStore>,
        payments: Arc<dyn PaymentProvider>,
        identity: Arc<dyn IdentityProvider>,
        mailer: Option<Arc<dyn EnquiryMailer>>,
    ) -> Self {
        let locks = Arc::new(UserLocks::new());

        let rewards = Arc::new(RewardEngine::new(
            Arc::clone(&store),
            Arc::clone(&payments),
            Arc::clone(&locks),
        ));
        let progress = Arc::new(ProgressTracker::new(Arc::clone(&store), Arc::clone(&locks)));
        let checkout = Arc::new(Checkout::new(Arc::clone(&payments)));

        Self {
            config: Arc::new(config),
            store,
            payments,
            identity,
            mailer,
            rewards,
            progress,
            checkout,
        }
    }
}
