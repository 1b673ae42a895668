//! Workflow engines behind the HTTP handlers.
//!
//! Handlers stay thin: they validate input and delegate here. Every
//! read-modify-write on a user's records goes through [`locks::UserLocks`].

pub mod checkout;
pub mod locks;
pub mod progress;
pub mod rewards;

pub use checkout::{Checkout, DiscountOutcome};
pub use locks::UserLocks;
pub use progress::ProgressTracker;
pub use rewards::RewardEngine;
