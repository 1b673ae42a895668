pub mod auth;
pub mod enquiries;
pub mod payment;
pub mod profile;
pub mod programs;
pub mod progress;
pub mod rewards;
