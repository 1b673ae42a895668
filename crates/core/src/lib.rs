//! Domain building blocks shared by every ProgramKing crate.
//!
//! Nothing in here performs I/O: the reward catalogue, promotion-code
//! formatting, discount arithmetic and webhook signature checks are pure
//! functions so the api crate and tests can rely on them directly.

pub mod discount;
pub mod error;
pub mod rewards;
pub mod types;
pub mod validation;
pub mod webhook;
