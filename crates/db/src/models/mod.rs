//! Record shapes stored in the key-value store.
//!
//! Field names are camelCase on the wire and in storage so records stay
//! readable by the frontend without translation.

pub mod profile;
pub mod program;
pub mod progress;
pub mod reward;
