//! Key layout of the key-value store.
//!
//! ```text
//! progress:{user_id}     UserProgress
//! rewards:{user_id}      RewardState
//! profile:{user_id}      UserProfile
//! program:{program_id}   opaque program document
//! ```

pub const PROGRESS_PREFIX: &str = "progress:";
pub const REWARDS_PREFIX: &str = "rewards:";
pub const PROFILE_PREFIX: &str = "profile:";
pub const PROGRAM_PREFIX: &str = "program:";

pub fn progress(user_id: &str) -> String {
    format!("{PROGRESS_PREFIX}{user_id}")
}

pub fn rewards(user_id: &str) -> String {
    format!("{REWARDS_PREFIX}{user_id}")
}

pub fn profile(user_id: &str) -> String {
    format!("{PROFILE_PREFIX}{user_id}")
}

pub fn program(program_id: &str) -> String {
    format!("{PROGRAM_PREFIX}{program_id}")
}
