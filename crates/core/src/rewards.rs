//! Reward catalogue and promotion-code formatting.
//!
//! Rewards are unlocked by completing a number of distinct programs. The set
//! of rewards is fixed; each one maps to a completion threshold.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Every promotion code minted for a reward starts with this prefix.
pub const PROMOTION_CODE_PREFIX: &str = "PK";

/// Number of user-id characters embedded in a promotion code.
const USER_FRAGMENT_LEN: usize = 4;

/// Number of base-36 timestamp characters appended to a promotion code.
const SUFFIX_LEN: usize = 4;

// ---------------------------------------------------------------------------
// RewardId
// ---------------------------------------------------------------------------

/// One of the fixed, threshold-gated rewards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RewardId {
    #[serde(rename = "reward-2-programs")]
    TwoPrograms,
    #[serde(rename = "reward-5-programs")]
    FivePrograms,
    #[serde(rename = "reward-9-programs")]
    NinePrograms,
    #[serde(rename = "reward-10-programs")]
    TenPrograms,
}

impl RewardId {
    /// All rewards, ordered by threshold.
    pub const ALL: [RewardId; 4] = [
        RewardId::TwoPrograms,
        RewardId::FivePrograms,
        RewardId::NinePrograms,
        RewardId::TenPrograms,
    ];

    /// Wire / storage identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            RewardId::TwoPrograms => "reward-2-programs",
            RewardId::FivePrograms => "reward-5-programs",
            RewardId::NinePrograms => "reward-9-programs",
            RewardId::TenPrograms => "reward-10-programs",
        }
    }

    /// Number of distinct completed programs needed to claim this reward.
    pub fn required_programs(self) -> u32 {
        match self {
            RewardId::TwoPrograms => 2,
            RewardId::FivePrograms => 5,
            RewardId::NinePrograms => 9,
            RewardId::TenPrograms => 10,
        }
    }

    /// Whether `completed_programs` meets this reward's threshold.
    pub fn is_unlocked(self, completed_programs: u32) -> bool {
        completed_programs >= self.required_programs()
    }
}

impl fmt::Display for RewardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RewardId {
    type Err = RewardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RewardId::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| RewardError::InvalidReward(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// RewardError
// ---------------------------------------------------------------------------

/// Rule violations in the claim / validate / redeem workflow.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RewardError {
    /// The reward was claimed before; carries the code minted back then.
    #[error("Reward already claimed")]
    AlreadyClaimed { code: String },

    #[error("Invalid reward: {0}")]
    InvalidReward(String),

    #[error("Insufficient progress for {reward_id}: {completed} of {required} programs completed")]
    InsufficientProgress {
        reward_id: RewardId,
        required: u32,
        completed: u32,
    },

    #[error("Discount percent must be greater than 0 and at most 100, got {0}")]
    InvalidDiscount(f64),

    /// No promotion code with this literal string exists at the provider.
    #[error("Invalid promotion code: {0}")]
    InvalidCode(String),

    #[error("Promotion code is no longer active")]
    CodeInactive,

    #[error("Promotion code has already been used")]
    CodeExhausted,

    #[error("Promotion code belongs to a different user")]
    CodeNotOwned,

    /// The user's reward state holds no entry with this code.
    #[error("Promotion code not found for user: {0}")]
    CodeNotFound(String),
}

// ---------------------------------------------------------------------------
// Promotion code formatting
// ---------------------------------------------------------------------------

/// Build the human-scannable promotion code for a claim.
///
/// Layout: `PK` + first four alphanumeric characters of the user id +
/// the reward threshold + the last four base-36 digits of the claim
/// timestamp in milliseconds, all uppercased.
pub fn generate_promotion_code(user_id: &str, reward_id: RewardId, now: Timestamp) -> String {
    let user_fragment: String = user_id
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(USER_FRAGMENT_LEN)
        .collect();

    let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
    let base36 = to_base36(millis);
    let suffix = &base36[base36.len().saturating_sub(SUFFIX_LEN)..];

    format!(
        "{PROMOTION_CODE_PREFIX}{user_fragment}{}{suffix}",
        reward_id.required_programs()
    )
    .to_uppercase()
}

/// Display name for the provider-side coupon backing a reward.
pub fn coupon_name(reward_id: RewardId, discount_percent: f64) -> String {
    format!(
        "ProgramKing reward ({} programs) - {discount_percent}% off",
        reward_id.required_programs()
    )
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
