//! Reward claim records (`rewards:{user_id}`).
//!
//! One map per user keyed by [`RewardId`]. A missing entry means the reward
//! has not been claimed. Entries move `Claimed -> Used` and never back.

use std::collections::BTreeMap;

use programking_core::rewards::RewardId;
use programking_core::types::Timestamp;
use serde::{Deserialize, Serialize};

/// State of one claimed reward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardEntry {
    pub claimed: bool,
    pub claimed_at: Timestamp,
    /// Promotion code handed to the user. Immutable once claimed.
    pub code: String,
    pub provider_promotion_id: String,
    pub provider_coupon_id: String,
    #[serde(default)]
    pub discount_percent: Option<f64>,
    #[serde(default)]
    pub used: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_at: Option<Timestamp>,
}

impl RewardEntry {
    fn matches_code(&self, code: &str) -> bool {
        self.claimed && self.code.eq_ignore_ascii_case(code.trim())
    }
}

/// Outcome of marking a reward code as used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkUsed {
    /// The entry moved from claimed to used.
    Marked(RewardId),
    /// The entry was already used; nothing changed.
    AlreadyUsed(RewardId),
}

impl MarkUsed {
    pub fn reward_id(self) -> RewardId {
        match self {
            MarkUsed::Marked(id) | MarkUsed::AlreadyUsed(id) => id,
        }
    }
}

/// All reward entries for a single user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewardState(pub BTreeMap<RewardId, RewardEntry>);

impl RewardState {
    pub fn get(&self, reward_id: RewardId) -> Option<&RewardEntry> {
        self.0.get(&reward_id)
    }

    /// The entry for `reward_id` if it has been claimed.
    pub fn claimed(&self, reward_id: RewardId) -> Option<&RewardEntry> {
        self.get(reward_id).filter(|e| e.claimed)
    }

    pub fn insert(&mut self, reward_id: RewardId, entry: RewardEntry) {
        self.0.insert(reward_id, entry);
    }

    /// Find the claimed entry whose code matches `code` (case-insensitive).
    pub fn find_by_code(&self, code: &str) -> Option<(RewardId, &RewardEntry)> {
        self.0
            .iter()
            .find(|(_, e)| e.matches_code(code))
            .map(|(id, e)| (*id, e))
    }

    /// Mark the entry holding `code` as used.
    ///
    /// `used_at` is only set on the first transition; repeated calls leave
    /// the entry untouched. Returns `None` when no claimed entry holds `code`.
    pub fn mark_used(&mut self, code: &str, now: Timestamp) -> Option<MarkUsed> {
        let (reward_id, _) = self.find_by_code(code)?;
        let entry = self.0.get_mut(&reward_id)?;
        if entry.used {
            return Some(MarkUsed::AlreadyUsed(reward_id));
        }
        entry.used = true;
        entry.used_at = Some(now);
        Some(MarkUsed::Marked(reward_id))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use serde_json::json;

    use super::*;

    fn entry(code: &str) -> RewardEntry {
        RewardEntry {
            claimed: true,
            claimed_at: Utc::now(),
            code: code.to_string(),
            provider_promotion_id: "promo_1".into(),
            provider_coupon_id: "coupon_1".into(),
            discount_percent: Some(10.0),
            used: false,
            used_at: None,
        }
    }

    #[test]
    fn serializes_as_map_keyed_by_reward_id() {
        let mut state = RewardState::default();
        state.insert(RewardId::TwoPrograms, entry("PKABC2XYZW"));

        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["reward-2-programs"]["code"], json!("PKABC2XYZW"));
        assert_eq!(value["reward-2-programs"]["providerPromotionId"], json!("promo_1"));
        assert!(value["reward-2-programs"].get("usedAt").is_none());

        let back: RewardState = serde_json::from_value(value).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn find_by_code_ignores_case_and_whitespace() {
        let mut state = RewardState::default();
        state.insert(RewardId::FivePrograms, entry("PKABC5XYZW"));

        let (id, _) = state.find_by_code(" pkabc5xyzw ").unwrap();
        assert_eq!(id, RewardId::FivePrograms);
        assert!(state.find_by_code("PKOTHER").is_none());
    }

    #[test]
    fn mark_used_is_monotonic() {
        let mut state = RewardState::default();
        state.insert(RewardId::FivePrograms, entry("PKABC5XYZW"));

        let first = Utc::now();
        assert_eq!(
            state.mark_used("PKABC5XYZW", first),
            Some(MarkUsed::Marked(RewardId::FivePrograms))
        );
        assert_eq!(
            state.mark_used("PKABC5XYZW", first + Duration::hours(1)),
            Some(MarkUsed::AlreadyUsed(RewardId::FivePrograms))
        );

        let stored = state.get(RewardId::FivePrograms).unwrap();
        assert!(stored.used);
        assert_eq!(stored.used_at, Some(first));
    }

    #[test]
    fn mark_used_ignores_unclaimed_entries() {
        let mut state = RewardState::default();
        let mut unclaimed = entry("PKX");
        unclaimed.claimed = false;
        state.insert(RewardId::TenPrograms, unclaimed);

        assert_eq!(state.mark_used("PKX", Utc::now()), None);
        assert!(state.claimed(RewardId::TenPrograms).is_none());
    }
}
