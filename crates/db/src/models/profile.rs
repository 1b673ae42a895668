//! User profile record (`profile:{user_id}`).

use programking_core::types::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored user profile. Every update overwrites the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub user_image: Option<String>,
    pub updated_at: Timestamp,
}
