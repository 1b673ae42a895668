//! Program completion record (`progress:{user_id}`).

use serde::{Deserialize, Serialize};

/// Distinct programs a user has completed.
///
/// `programs` has set semantics; `completed_programs` always equals its
/// length after [`UserProgress::record_completion`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    #[serde(default)]
    pub completed_programs: u32,
    #[serde(default)]
    pub programs: Vec<String>,
}

impl UserProgress {
    /// Add `program_id` unless it is already recorded.
    ///
    /// Returns `true` when the program was newly added.
    pub fn record_completion(&mut self, program_id: &str) -> bool {
        let added = if self.has_completed(program_id) {
            false
        } else {
            self.programs.push(program_id.to_string());
            true
        };
        self.completed_programs = u32::try_from(self.programs.len()).unwrap_or(u32::MAX);
        added
    }

    pub fn has_completed(&self, program_id: &str) -> bool {
        self.programs.iter().any(|p| p == program_id)
    }
}
