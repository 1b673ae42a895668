//! Contact-form enquiry and its email rendering.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enquiry {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
}

impl Enquiry {
    pub fn email_subject(&self) -> String {
        match self.subject.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(subject) => format!("[ProgramKing] {subject} ({})", self.name),
            None => format!("[ProgramKing] New enquiry from {}", self.name),
        }
    }

    pub fn email_body(&self) -> String {
        format!(
            "Name: {}\nEmail: {}\nPhone: {}\n\n{}",
            self.name,
            self.email,
            self.phone.as_deref().unwrap_or("-"),
            self.message
        )
    }
}
