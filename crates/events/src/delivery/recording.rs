//! In-memory [`EnquiryMailer`] that records what it would have sent.

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{EmailError, EnquiryMailer};
use crate::enquiry::Enquiry;

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Enquiry>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<Enquiry> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl EnquiryMailer for RecordingMailer {
    async fn send(&self, enquiry: &Enquiry) -> Result<(), EmailError> {
        self.sent.lock().await.push(enquiry.clone());
        Ok(())
    }
}
