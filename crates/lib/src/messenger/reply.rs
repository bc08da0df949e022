//! Reply sender seam between the dispatcher and the Send API.

use crate::messenger::client::MessengerError;
use async_trait::async_trait;

/// Delivers one text reply to a user. Implemented by [`crate::messenger::MessengerClient`].
#[async_trait]
pub trait ReplySender: Send + Sync {
    /// Send `text` to `recipient_id`. One outbound call per invocation; never retried.
    async fn send_text(&self, recipient_id: &str, text: &str) -> Result<(), MessengerError>;
}
