//! Inbound message dispatch: log the message, pick a canned reply, send it.

use crate::messenger::client::MessengerError;
use crate::messenger::event::IncomingMessage;
use crate::messenger::reply::ReplySender;

/// Reply to a greeting.
pub const WELCOME_REPLY: &str = "Welcome! How can I help you today?";
/// Reply to anything else.
pub const DEFAULT_REPLY: &str = "I'm here to help! Send 'hi' for a welcome message.";

const GREETING: &str = "hi";

/// Record who sent what.
pub fn log_message(sender_id: &str, message: &IncomingMessage) {
    log::info!(
        "message from {}: {}",
        sender_id,
        message.text.as_deref().unwrap_or("<no text>")
    );
}

/// Canned reply for a message text: the welcome for "hi" in any casing, the default otherwise.
pub fn select_reply(text: Option<&str>) -> &'static str {
    match text {
        Some(t) if t.eq_ignore_ascii_case(GREETING) => WELCOME_REPLY,
        _ => DEFAULT_REPLY,
    }
}

/// Log the message and send the selected reply to the sender. Exactly one send per call.
pub async fn handle_incoming_message(
    replies: &dyn ReplySender,
    sender_id: &str,
    message: &IncomingMessage,
) -> Result<(), MessengerError> {
    log_message(sender_id, message);
    let reply = select_reply(message.text.as_deref());
    replies.send_text(sender_id, reply).await
}
