//! Messenger Platform integration.
//!
//! Webhook payload types, the subscription handshake, the canned-reply dispatcher,
//! and the Graph API client used to send replies and look up user profiles.

mod client;
mod dispatch;
mod event;
mod reply;
mod verify;

pub use client::{MessengerClient, MessengerError, UserProfile};
pub use dispatch::{handle_incoming_message, log_message, select_reply, DEFAULT_REPLY, WELCOME_REPLY};
pub use event::{
    IncomingMessage, MessagingEvent, Participant, SendMessageRequest, WebhookEntry,
    WebhookPayload, PAGE_OBJECT,
};
pub use reply::ReplySender;
pub use verify::{verify_subscription, HandshakeQuery, Verification};
