//! Webhook subscription handshake (`hub.mode` / `hub.verify_token` / `hub.challenge`).

use serde::Deserialize;

const SUBSCRIBE_MODE: &str = "subscribe";

/// Query parameters of `GET /webhook`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HandshakeQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Outcome of a handshake attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// Mode and token matched; echo this challenge back verbatim.
    Verified(String),
    /// Mode or token present but wrong.
    Forbidden,
    /// Mode or token absent.
    MissingParams,
}

/// Check a handshake against the configured verify token.
pub fn verify_subscription(query: &HandshakeQuery, expected_token: &str) -> Verification {
    let (Some(mode), Some(token)) = (query.mode.as_deref(), query.verify_token.as_deref()) else {
        return Verification::MissingParams;
    };
    if mode == SUBSCRIBE_MODE && token == expected_token {
        Verification::Verified(query.challenge.clone().unwrap_or_default())
    } else {
        Verification::Forbidden
    }
}
