//! `/webhook` handlers: subscription handshake and event ingress.

use crate::config::ReplyDelivery;
use crate::messenger::{
    handle_incoming_message, verify_subscription, HandshakeQuery, MessengerError, Verification,
    WebhookPayload,
};
use crate::server::app::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Acknowledgement body for accepted deliveries.
pub const EVENT_RECEIVED: &str = "EVENT_RECEIVED";

/// GET /webhook — echo `hub.challenge` when mode and token match; 403 on mismatch, 400 when either is absent.
pub(crate) async fn verify_webhook(
    State(state): State<AppState>,
    Query(query): Query<HandshakeQuery>,
) -> Response {
    match verify_subscription(&query, &state.config.messenger.verify_token) {
        Verification::Verified(challenge) => {
            log::info!("WEBHOOK_VERIFIED");
            (StatusCode::OK, challenge).into_response()
        }
        Verification::Forbidden => {
            log::warn!(
                "webhook verification rejected (mode {:?})",
                query.mode.as_deref().unwrap_or_default()
            );
            StatusCode::FORBIDDEN.into_response()
        }
        Verification::MissingParams => {
            log::debug!("webhook verification without hub.mode or hub.verify_token");
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}

/// POST /webhook — dispatch the first messaging event of each entry, then acknowledge.
/// Non-page objects get 404. The acknowledgement does not depend on reply delivery.
pub(crate) async fn receive_webhook(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(e) => {
            log::debug!("webhook body rejected: {}", e);
            return StatusCode::BAD_REQUEST.into_response();
        }
    };
    if !payload.is_page() {
        log::debug!("webhook object {:?} is not a page, ignoring", payload.object);
        return StatusCode::NOT_FOUND.into_response();
    }

    for event in payload.first_events() {
        let Some(message) = event.message else {
            continue;
        };
        let sender_id = event.sender.id;
        match state.config.server.reply_delivery {
            ReplyDelivery::Background => {
                let replies = state.replies.clone();
                tokio::spawn(async move {
                    let result =
                        handle_incoming_message(replies.as_ref(), &sender_id, &message).await;
                    log_delivery(&sender_id, result);
                });
            }
            ReplyDelivery::Await => {
                let result =
                    handle_incoming_message(state.replies.as_ref(), &sender_id, &message).await;
                log_delivery(&sender_id, result);
            }
        }
    }

    (StatusCode::OK, EVENT_RECEIVED).into_response()
}

fn log_delivery(recipient_id: &str, result: Result<(), MessengerError>) {
    match result {
        Ok(()) => log::debug!("reply delivered to {}", recipient_id),
        Err(e) => log::warn!("reply to {} failed: {}", recipient_id, e),
    }
}
