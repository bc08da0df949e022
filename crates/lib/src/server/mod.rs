//! HTTP server: webhook routes and a health probe on a single port.
//!
//! `GET /webhook` answers the subscription handshake, `POST /webhook` receives
//! message events and dispatches canned replies, `GET /` reports liveness.

mod app;
mod webhook;

pub use app::{router, run_server, serve, AppState};
pub use webhook::EVENT_RECEIVED;
