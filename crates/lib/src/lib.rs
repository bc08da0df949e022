//! pagehook core library — config, Messenger webhook types and dispatch,
//! Graph API client, and the HTTP server used by the CLI.

pub mod config;
pub mod messenger;
pub mod server;
