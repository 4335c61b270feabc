//! HTTP server implementation
//!
//! Health and job listing routes plus the WebSocket control channel.

pub mod builder;
pub mod protocol;
pub mod routes;
pub mod server;
pub mod state;
pub mod ws;
