//! Banking gateway outbound adapter.
//!
//! This module provides a thin HTTP implementation of every seeding port:
//! users, accounts, cards and operations.

mod dto;
mod http_client;

pub use http_client::GatewayHttpClient;
