//! Outbound adapters implementing the seeding ports against remote services.

pub mod gateway;
