//! Inbound adapters (driving side).

pub mod gateway;
