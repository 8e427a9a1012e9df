//! Application orchestration.
//!
//! Runtime wiring and lifecycle management: store connection, job
//! registration, the scheduler tick loop and the gateway.

pub mod orchestrator;
mod runtime;
mod scan;
