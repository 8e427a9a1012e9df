//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!     WebSocket ────▶│      Application        │
//!      Gateway       │  Domain + Port          ├──────────────┐
//!                    └─────────────────────────┘              │
//!                                                             ▼
//!                                                      ┌─────────────┐
//!                                                      │ Hash store  │
//!                                                      │ (Redis/mem) │
//!                                                      └─────────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`HashStore`] - Hash-of-hashes key-value access for quotes, fees and results

pub mod outbound;

pub use outbound::store::HashStore;
