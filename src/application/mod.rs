//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate the store port
//! to implement recomputation, scheduling and client queries.

pub mod engine;
pub mod fees;
pub mod market_data;
pub mod monitor;
pub mod query;
pub mod scheduler;

pub use engine::{ArbitrageEngine, Leg, Rejection, DEFAULT_SPREAD_THRESHOLD};
pub use fees::{FeeCache, FeeDefaults};
pub use market_data::MarketData;
pub use monitor::{FeeWarmup, OpportunityMonitor};
pub use query::{DiscoveryKind, DiscoveryQuery, PairQuery, QueryError, QueryService};
pub use scheduler::{Cadence, JobOutcome, JobSnapshot, Scheduler, Task};
