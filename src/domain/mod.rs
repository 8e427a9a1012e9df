//! Exchange-agnostic domain types: quotes, fees and computed opportunities.

mod fee;
mod ids;
mod market;
mod money;
mod opportunity;
mod quote;

pub use fee::{FeeEntry, FeeLookup, FeeRate, FeeTable};
pub use ids::ConnectionId;
pub use market::MarketType;
pub use money::{approx_eq, Price, Volume};
pub use opportunity::{FeeBreakdown, LegQuote, Opportunity};
pub use quote::{best_ask, best_bid, Quote};
