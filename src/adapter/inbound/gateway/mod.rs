//! WebSocket subscription gateway.
//!
//! Clients either ask once and get one reply, or set `autoUpdate` and are
//! grouped with every other connection that asked the same thing; each
//! method's broadcaster computes one payload per group per tick.

pub mod broadcast;
pub mod handler;
pub mod protocol;
pub mod registry;
pub mod server;

pub use broadcast::{broadcast_once, BroadcastReport};
pub use protocol::{parse_message, ClientMessage, Method, Request, Response};
pub use registry::{ClientHandle, Delivery, Group, SubscriptionRegistry};
pub use server::Gateway;
