//! Market segments a quote can belong to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Market segment of a quote list.
///
/// The ingestion pipeline stores quotes under `<segment>:<symbol>`, so the
/// lowercase name doubles as the storage key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketType {
    Spot,
    Future,
}

impl MarketType {
    /// Lowercase name used on the wire and in storage keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spot => "spot",
            Self::Future => "future",
        }
    }

    /// Storage field for `symbol` in this segment.
    #[must_use]
    pub fn field(self, symbol: &str) -> String {
        format!("{}:{symbol}", self.as_str())
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spot" => Ok(Self::Spot),
            "future" => Ok(Self::Future),
            other => Err(format!("unknown market type '{other}'")),
        }
    }
}
