//! Per-exchange top-of-book quotes and best-price selection.

use serde::{Deserialize, Serialize};

use super::money::{lenient_number, nan, Price, Volume};

/// Best bid/ask published by one exchange for one symbol.
///
/// Quotes are produced by the ingestion pipeline and are read-only here.
/// A missing, `null` or non-numeric side decodes to NaN, which makes only that
/// quote invalid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub exchange: String,
    #[serde(default = "nan", deserialize_with = "lenient_number")]
    pub bid: Price,
    #[serde(default = "nan", deserialize_with = "lenient_number")]
    pub ask: Price,
    #[serde(default)]
    pub volume: Volume,
    /// Milliseconds since the Unix epoch at ingestion time.
    #[serde(default)]
    pub timestamp: i64,
}

impl Quote {
    /// Build a quote with a zero timestamp. Mostly useful in tests.
    pub fn new(exchange: impl Into<String>, bid: Price, ask: Price, volume: Volume) -> Self {
        Self {
            exchange: exchange.into(),
            bid,
            ask,
            volume,
            timestamp: 0,
        }
    }

    /// A quote takes part in selection only when both sides are positive
    /// finite prices.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.bid.is_finite() && self.ask.is_finite() && self.bid > 0.0 && self.ask > 0.0
    }
}

/// Lowest valid ask. Ties keep the earliest quote.
#[must_use]
pub fn best_ask(quotes: &[Quote]) -> Option<&Quote> {
    quotes.iter().filter(|q| q.is_valid()).fold(None, |best, q| match best {
        Some(b) if b.ask <= q.ask => Some(b),
        _ => Some(q),
    })
}

/// Highest valid bid. Ties keep the earliest quote.
#[must_use]
pub fn best_bid(quotes: &[Quote]) -> Option<&Quote> {
    quotes.iter().filter(|q| q.is_valid()).fold(None, |best, q| match best {
        Some(b) if b.bid >= q.bid => Some(b),
        _ => Some(q),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_or_negative_prices_are_invalid() {
        assert!(Quote::new("binance", 99.0, 100.0, 1.0).is_valid());
        assert!(!Quote::new("binance", 0.0, 100.0, 1.0).is_valid());
        assert!(!Quote::new("binance", 99.0, -1.0, 1.0).is_valid());
        assert!(!Quote::new("binance", f64::NAN, 100.0, 1.0).is_valid());
        assert!(!Quote::new("binance", 99.0, f64::INFINITY, 1.0).is_valid());
    }

    #[test]
    fn best_ask_picks_lowest() {
        let quotes = vec![
            Quote::new("gate", 101.0, 102.0, 1.0),
            Quote::new("mexc", 99.0, 100.0, 1.0),
            Quote::new("bybit", 100.0, 101.0, 1.0),
        ];
        assert_eq!(best_ask(&quotes).unwrap().exchange, "mexc");
    }

    #[test]
    fn best_bid_picks_highest() {
        let quotes = vec![
            Quote::new("gate", 101.0, 102.0, 1.0),
            Quote::new("mexc", 103.0, 104.0, 1.0),
            Quote::new("bybit", 100.0, 101.0, 1.0),
        ];
        assert_eq!(best_bid(&quotes).unwrap().exchange, "mexc");
    }

    #[test]
    fn ties_keep_first_quote() {
        let quotes = vec![
            Quote::new("first", 103.0, 100.0, 1.0),
            Quote::new("second", 103.0, 100.0, 1.0),
        ];
        assert_eq!(best_ask(&quotes).unwrap().exchange, "first");
        assert_eq!(best_bid(&quotes).unwrap().exchange, "first");
    }

    #[test]
    fn zero_bid_quote_is_ignored_for_selection() {
        // The zero-bid quote has the best ask and would otherwise win.
        let quotes = vec![
            Quote::new("broken", 0.0, 90.0, 1.0),
            Quote::new("kucoin", 99.0, 100.0, 1.0),
        ];
        assert_eq!(best_ask(&quotes).unwrap().exchange, "kucoin");
        assert_eq!(best_bid(&quotes).unwrap().exchange, "kucoin");
    }

    #[test]
    fn no_valid_quotes_yields_none() {
        let quotes = vec![Quote::new("broken", 0.0, 0.0, 1.0)];
        assert!(best_ask(&quotes).is_none());
        assert!(best_bid(&[]).is_none());
    }

    #[test]
    fn deserializes_ingestion_payload() {
        let json = r#"{"exchange":"binance","bid":1.5,"ask":1.6,"volume":10,"timestamp":1700000000000}"#;
        let quote: Quote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.exchange, "binance");
        assert_eq!(quote.volume, 10.0);
        assert_eq!(quote.timestamp, 1_700_000_000_000);
    }

    #[test]
    fn missing_side_only_invalidates_its_own_quote() {
        let json = r#"[{"exchange":"gate","ask":100,"volume":1},
            {"exchange":"kucoin","bid":null,"ask":99,"volume":1},
            {"exchange":"bybit","bid":"oops","ask":98,"volume":1},
            {"exchange":"binance","bid":99,"ask":100,"volume":10}]"#;
        let quotes: Vec<Quote> = serde_json::from_str(json).unwrap();
        assert_eq!(quotes.len(), 4);
        assert!(!quotes[0].is_valid());
        assert!(!quotes[1].is_valid());
        assert!(!quotes[2].is_valid());
        assert_eq!(best_ask(&quotes).unwrap().exchange, "binance");
        assert_eq!(best_bid(&quotes).unwrap().exchange, "binance");
    }
}
