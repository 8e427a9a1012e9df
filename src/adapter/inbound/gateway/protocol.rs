//! Client message wire format.
//!
//! Clients send `{"method": "...", "options": {...}}` text frames; the server
//! answers `{"success": bool, "method"?, "data"?, "message"?}`.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::application::{DiscoveryQuery, PairQuery};
use crate::error::GatewayError;

/// Gateway method names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    /// `arbitrage_pairs`: ranked stored opportunities.
    Discovery,
    /// `monitor_pairs`: live comparison of one exchange pair.
    Monitor,
    /// `stop`: drop every subscription of the connection.
    Stop,
}

impl Method {
    /// Methods that support recurring delivery.
    pub const SUBSCRIBABLE: [Method; 2] = [Method::Discovery, Method::Monitor];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Discovery => "arbitrage_pairs",
            Self::Monitor => "monitor_pairs",
            Self::Stop => "stop",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "arbitrage_pairs" => Some(Self::Discovery),
            "monitor_pairs" => Some(Self::Monitor),
            "stop" => Some(Self::Stop),
            _ => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated client request.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Discovery(DiscoveryQuery),
    Monitor(PairQuery),
    Stop,
}

impl Request {
    pub fn method(&self) -> Method {
        match self {
            Self::Discovery(_) => Method::Discovery,
            Self::Monitor(_) => Method::Monitor,
            Self::Stop => Method::Stop,
        }
    }

    /// Connections whose requests share a key receive identical payloads.
    pub fn group_key(&self) -> String {
        match self {
            Self::Discovery(q) => {
                format!("{}:{}:{}", q.kind.as_str(), q.min_profit, q.max_profit)
            }
            Self::Monitor(q) => format!(
                "{}|{}:{}|{}:{}",
                q.symbol, q.market_a, q.exchange_a, q.market_b, q.exchange_b
            ),
            Self::Stop => String::new(),
        }
    }
}

/// A decoded inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientMessage {
    pub request: Request,
    /// Register for recurring delivery instead of a single reply.
    pub auto_update: bool,
}

#[derive(Deserialize)]
struct Envelope {
    method: Option<String>,
    #[serde(default)]
    options: Value,
}

/// Decode and validate one text frame.
pub fn parse_message(text: &str) -> Result<ClientMessage, GatewayError> {
    let envelope: Envelope =
        serde_json::from_str(text).map_err(|e| GatewayError::Malformed(e.to_string()))?;
    let name = envelope.method.ok_or(GatewayError::MissingMethod)?;
    let method = Method::parse(&name).ok_or(GatewayError::UnknownMethod(name))?;

    let options = match envelope.options {
        Value::Null => Value::Object(Default::default()),
        Value::Object(map) => Value::Object(map),
        _ => {
            return Err(GatewayError::InvalidOptions {
                method: method.as_str(),
                reason: "options must be an object".to_string(),
            })
        }
    };

    let auto_update = match options.get("autoUpdate") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(_) => {
            return Err(GatewayError::InvalidOptions {
                method: method.as_str(),
                reason: "autoUpdate must be a boolean".to_string(),
            })
        }
    };

    let invalid = |e: serde_json::Error| GatewayError::InvalidOptions {
        method: method.as_str(),
        reason: e.to_string(),
    };
    let request = match method {
        Method::Discovery => Request::Discovery(serde_json::from_value(options).map_err(invalid)?),
        Method::Monitor => Request::Monitor(serde_json::from_value(options).map_err(invalid)?),
        Method::Stop => Request::Stop,
    };

    Ok(ClientMessage {
        request,
        auto_update,
    })
}

/// Server reply or broadcast frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Response {
    pub fn data(method: Method, data: Value) -> Self {
        Self {
            success: true,
            method: Some(method.as_str()),
            data: Some(data),
            message: None,
        }
    }

    pub fn ack(method: Method, message: impl Into<String>) -> Self {
        Self {
            success: true,
            method: Some(method.as_str()),
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn failure(method: Option<Method>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            method: method.map(Method::as_str),
            data: None,
            message: Some(message.into()),
        }
    }

    /// Failure reply for a frame that did not decode.
    pub fn rejected(err: &GatewayError) -> Self {
        let method = match err {
            GatewayError::InvalidOptions { method, .. } => Method::parse(method),
            _ => None,
        };
        Self::failure(method, err.to_string())
    }

    /// Serialize once for delivery to any number of connections.
    pub fn encode(&self) -> Arc<str> {
        match serde_json::to_string(self) {
            Ok(json) => json.into(),
            Err(e) => {
                warn!(error = %e, "Failed to encode response");
                Arc::from(r#"{"success":false,"message":"internal encoding error"}"#)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::DiscoveryKind;
    use crate::domain::MarketType;

    #[test]
    fn discovery_with_auto_update() {
        let msg = parse_message(
            r#"{"method":"arbitrage_pairs","options":{"type":"actionable","maxProfit":5,"autoUpdate":true}}"#,
        )
        .unwrap();
        assert!(msg.auto_update);
        let Request::Discovery(q) = &msg.request else {
            panic!("expected discovery");
        };
        assert_eq!(q.kind, DiscoveryKind::Actionable);
        assert_eq!(q.max_profit, 5.0);
        assert_eq!(msg.request.group_key(), "actionable:0:5");
    }

    #[test]
    fn options_are_optional() {
        let msg = parse_message(r#"{"method":"arbitrage_pairs"}"#).unwrap();
        assert!(!msg.auto_update);
        assert_eq!(msg.request.group_key(), "all:0:100");
        assert_eq!(parse_message(r#"{"method":"stop"}"#).unwrap().request, Request::Stop);
    }

    #[test]
    fn monitor_request_groups_by_legs() {
        let msg = parse_message(
            r#"{"method":"monitor_pairs","options":{"symbol":"BTC_USDT","exchangeA":"gate",
                "exchangeA_type":"spot","exchangeB":"mexc","exchangeB_type":"future"}}"#,
        )
        .unwrap();
        let Request::Monitor(q) = &msg.request else {
            panic!("expected monitor");
        };
        assert_eq!(q.market_b, MarketType::Future);
        assert_eq!(msg.request.group_key(), "BTC_USDT|spot:gate|future:mexc");
    }

    #[test]
    fn malformed_frames_are_classified() {
        assert!(matches!(parse_message("{not json"), Err(GatewayError::Malformed(_))));
        assert_eq!(parse_message(r#"{"options":{}}"#), Err(GatewayError::MissingMethod));
        assert_eq!(
            parse_message(r#"{"method":"arbitrage_betting"}"#),
            Err(GatewayError::UnknownMethod("arbitrage_betting".into()))
        );
        assert!(matches!(
            parse_message(r#"{"method":"arbitrage_pairs","options":{"minProfit":"high"}}"#),
            Err(GatewayError::InvalidOptions { method: "arbitrage_pairs", .. })
        ));
        assert!(matches!(
            parse_message(r#"{"method":"monitor_pairs","options":{"symbol":"BTC_USDT"}}"#),
            Err(GatewayError::InvalidOptions { method: "monitor_pairs", .. })
        ));
        assert!(matches!(
            parse_message(r#"{"method":"stop","options":{"autoUpdate":"yes"}}"#),
            Err(GatewayError::InvalidOptions { .. })
        ));
    }

    #[test]
    fn responses_omit_empty_fields() {
        let ok: Value = serde_json::from_str(&Response::ack(Method::Stop, "unsubscribed").encode()).unwrap();
        assert_eq!(ok["success"], true);
        assert_eq!(ok["method"], "stop");
        assert!(ok.get("data").is_none());

        let err = Response::rejected(&GatewayError::InvalidOptions {
            method: "monitor_pairs",
            reason: "bad".into(),
        });
        assert_eq!(err.method, Some("monitor_pairs"));
        assert!(!err.success);
        assert_eq!(Response::rejected(&GatewayError::MissingMethod).method, None);
    }
}
