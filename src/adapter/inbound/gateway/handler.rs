//! Per-message request handling.

use tracing::debug;

use super::protocol::{parse_message, Method, Request, Response};
use super::registry::{ClientHandle, SubscriptionRegistry};
use crate::application::QueryService;

/// Compute the reply for one request.
///
/// Shared by direct replies and broadcasts so both carry the same payload.
pub async fn respond(queries: &QueryService, request: &Request) -> Response {
    let encoded = match request {
        Request::Discovery(query) => {
            serde_json::to_value(queries.discover(query).await).map(|v| (Method::Discovery, v))
        }
        Request::Monitor(query) => match queries.monitor_pair(query).await {
            Ok(opportunity) => serde_json::to_value(opportunity).map(|v| (Method::Monitor, v)),
            Err(e) => return Response::failure(Some(Method::Monitor), e.to_string()),
        },
        Request::Stop => return Response::ack(Method::Stop, "unsubscribed"),
    };
    match encoded {
        Ok((method, data)) => Response::data(method, data),
        Err(e) => Response::failure(Some(request.method()), e.to_string()),
    }
}

/// Handle one inbound text frame. Returns the direct reply, if any.
///
/// An `autoUpdate` request registers the connection and gets no direct
/// reply; any other request unregisters it and is answered once.
pub async fn handle_message(
    text: &str,
    client: &ClientHandle,
    registry: &SubscriptionRegistry,
    queries: &QueryService,
) -> Option<Response> {
    let message = match parse_message(text) {
        Ok(message) => message,
        Err(e) => {
            debug!(connection = %client.id(), error = %e, "Rejected client message");
            return Some(Response::rejected(&e));
        }
    };

    let method = message.request.method();
    if method == Method::Stop {
        registry.unsubscribe(client.id());
        debug!(connection = %client.id(), "Unsubscribed");
        return Some(respond(queries, &message.request).await);
    }

    if message.auto_update {
        debug!(connection = %client.id(), %method, group = %message.request.group_key(), "Subscribed");
        registry.subscribe(client, message.request);
        return None;
    }

    registry.unsubscribe(client.id());
    Some(respond(queries, &message.request).await)
}
