use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::stream::{SplitStream, StreamExt};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use super::connection::WebSocketSink;
use super::dispatcher::FanOutDispatcher;
use super::error::RelayError;
use super::registry::ConnectionRegistry;
use super::source::RedisChannelSource;
use super::subscriber::ChannelSubscriber;
use crate::config::RelayConfig;

/// Runs the relay until the process is terminated
///
/// The subscriber is spawned as its own task; if its initial subscribe
/// fails it ends and the accept loop keeps serving without notifications.
/// There is no shutdown sequence: open connections and in-flight dispatches
/// are simply abandoned on exit.
pub async fn run(config: RelayConfig) -> Result<(), RelayError> {
    let registry = ConnectionRegistry::new();
    let dispatcher = FanOutDispatcher::new(registry.clone());

    tokio::spawn(run_subscriber(config.clone(), dispatcher));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Relay accepting WebSocket connections");
    axum::serve(listener, relay_router(registry)).await?;
    Ok(())
}

async fn run_subscriber(config: RelayConfig, dispatcher: FanOutDispatcher) {
    let source = match RedisChannelSource::subscribe(&config.broker).await {
        Ok(source) => source,
        Err(e) => {
            error!(
                url = %config.broker.url,
                channel = %config.broker.channel,
                error = %e,
                "Could not subscribe to broker, relay will not deliver notifications"
            );
            return;
        }
    };

    ChannelSubscriber::new(Box::new(source), dispatcher)
        .with_poll_timeout(config.poll_timeout)
        .with_error_backoff(config.error_backoff)
        .run()
        .await;
}

/// The accept loop as a router: every upgrade on `/` becomes a registered connection
pub fn relay_router(registry: ConnectionRegistry) -> Router {
    Router::new()
        .route("/", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(registry)
}

async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(registry): State<ConnectionRegistry>,
) -> Response {
    ws.on_upgrade(move |socket| handle_connection(socket, registry))
}

/// Registers the connection, then watches its read half until it closes
async fn handle_connection(socket: WebSocket, registry: ConnectionRegistry) {
    let (sink, stream) = socket.split();
    let connection_id = registry.register(Arc::new(WebSocketSink::new(sink))).await;
    info!(connection_id = %connection_id, "Client connected");

    wait_for_close(stream).await;

    registry.remove(connection_id).await;
    info!(connection_id = %connection_id, "Client disconnected");
}

async fn wait_for_close(mut stream: SplitStream<WebSocket>) {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Close(_)) => break,
            Ok(Message::Text(text)) => {
                debug!(message = %text, "Ignoring inbound client message");
            }
            Ok(_) => {} // binary/ping/pong carry no meaning here
            Err(e) => {
                warn!(error = %e, "WebSocket read error");
                break;
            }
        }
    }
}
