use crate::{
    BroadcastMessage, PeerConnection, PeerSink, PeerSource, Result as WsErrorResult, WsError,
};

use std::time::Duration;

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use bytes::Bytes;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use log::debug;

/// Upper bound on flushing the close frame to a peer that stopped reading
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Adapter from an upgraded axum WebSocket to the peer connection contract
pub struct WebSocketConnection {
    socket: WebSocket,
}

pub struct WebSocketSource {
    stream: SplitStream<WebSocket>,
}

pub struct WebSocketSink {
    sink: SplitSink<WebSocket, Message>,
}

impl WebSocketConnection {
    pub fn new(socket: WebSocket) -> Self {
        Self { socket }
    }
}

impl PeerConnection for WebSocketConnection {
    type Source = WebSocketSource;
    type Sink = WebSocketSink;

    fn split(self) -> (Self::Source, Self::Sink) {
        let (sink, stream) = self.socket.split();
        (WebSocketSource { stream }, WebSocketSink { sink })
    }
}

#[async_trait]
impl PeerSource for WebSocketSource {
    async fn receive(&mut self) -> WsErrorResult<BroadcastMessage> {
        while let Some(frame) = self.stream.next().await {
            match frame? {
                Message::Text(text) => return Ok(BroadcastMessage::new(Bytes::from(text))),
                Message::Binary(data) => return Ok(BroadcastMessage::new(data)),
                // Pongs for incoming pings are queued by axum itself
                Message::Ping(_) | Message::Pong(_) => continue,
                Message::Close(frame) => {
                    let reason = match frame {
                        Some(frame) => format!("close frame {}", frame.code),
                        None => String::from("close frame"),
                    };
                    return Err(WsError::connection_closed(reason));
                }
            }
        }

        Err(WsError::connection_closed("stream ended"))
    }
}

#[async_trait]
impl PeerSink for WebSocketSink {
    async fn send(&mut self, message: BroadcastMessage) -> WsErrorResult<()> {
        // Chat payloads go out as text frames, anything else as binary
        let frame = match message.as_text() {
            Some(text) => Message::Text(text.into()),
            None => Message::Binary(message.into_payload()),
        };

        self.sink.send(frame).await?;
        Ok(())
    }

    async fn close(&mut self) {
        match tokio::time::timeout(CLOSE_TIMEOUT, self.sink.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!("WebSocket close failed: {e}"),
            Err(_) => debug!("WebSocket close timed out after {:?}", CLOSE_TIMEOUT),
        }
    }
}
