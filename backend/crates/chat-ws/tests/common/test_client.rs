use axum_test::{TestServer, TestWebSocket, WsMessage};
use bytes::Bytes;
use tokio::time::{Duration, timeout};

const RECEIVE_TIMEOUT: Duration = Duration::from_secs(2);

/// WebSocket test client wrapper
pub struct WsTestClient {
    ws: TestWebSocket,
}

impl WsTestClient {
    /// Connect to the chat endpoint
    pub async fn connect(server: &TestServer) -> Self {
        let ws = server.get_websocket("/ws").await.into_websocket().await;
        Self { ws }
    }

    pub async fn send_binary(&mut self, data: impl Into<Bytes>) {
        self.ws.send_message(WsMessage::Binary(data.into())).await;
    }

    pub async fn receive_binary(&mut self) -> Bytes {
        timeout(RECEIVE_TIMEOUT, self.ws.receive_bytes())
            .await
            .expect("timed out waiting for binary message")
    }

    pub async fn send_text(&mut self, text: impl std::fmt::Display) {
        self.ws.send_text(text).await;
    }

    pub async fn receive_text(&mut self) -> String {
        timeout(RECEIVE_TIMEOUT, self.ws.receive_text())
            .await
            .expect("timed out waiting for text message")
    }

    /// Close the WebSocket connection
    pub async fn close(self) {
        self.ws.close().await;
    }
}
