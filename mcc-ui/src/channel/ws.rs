//! WebSocket push channel (tokio-tungstenite)

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use mcc_common::events::{Command, ServerEvent};
use mcc_common::{Error, Result};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::{HeaderValue, AUTHORIZATION};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

use super::{Connector, PushChannel};

/// Connects to the status source at a fixed URL
#[derive(Clone)]
pub struct WsConnector {
    url: String,
    token: Option<String>,
}

impl WsConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
        }
    }

    /// Send the session token as bearer credential during the handshake
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }
}

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self) -> Result<Box<dyn PushChannel>> {
        let mut request = self
            .url
            .as_str()
            .into_client_request()
            .map_err(|e| Error::Channel(format!("invalid channel URL {}: {}", self.url, e)))?;

        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| Error::Channel(format!("invalid token header: {}", e)))?;
            request.headers_mut().insert(AUTHORIZATION, value);
        }

        let (stream, response) = tokio_tungstenite::connect_async(request)
            .await
            .map_err(|e| Error::Channel(e.to_string()))?;

        info!(url = %self.url, status = %response.status(), "Push channel connected");
        Ok(Box::new(WsChannel { stream }))
    }
}

pub struct WsChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl PushChannel for WsChannel {
    async fn emit(&mut self, command: &Command) -> Result<()> {
        let text = command.to_envelope().to_json()?;
        debug!(event = command.name(), "Emitting command");
        self.stream
            .send(Message::Text(text))
            .await
            .map_err(|e| Error::Channel(e.to_string()))
    }

    async fn next_event(&mut self) -> Option<Result<ServerEvent>> {
        loop {
            let message = match self.stream.next().await? {
                Ok(message) => message,
                Err(e) => return Some(Err(Error::Channel(e.to_string()))),
            };

            match message {
                Message::Text(text) => return Some(ServerEvent::from_json(&text)),
                Message::Binary(bytes) => {
                    return Some(
                        String::from_utf8(bytes)
                            .map_err(|e| Error::Protocol(format!("non-UTF-8 frame: {}", e)))
                            .and_then(|text| ServerEvent::from_json(&text)),
                    );
                }
                Message::Close(frame) => {
                    debug!(?frame, "Push channel closed by server");
                    return None;
                }
                // Ping/pong are answered by tungstenite
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        match self.stream.close(None).await {
            Ok(()) => Ok(()),
            Err(tungstenite::Error::ConnectionClosed) | Err(tungstenite::Error::AlreadyClosed) => Ok(()),
            Err(e) => Err(Error::Channel(e.to_string())),
        }
    }
}
