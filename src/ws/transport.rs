//! WebSocket transport abstraction and its tokio-tungstenite implementation.

use std::future::Future;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::frame::Frame;
use super::reassembler::FrameSource;
use crate::error::AlthermaError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A message-oriented duplex channel to the adapter.
///
/// Implementations send whole text messages and hand received data back
/// frame by frame; [`super::reassembler::read_message`] puts fragments
/// back together.
pub trait Transport: FrameSource + Send + Sized {
    /// Performs the opening handshake against `url`.
    ///
    /// # Errors
    ///
    /// Returns [`AlthermaError::Transport`] if the handshake fails.
    fn open(url: &str) -> impl Future<Output = Result<Self, AlthermaError>> + Send;

    /// Sends `text` as one complete text message.
    ///
    /// # Errors
    ///
    /// Returns [`AlthermaError::Transport`] if the write fails.
    fn send_text(&mut self, text: String) -> impl Future<Output = Result<(), AlthermaError>> + Send;

    /// Starts the closing handshake.
    ///
    /// # Errors
    ///
    /// Returns [`AlthermaError::Transport`] if the close frame cannot be
    /// sent.
    fn close(&mut self) -> impl Future<Output = Result<(), AlthermaError>> + Send;
}

/// [`Transport`] over a `tokio-tungstenite` client stream.
///
/// Dropping it releases the underlying TCP connection.
#[derive(Debug)]
pub struct WsTransport {
    stream: WsStream,
}

impl WsTransport {
    /// Wraps an already-established stream.
    #[must_use]
    pub const fn from_stream(stream: WsStream) -> Self {
        Self { stream }
    }
}

impl FrameSource for WsTransport {
    async fn next_frame(&mut self) -> Result<Option<Frame>, AlthermaError> {
        while let Some(message) = self.stream.next().await {
            let message = message.map_err(transport_error)?;
            let frame = match message {
                Message::Text(text) => Frame::text(text.as_bytes(), true),
                Message::Binary(bytes) => Frame::binary(bytes.to_vec()),
                Message::Close(close) => Frame::close(close.map(|c| u16::from(c.code))),
                // tungstenite answers pings on its own
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            };
            return Ok(Some(frame));
        }
        Ok(None)
    }
}

impl Transport for WsTransport {
    async fn open(url: &str) -> Result<Self, AlthermaError> {
        let (stream, response) = connect_async(url).await.map_err(transport_error)?;
        tracing::debug!(url, status = %response.status(), "websocket handshake complete");
        Ok(Self::from_stream(stream))
    }

    async fn send_text(&mut self, text: String) -> Result<(), AlthermaError> {
        self.stream
            .send(Message::text(text))
            .await
            .map_err(transport_error)
    }

    async fn close(&mut self) -> Result<(), AlthermaError> {
        match self.stream.close(None).await {
            Ok(()) | Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                Ok(())
            }
            Err(e) => Err(transport_error(e)),
        }
    }
}

fn transport_error(e: tungstenite::Error) -> AlthermaError {
    AlthermaError::Transport(e.to_string())
}
