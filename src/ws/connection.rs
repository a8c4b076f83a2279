//! Connection state and request/response correlation.
//!
//! A [`Connection`] owns one transport and allows exactly one outstanding
//! request. [`Connection::call`] sends an envelope, waits for the next
//! complete message, and checks that it answers the request that was sent.

use serde_json::Value;

use super::frame::MessageKind;
use super::messages::{
    ContentInstance, RESPONSE_CODE_PATH, RESPONSE_ID_PATH, RESPONSE_TO_PATH, RequestEnvelope,
    decode,
};
use super::reassembler::read_message;
use super::transport::Transport;
use crate::domain::{CorrelationId, Endpoint, Resource, ResultCode};
use crate::error::AlthermaError;
use crate::json_path::{FromJsonLeaf, extract};

/// Identity this client uses as request originator. The adapter addresses
/// its responses back to it.
pub const CLIENT_IDENTITY: &str = "altherma-client";

/// Whether a transport is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No transport; every call fails with [`AlthermaError::NotConnected`].
    Disconnected,
    /// Handshake completed.
    Connected,
}

/// A validated response to one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Id shared by the request and this response.
    pub correlation_id: CorrelationId,
    /// Device-reported outcome.
    pub result_code: ResultCode,
    /// Full decoded response document.
    pub document: Value,
}

impl Response {
    /// Extracts a typed value from the response document.
    ///
    /// # Errors
    ///
    /// Returns [`AlthermaError::PathNotFound`] or
    /// [`AlthermaError::TypeMismatch`] if `path` does not hold a `T`.
    pub fn value<T: FromJsonLeaf>(&self, path: &str) -> Result<T, AlthermaError> {
        extract(&self.document, path)
    }
}

/// One adapter connection with at most one request in flight.
#[derive(Debug)]
pub struct Connection<T> {
    transport: Option<T>,
    /// Set while a request awaits its response. Left set if the awaiting
    /// future is dropped, since the late response would desynchronize
    /// the stream.
    in_flight: Option<CorrelationId>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            transport: None,
            in_flight: None,
        }
    }
}

impl<T: Transport> Connection<T> {
    /// Creates a disconnected connection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a connection around an already-open transport.
    #[must_use]
    pub const fn from_transport(transport: T) -> Self {
        Self {
            transport: Some(transport),
            in_flight: None,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        if self.transport.is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    /// Returns the id of the request awaiting a response, if any.
    #[must_use]
    pub const fn in_flight(&self) -> Option<&CorrelationId> {
        self.in_flight.as_ref()
    }

    /// Opens a transport to `endpoint`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns the transport's error if the handshake fails; the
    /// connection is then left disconnected.
    pub async fn open(&mut self, endpoint: &Endpoint) -> Result<(), AlthermaError> {
        self.transport = None;
        self.in_flight = None;

        let url = endpoint.url();
        let transport = T::open(&url).await?;
        self.transport = Some(transport);
        tracing::info!(
            host = %endpoint.host(),
            port = ?endpoint.port(),
            %url,
            "connected to adapter"
        );
        Ok(())
    }

    /// Closes the transport. Closing a disconnected connection is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the transport's error if the closing handshake fails. The
    /// connection is disconnected either way.
    pub async fn close(&mut self) -> Result<(), AlthermaError> {
        self.in_flight = None;
        let Some(mut transport) = self.transport.take() else {
            return Ok(());
        };
        tracing::info!("closing adapter connection");
        transport.close().await
    }

    /// Sends one request for `resource` and returns the matching response.
    ///
    /// With `content` the request creates a new content instance,
    /// otherwise it retrieves the resource. The caller decides what a
    /// non-success [`ResultCode`] means.
    ///
    /// # Errors
    ///
    /// - [`AlthermaError::NotConnected`] without an open transport.
    /// - [`AlthermaError::RequestAlreadyInFlight`] if an earlier call was
    ///   abandoned before its response arrived.
    /// - [`AlthermaError::CorrelationMismatch`] or
    ///   [`AlthermaError::IdentityMismatch`] if the response does not
    ///   belong to this request.
    /// - Any transport, reassembly, or decoding error. If the adapter closed
    ///   the socket or the transport failed, the connection is left
    ///   [`ConnectionState::Disconnected`].
    pub async fn call(
        &mut self,
        resource: &Resource,
        content: Option<ContentInstance>,
    ) -> Result<Response, AlthermaError> {
        let Some(transport) = self.transport.as_mut() else {
            return Err(AlthermaError::NotConnected);
        };
        if let Some(pending) = &self.in_flight {
            return Err(AlthermaError::RequestAlreadyInFlight(pending.clone()));
        }

        let correlation_id = CorrelationId::generate();
        let request =
            RequestEnvelope::new(correlation_id.clone(), CLIENT_IDENTITY, resource, content);
        let text = request.encode()?;

        self.in_flight = Some(correlation_id.clone());
        tracing::debug!(
            %correlation_id,
            target = request.target(),
            op = request.operation().code(),
            "sending request"
        );
        let result = exchange(transport, &correlation_id, text).await;
        self.in_flight = None;

        match &result {
            Ok(response) => tracing::debug!(
                %correlation_id,
                result_code = %response.result_code,
                "response received"
            ),
            Err(e) if ends_connection(e) => {
                tracing::warn!(%correlation_id, error = %e, "adapter connection lost");
                self.transport = None;
            }
            Err(_) => {}
        }
        result
    }
}

/// Errors after which the transport cannot carry another request.
const fn ends_connection(error: &AlthermaError) -> bool {
    matches!(
        error,
        AlthermaError::UnexpectedCloseStatus(_)
            | AlthermaError::UnexpectedMessageType(MessageKind::Close)
            | AlthermaError::ConnectionClosed
            | AlthermaError::Transport(_)
    )
}

async fn exchange<T: Transport>(
    transport: &mut T,
    correlation_id: &CorrelationId,
    request: String,
) -> Result<Response, AlthermaError> {
    transport.send_text(request).await?;
    let message = read_message(transport).await?;
    let document = decode(&message)?;

    let received: String = extract(&document, RESPONSE_ID_PATH)?;
    if *correlation_id != *received.as_str() {
        return Err(AlthermaError::CorrelationMismatch {
            expected: correlation_id.clone(),
            received,
        });
    }

    let to: String = extract(&document, RESPONSE_TO_PATH)?;
    if to != CLIENT_IDENTITY {
        return Err(AlthermaError::IdentityMismatch {
            expected: CLIENT_IDENTITY,
            received: to,
        });
    }

    let result_code = ResultCode::new(extract(&document, RESPONSE_CODE_PATH)?);

    Ok(Response {
        correlation_id: correlation_id.clone(),
        result_code,
        document,
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::ws::frame::Frame;
    use crate::ws::mock::{ScriptedTransport, cin, reply, request_id};

    fn answering(result_code: i64, content: Value) -> ScriptedTransport {
        ScriptedTransport::new(move |request| {
            vec![Frame::text(
                reply(request, result_code, Some(content.clone())).to_string(),
                true,
            )]
        })
    }

    #[tokio::test]
    async fn call_without_transport_is_not_connected() {
        let mut connection = Connection::<ScriptedTransport>::new();
        assert_eq!(connection.state(), ConnectionState::Disconnected);
        assert!(matches!(
            connection.call(&Resource::POWER, None).await,
            Err(AlthermaError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn echoed_id_is_accepted() {
        let transport = answering(2000, cin(json!("on")));
        let sent = transport.sent_log();
        let mut connection = Connection::from_transport(transport);

        let response = assert_ok!(connection.call(&Resource::POWER, None).await);
        assert_eq!(response.result_code, ResultCode::OK);
        assert!(matches!(
            response.value::<String>("/m2m:rsp/pc/m2m:cin/con").as_deref(),
            Ok("on")
        ));

        let Ok(sent) = sent.lock() else {
            panic!("sent log poisoned");
        };
        let Some(request) = sent.first() else {
            panic!("nothing sent");
        };
        assert!(response.correlation_id == *request_id(request));
        assert_eq!(connection.in_flight(), None);
    }

    #[tokio::test]
    async fn each_call_uses_a_fresh_id() {
        let transport = answering(2000, cin(json!(1)));
        let sent = transport.sent_log();
        let mut connection = Connection::from_transport(transport);

        assert_ok!(connection.call(&Resource::ERROR_STATE, None).await);
        assert_ok!(connection.call(&Resource::ERROR_STATE, None).await);

        let Ok(sent) = sent.lock() else {
            panic!("sent log poisoned");
        };
        let ids: Vec<&str> = sent.iter().map(request_id).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids.first(), ids.get(1));
    }

    #[tokio::test]
    async fn foreign_id_is_rejected() {
        let transport = ScriptedTransport::new(|request| {
            let mut response = reply(request, 2000, Some(cin(json!("on"))));
            if let Some(rsp) = response.get_mut("m2m:rsp").and_then(Value::as_object_mut) {
                rsp.insert("rqi".to_string(), json!("zzzzz"));
            }
            vec![Frame::text(response.to_string(), true)]
        });
        let mut connection = Connection::from_transport(transport);

        let Err(AlthermaError::CorrelationMismatch { received, .. }) =
            connection.call(&Resource::POWER, None).await
        else {
            panic!("expected CorrelationMismatch");
        };
        assert_eq!(received, "zzzzz");
        assert_eq!(connection.in_flight(), None);
    }

    #[tokio::test]
    async fn foreign_destination_is_rejected() {
        let transport = ScriptedTransport::new(|request| {
            let mut response = reply(request, 2000, None);
            if let Some(rsp) = response.get_mut("m2m:rsp").and_then(Value::as_object_mut) {
                rsp.insert("to".to_string(), json!("someone-else"));
            }
            vec![Frame::text(response.to_string(), true)]
        });
        let mut connection = Connection::from_transport(transport);

        assert!(matches!(
            connection.call(&Resource::POWER, None).await,
            Err(AlthermaError::IdentityMismatch { received, .. }) if received == "someone-else"
        ));
    }

    #[tokio::test]
    async fn fragmented_response_is_reassembled() {
        let transport = ScriptedTransport::new(|request| {
            let text = reply(request, 2000, Some(cin(json!(21.5)))).to_string();
            let bytes = text.into_bytes();
            let chunks: Vec<Vec<u8>> = bytes.chunks(7).map(<[u8]>::to_vec).collect();
            let last = chunks.len().saturating_sub(1);
            chunks
                .into_iter()
                .enumerate()
                .map(|(i, chunk)| Frame::text(chunk, i == last))
                .collect()
        });
        let mut connection = Connection::from_transport(transport);

        let response = assert_ok!(connection.call(&Resource::INDOOR_TEMPERATURE, None).await);
        assert!(matches!(
            response.value::<f64>("/m2m:rsp/pc/m2m:cin/con"),
            Ok(v) if (v - 21.5).abs() < f64::EPSILON
        ));
    }

    #[tokio::test]
    async fn non_success_code_is_returned_not_raised() {
        let mut connection = Connection::from_transport(answering(4004, json!({})));
        let response = assert_ok!(connection.call(&Resource::TARGET_TEMPERATURE, None).await);
        assert_eq!(response.result_code, ResultCode::new(4004));
    }

    #[tokio::test]
    async fn abandoned_call_blocks_the_connection() {
        let mut connection = Connection::from_transport(ScriptedTransport::silent());

        let timed_out = tokio::time::timeout(
            Duration::from_millis(20),
            connection.call(&Resource::POWER, None),
        )
        .await;
        assert_err!(timed_out);
        let Some(pending) = connection.in_flight().cloned() else {
            panic!("request should still be in flight");
        };

        let Err(AlthermaError::RequestAlreadyInFlight(id)) =
            connection.call(&Resource::POWER, None).await
        else {
            panic!("expected RequestAlreadyInFlight");
        };
        assert_eq!(id, pending);
    }

    #[tokio::test]
    async fn peer_close_disconnects() {
        let transport = ScriptedTransport::new(|_| vec![Frame::close(Some(1011))]);
        let sent = transport.sent_log();
        let mut connection = Connection::from_transport(transport);

        assert!(matches!(
            connection.call(&Resource::POWER, None).await,
            Err(AlthermaError::UnexpectedCloseStatus(1011))
        ));
        assert_eq!(connection.state(), ConnectionState::Disconnected);
        assert!(matches!(
            connection.call(&Resource::POWER, None).await,
            Err(AlthermaError::NotConnected)
        ));

        let Ok(sent) = sent.lock() else {
            panic!("sent log poisoned");
        };
        assert_eq!(sent.len(), 1);
    }

    #[tokio::test]
    async fn protocol_error_keeps_connection() {
        let transport = ScriptedTransport::new(|request| {
            let mut response = reply(request, 2000, None);
            if let Some(rsp) = response.get_mut("m2m:rsp").and_then(Value::as_object_mut) {
                rsp.insert("rqi".to_string(), json!("zzzzz"));
            }
            vec![Frame::text(response.to_string(), true)]
        });
        let mut connection = Connection::from_transport(transport);

        assert_err!(connection.call(&Resource::POWER, None).await);
        assert_eq!(connection.state(), ConnectionState::Connected);
    }

    #[tokio::test]
    async fn close_disconnects() {
        let transport = ScriptedTransport::silent();
        let closed = transport.closed_flag();
        let mut connection = Connection::from_transport(transport);
        assert_eq!(connection.state(), ConnectionState::Connected);

        assert_ok!(connection.close().await);
        assert_eq!(connection.state(), ConnectionState::Disconnected);
        assert!(closed.load(std::sync::atomic::Ordering::SeqCst));

        // second close is a no-op
        assert_ok!(connection.close().await);
    }

    #[tokio::test]
    async fn open_resets_abandoned_request() {
        let mut connection = Connection::from_transport(ScriptedTransport::silent());
        let _ = tokio::time::timeout(
            Duration::from_millis(10),
            connection.call(&Resource::POWER, None),
        )
        .await;
        assert!(connection.in_flight().is_some());

        let Ok(endpoint) = Endpoint::parse("daikinap") else {
            panic!("endpoint should parse");
        };
        assert_ok!(connection.open(&endpoint).await);
        assert_eq!(connection.in_flight(), None);
        assert_eq!(connection.state(), ConnectionState::Connected);
    }
}
