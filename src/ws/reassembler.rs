//! Reassembly of fragmented WebSocket messages.

use std::future::Future;

use super::frame::{Frame, MessageKind, NORMAL_CLOSURE};
use crate::error::AlthermaError;

/// Anything that yields WebSocket frames one read at a time.
pub trait FrameSource {
    /// Reads the next frame. `Ok(None)` means the stream has ended.
    ///
    /// # Errors
    ///
    /// Returns [`AlthermaError::Transport`] if the read fails.
    fn next_frame(&mut self) -> impl Future<Output = Result<Option<Frame>, AlthermaError>> + Send;
}

/// Reads frames until a final fragment arrives and returns the
/// concatenated payload.
///
/// # Errors
///
/// - [`AlthermaError::UnexpectedCloseStatus`] if a close frame with a
///   status other than normal closure arrives.
/// - [`AlthermaError::UnexpectedMessageType`] if the completed message is
///   not text (a normal close included).
/// - [`AlthermaError::ConnectionClosed`] if the stream ends first.
/// - Any error the source itself reports.
pub async fn read_message<S: FrameSource>(source: &mut S) -> Result<Vec<u8>, AlthermaError> {
    let mut buffer = Vec::new();
    loop {
        let frame = source
            .next_frame()
            .await?
            .ok_or(AlthermaError::ConnectionClosed)?;

        if let Some(status) = frame.close_status
            && status != NORMAL_CLOSURE
        {
            return Err(AlthermaError::UnexpectedCloseStatus(status));
        }

        buffer.extend_from_slice(&frame.payload);

        if frame.fin {
            if frame.kind != MessageKind::Text {
                return Err(AlthermaError::UnexpectedMessageType(frame.kind));
            }
            tracing::trace!(bytes = buffer.len(), "message reassembled");
            return Ok(buffer);
        }
    }
}
