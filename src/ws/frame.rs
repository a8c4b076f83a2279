//! Single WebSocket read result.

use std::fmt;

/// Close status meaning "normal closure".
pub const NORMAL_CLOSURE: u16 = 1000;

/// Type of the message a frame belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// UTF-8 text message.
    Text,
    /// Binary message.
    Binary,
    /// Close handshake.
    Close,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Binary => "binary",
            Self::Close => "close",
        })
    }
}

/// One fragment of a WebSocket message.
///
/// Every fragment carries the kind of the message it belongs to, so the
/// final fragment alone tells the type of the assembled message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Payload bytes of this fragment.
    pub payload: Vec<u8>,
    /// `true` on the last fragment of a message.
    pub fin: bool,
    /// Kind of the message this fragment belongs to.
    pub kind: MessageKind,
    /// Close status, present only on close frames that carried one.
    pub close_status: Option<u16>,
}

impl Frame {
    /// A text fragment.
    #[must_use]
    pub fn text(payload: impl Into<Vec<u8>>, fin: bool) -> Self {
        Self {
            payload: payload.into(),
            fin,
            kind: MessageKind::Text,
            close_status: None,
        }
    }

    /// A complete binary message.
    #[must_use]
    pub fn binary(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            fin: true,
            kind: MessageKind::Binary,
            close_status: None,
        }
    }

    /// A close frame with an optional status.
    #[must_use]
    pub const fn close(status: Option<u16>) -> Self {
        Self {
            payload: Vec::new(),
            fin: true,
            kind: MessageKind::Close,
            close_status: status,
        }
    }
}
