use tungstenite::protocol::Message as WsMessage;

/// An opaque payload relayed by the hub.
///
/// Only data frames become messages. The framing (text or binary) is kept so
/// every recipient gets the frame exactly as the sender wrote it; the hub never
/// looks inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message(WsMessage);

impl Message {
    pub fn text(text: impl Into<String>) -> Self {
        Self(WsMessage::text(text.into()))
    }

    pub fn binary(data: impl Into<Vec<u8>>) -> Self {
        Self(WsMessage::binary(data.into()))
    }

    /// Wraps an inbound frame. Control frames (ping, pong, close, raw) yield `None`.
    pub fn from_frame(frame: WsMessage) -> Option<Self> {
        match frame {
            WsMessage::Text(_) | WsMessage::Binary(_) => Some(Self(frame)),
            _ => None,
        }
    }

    pub fn into_frame(self) -> WsMessage {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.0 {
            WsMessage::Text(text) => text.as_str().as_bytes(),
            WsMessage::Binary(data) => &data[..],
            _ => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}
