//! Client-to-server and server-to-client control frames.
//!
//! Event delivery uses [`EventPayload`](crate::dispatch::event::EventPayload)
//! frames; these types cover the small control protocol around them.

use serde::{Deserialize, Serialize};

/// Control frames sent by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundFrame {
    /// Keepalive probe.
    Ping {
        /// Client timestamp, echoed back.
        timestamp: i64,
    },
}

/// Control frames sent by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundFrame {
    /// Keepalive response.
    Pong {
        /// Echoed client timestamp.
        timestamp: i64,
    },
    /// Protocol error report.
    Error {
        /// Machine-readable error code.
        code: String,
        /// Human-readable description.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_roundtrip() {
        let frame: InboundFrame =
            serde_json::from_str(r#"{"type":"ping","timestamp":42}"#).expect("parse");
        let InboundFrame::Ping { timestamp } = frame;
        assert_eq!(timestamp, 42);
    }
}
