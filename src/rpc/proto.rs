//! Newline-delimited JSON messages spoken on device and tracker sockets.

use std::io::{self, BufRead, Write};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Messages a client sends on a device session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientMsg {
    /// Opening handshake. `key` carries the one-shot lease key when the
    /// connection was brokered by a tracker.
    Hello {
        client: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },
    /// Liveness probe.
    Ping { seq: u32 },
}

/// Messages a device server sends back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerMsg {
    /// Handshake accepted; `device` names the served device class.
    Welcome { device: String },
    /// Answer to a [`ClientMsg::Ping`] with the same sequence number.
    Pong { seq: u32 },
    /// Handshake refused.
    Rejected { reason: String },
}

/// Requests a client sends to a tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerRequest {
    /// Ask for a device of class `device`. The tracker may hold the reply
    /// until one frees up, at most `timeout_secs`.
    Lease {
        device: String,
        timeout_secs: u64,
        client: String,
    },
}

/// Replies a tracker sends back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerReply {
    /// A device was allocated; connect to `host:port` presenting `key`.
    Grant {
        host: String,
        port: u16,
        key: String,
    },
    /// The lease was refused.
    Deny { reason: String },
}

/// Writes one message as a JSON line and flushes.
pub fn write_msg<T: Serialize>(writer: &mut impl Write, msg: &T) -> io::Result<()> {
    let mut line = serde_json::to_string(msg)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    line.push('\n');
    writer.write_all(line.as_bytes())?;
    writer.flush()
}

/// Reads one JSON line. `Ok(None)` means the peer closed the connection;
/// malformed payloads surface as [`io::ErrorKind::InvalidData`].
pub fn read_msg<T: DeserializeOwned>(reader: &mut impl BufRead) -> io::Result<Option<T>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    serde_json::from_str(line.trim_end())
        .map(Some)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
