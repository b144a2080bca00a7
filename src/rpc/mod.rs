//! Wire-level collaborators: the device session client and the tracker
//! client, plus the message types they share.

use std::io::{self, BufRead};

use serde::de::DeserializeOwned;
use thiserror::Error;

pub mod client;
pub mod proto;
pub mod tracker;

/// Failures raised while acquiring a session.
///
/// These propagate through the resolver unchanged; it has no special
/// knowledge of network or tracker failure causes.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// Hostname did not resolve to a usable address.
    #[error("cannot resolve address for {endpoint}: {source}")]
    Resolve {
        endpoint: String,
        #[source]
        source: io::Error,
    },

    /// TCP connection could not be established.
    #[error("connection to {endpoint} failed: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: io::Error,
    },

    /// Read or write on an established connection failed.
    #[error("i/o error on session with {endpoint}: {source}")]
    Io {
        endpoint: String,
        #[source]
        source: io::Error,
    },

    /// The peer refused the session during the handshake.
    #[error("{endpoint} rejected the session: {reason}")]
    Rejected { endpoint: String, reason: String },

    /// The peer answered with something the protocol does not allow here.
    #[error("unexpected reply from {endpoint}: {detail}")]
    Protocol { endpoint: String, detail: String },

    /// The tracker refused to lease the requested device class.
    #[error("tracker at {endpoint} denied the lease for '{device}': {reason}")]
    LeaseDenied {
        endpoint: String,
        device: String,
        reason: String,
    },

    /// No device of the requested class freed up within the lease timeout.
    #[error("tracker at {endpoint} did not free a '{device}' within {timeout_secs}s")]
    LeaseTimeout {
        endpoint: String,
        device: String,
        timeout_secs: u64,
    },

    /// No simulator backend for this target in this build (enable the `sim`
    /// feature).
    #[error("no simulator backend for this target in this build (enable the `sim` feature)")]
    SimulatorMissing,
}

/// Reads one reply from `reader`, mapping transport and decode failures.
pub(crate) fn recv<T: DeserializeOwned>(
    reader: &mut impl BufRead,
    endpoint: &str,
) -> Result<T, AcquireError> {
    match proto::read_msg(reader) {
        Ok(Some(msg)) => Ok(msg),
        Ok(None) => Err(AcquireError::Protocol {
            endpoint: endpoint.to_string(),
            detail: "peer closed the connection".to_string(),
        }),
        Err(e) if e.kind() == io::ErrorKind::InvalidData => Err(AcquireError::Protocol {
            endpoint: endpoint.to_string(),
            detail: e.to_string(),
        }),
        Err(e) => Err(AcquireError::Io {
            endpoint: endpoint.to_string(),
            source: e,
        }),
    }
}
