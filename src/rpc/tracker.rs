//! Client for the shared device-pool tracker.
//!
//! A lease request may legitimately sit unanswered for a long time while
//! the tracker waits for a board to free up, so the read timeout on the
//! tracker socket is the lease timeout itself, not the ordinary I/O
//! timeout.

use std::io::{self, BufReader};
use std::net::TcpStream;
use std::time::Duration;

use uuid::Uuid;

use crate::rpc::client::{configure_stream, connect_keyed, resolve_addr, CONNECT_TIMEOUT};
use crate::rpc::proto::{self, TrackerReply, TrackerRequest};
use crate::rpc::{recv, AcquireError};
use crate::session::Session;
use crate::target::Target;

/// Leases a device of the target's class from the tracker, then connects to
/// the granted board presenting the one-shot lease key.
pub fn lease(
    target: Target,
    host: &str,
    port: u16,
    timeout: Duration,
) -> Result<Session, AcquireError> {
    let endpoint = format!("{host}:{port}");
    let addr = resolve_addr(&endpoint)?;

    let stream =
        TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT).map_err(|e| AcquireError::Connect {
            endpoint: endpoint.clone(),
            source: e,
        })?;
    configure_stream(&stream, &endpoint, timeout)?;

    let client = Uuid::new_v4().to_string();
    tracing::info!(
        %endpoint,
        device = %target,
        timeout_secs = timeout.as_secs(),
        "requesting device lease"
    );

    let mut writer = stream.try_clone().map_err(|e| AcquireError::Io {
        endpoint: endpoint.clone(),
        source: e,
    })?;
    let mut reader = BufReader::new(stream);

    let request = TrackerRequest::Lease {
        device: target.to_string(),
        timeout_secs: timeout.as_secs(),
        client,
    };
    proto::write_msg(&mut writer, &request).map_err(|e| AcquireError::Io {
        endpoint: endpoint.clone(),
        source: e,
    })?;

    match recv::<TrackerReply>(&mut reader, &endpoint) {
        Ok(TrackerReply::Grant {
            host: device_host,
            port: device_port,
            key,
        }) => {
            tracing::info!(
                %endpoint,
                device = %target,
                board = %format!("{device_host}:{device_port}"),
                "lease granted"
            );
            connect_keyed(&device_host, device_port, Some(&key))
        }
        Ok(TrackerReply::Deny { reason }) => Err(AcquireError::LeaseDenied {
            endpoint,
            device: target.to_string(),
            reason,
        }),
        Err(AcquireError::Io { source, .. }) if is_timeout(&source) => {
            Err(AcquireError::LeaseTimeout {
                endpoint,
                device: target.to_string(),
                timeout_secs: timeout.as_secs(),
            })
        }
        Err(other) => Err(other),
    }
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}
