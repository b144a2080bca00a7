//! Blocking wire client for device sessions.

use std::io::BufReader;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use uuid::Uuid;

use crate::rpc::proto::{self, ClientMsg, ServerMsg};
use crate::rpc::{recv, AcquireError};
use crate::session::Session;

/// Timeout for establishing the TCP connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Read/write timeout on an established session.
pub const IO_TIMEOUT: Duration = Duration::from_secs(30);

/// Connects to a device server and performs the opening handshake.
pub fn connect(host: &str, port: u16) -> Result<Session, AcquireError> {
    connect_keyed(host, port, None)
}

/// Like [`connect`], presenting a tracker-issued lease key.
pub(crate) fn connect_keyed(
    host: &str,
    port: u16,
    key: Option<&str>,
) -> Result<Session, AcquireError> {
    let endpoint = format!("{host}:{port}");
    let addr = resolve_addr(&endpoint)?;

    let stream =
        TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT).map_err(|e| AcquireError::Connect {
            endpoint: endpoint.clone(),
            source: e,
        })?;
    configure_stream(&stream, &endpoint, IO_TIMEOUT)?;

    let client = Uuid::new_v4().to_string();
    tracing::debug!(%endpoint, client = %client, "opening device session");

    let mut writer = stream.try_clone().map_err(|e| AcquireError::Io {
        endpoint: endpoint.clone(),
        source: e,
    })?;
    let mut reader = BufReader::new(stream);

    let hello = ClientMsg::Hello {
        client,
        key: key.map(str::to_string),
    };
    proto::write_msg(&mut writer, &hello).map_err(|e| AcquireError::Io {
        endpoint: endpoint.clone(),
        source: e,
    })?;

    match recv::<ServerMsg>(&mut reader, &endpoint)? {
        ServerMsg::Welcome { device } => {
            tracing::info!(%endpoint, device = %device, "device session established");
            Ok(Session::remote(reader, writer, endpoint))
        }
        ServerMsg::Rejected { reason } => Err(AcquireError::Rejected { endpoint, reason }),
        other => Err(AcquireError::Protocol {
            endpoint,
            detail: format!("expected welcome, got {other:?}"),
        }),
    }
}

pub(crate) fn resolve_addr(endpoint: &str) -> Result<SocketAddr, AcquireError> {
    endpoint
        .to_socket_addrs()
        .map_err(|e| AcquireError::Resolve {
            endpoint: endpoint.to_string(),
            source: e,
        })?
        .next()
        .ok_or_else(|| AcquireError::Resolve {
            endpoint: endpoint.to_string(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "name resolved to no addresses",
            ),
        })
}

pub(crate) fn configure_stream(
    stream: &TcpStream,
    endpoint: &str,
    read_timeout: Duration,
) -> Result<(), AcquireError> {
    stream
        .set_read_timeout(Some(read_timeout))
        .and_then(|()| stream.set_write_timeout(Some(IO_TIMEOUT)))
        .map_err(|e| AcquireError::Io {
            endpoint: endpoint.to_string(),
            source: e,
        })
}
