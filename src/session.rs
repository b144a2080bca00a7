//! Opaque session handles.

use std::io::BufReader;
use std::net::TcpStream;

use crate::rpc::proto::{self, ClientMsg, ServerMsg};
use crate::rpc::{recv, AcquireError};
#[cfg(feature = "sim")]
use crate::sim::Simulator;

/// Live handle to a compute endpoint capable of executing test workloads.
///
/// Owned by the caller for the duration of a test and closed on drop. The
/// resolver never pools or reuses sessions; two resolutions with identical
/// configuration yield independent handles.
pub struct Session {
    transport: Transport,
    peer: String,
    seq: u32,
}

enum Transport {
    Remote {
        reader: BufReader<TcpStream>,
        writer: TcpStream,
    },
    #[cfg(feature = "sim")]
    Local(Simulator),
}

impl Session {
    pub(crate) fn remote(reader: BufReader<TcpStream>, writer: TcpStream, peer: String) -> Self {
        Self {
            transport: Transport::Remote { reader, writer },
            peer,
            seq: 0,
        }
    }

    #[cfg(feature = "sim")]
    pub(crate) fn local(sim: Simulator) -> Self {
        let peer = sim.describe();
        Self {
            transport: Transport::Local(sim),
            peer,
            seq: 0,
        }
    }

    /// Endpoint description, e.g. `192.168.2.99:9091` or `sim://behavioral`.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Round-trips a sequence number to verify the endpoint is alive.
    pub fn ping(&mut self) -> Result<(), AcquireError> {
        self.seq = self.seq.wrapping_add(1);
        let seq = self.seq;

        match &mut self.transport {
            Transport::Remote { reader, writer } => {
                proto::write_msg(writer, &ClientMsg::Ping { seq }).map_err(|e| {
                    AcquireError::Io {
                        endpoint: self.peer.clone(),
                        source: e,
                    }
                })?;
                match recv::<ServerMsg>(reader, &self.peer)? {
                    ServerMsg::Pong { seq: answered } if answered == seq => Ok(()),
                    ServerMsg::Pong { seq: answered } => Err(AcquireError::Protocol {
                        endpoint: self.peer.clone(),
                        detail: format!("pong for seq {answered}, expected {seq}"),
                    }),
                    other => Err(AcquireError::Protocol {
                        endpoint: self.peer.clone(),
                        detail: format!("expected pong, got {other:?}"),
                    }),
                }
            }
            #[cfg(feature = "sim")]
            Transport::Local(sim) => {
                if sim.process(seq) == seq {
                    Ok(())
                } else {
                    Err(AcquireError::Protocol {
                        endpoint: self.peer.clone(),
                        detail: "simulator acked the wrong sequence number".to_string(),
                    })
                }
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        tracing::debug!(peer = %self.peer, "closing session");
    }
}
