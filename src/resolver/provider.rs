use std::time::Duration;

use crate::rpc::{client, tracker, AcquireError};
use crate::session::Session;
use crate::sim;
use crate::target::Target;

use super::SessionProvider;

/// Production provider: loopback and direct connects plus tracker leases
/// over the wire protocol, local sessions from the in-process simulator.
///
/// Stateless; nothing is shared between resolutions.
#[derive(Debug, Default, Clone, Copy)]
pub struct WireProvider;

impl SessionProvider for WireProvider {
    type Session = Session;

    fn connect(&self, host: &str, port: u16) -> Result<Session, AcquireError> {
        client::connect(host, port)
    }

    fn open_local(&self, target: Target) -> Result<Session, AcquireError> {
        sim::open(target)
    }

    fn lease_pooled(
        &self,
        target: Target,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<Session, AcquireError> {
        tracker::lease(target, host, port, timeout)
    }

    fn simulator_available(&self) -> bool {
        sim::available()
    }
}
