//! Environment variable assembly — all variable names in one place.

use crate::config::{Endpoint, HarnessConfig};
use crate::error::ResolveError;

/// Port of a manually launched local simulator; `0` or unset disables the
/// loopback path.
pub const LOCAL_SIM_PORT: &str = "VTA_LOCAL_SIM_RPC";
/// Host of the shared device-pool tracker.
pub const TRACKER_HOST: &str = "TVM_TRACKER_HOST";
/// Port of the shared device-pool tracker.
pub const TRACKER_PORT: &str = "TVM_TRACKER_PORT";
/// Host of a directly-owned board.
pub const DEVICE_HOST: &str = "VTA_PYNQ_RPC_HOST";
/// Port of a directly-owned board.
pub const DEVICE_PORT: &str = "VTA_PYNQ_RPC_PORT";

impl HarnessConfig {
    /// Assembles configuration from the process environment.
    pub fn from_env() -> Result<Self, ResolveError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Assembles configuration from an arbitrary variable lookup.
    ///
    /// Tests pass a closure over a map instead of mutating the process
    /// environment.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ResolveError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let local_sim_port = match parse_port(&lookup, LOCAL_SIM_PORT)? {
            Some(0) | None => None,
            some => some,
        };

        Ok(Self {
            local_sim_port,
            tracker: endpoint_pair(&lookup, TRACKER_HOST, TRACKER_PORT)?,
            device: endpoint_pair(&lookup, DEVICE_HOST, DEVICE_PORT)?,
        })
    }
}

fn parse_port<L>(lookup: &L, name: &str) -> Result<Option<u16>, ResolveError>
where
    L: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    match raw.trim().parse::<u16>() {
        Ok(port) => Ok(Some(port)),
        Err(e) => Err(ResolveError::InvalidVariable {
            name: name.to_string(),
            value: raw,
            reason: e.to_string(),
        }),
    }
}

/// A pair counts only when both halves are set; a half-set pair is logged
/// and treated as unset.
fn endpoint_pair<L>(
    lookup: &L,
    host_var: &str,
    port_var: &str,
) -> Result<Option<Endpoint>, ResolveError>
where
    L: Fn(&str) -> Option<String>,
{
    let host = lookup(host_var).filter(|h| !h.trim().is_empty());
    let port = parse_port(lookup, port_var)?;

    match (host, port) {
        (Some(host), Some(port)) => Ok(Some(Endpoint {
            host: host.trim().to_string(),
            port,
        })),
        (None, None) => Ok(None),
        _ => {
            tracing::warn!(
                host_var,
                port_var,
                "ignoring half-configured endpoint pair"
            );
            Ok(None)
        }
    }
}
