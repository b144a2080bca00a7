use std::fmt;

use serde::Serialize;

/// Network address of a collaborator service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Environment parameters resolved once per resolution attempt.
///
/// Assembled at the boundary (see [`HarnessConfig::from_env`]) and passed
/// into the resolver by reference, so the decision procedure never reads the
/// process environment itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Loopback port of a manually launched simulator process, if any.
    pub local_sim_port: Option<u16>,
    /// Shared device-pool tracker; preferred for board targets.
    pub tracker: Option<Endpoint>,
    /// Directly-owned board; used when no tracker is configured.
    pub device: Option<Endpoint>,
}
