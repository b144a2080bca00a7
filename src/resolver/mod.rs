//! Acquisition strategy selection and session resolution.
//!
//! Given a target and the assembled configuration, exactly one acquisition
//! strategy is selected and executed. Candidates are mutually exclusive and
//! ordered by priority within each target class; there are no retries and
//! no fallbacks after an acquisition call has been made.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::config::HarnessConfig;
use crate::error::ResolveError;
use crate::rpc::AcquireError;
use crate::target::Target;

mod provider;

pub use provider::WireProvider;

/// How long a pooled-device lease may wait for a board to free up.
pub const POOL_LEASE_TIMEOUT: Duration = Duration::from_secs(10_000);

/// One way of acquiring a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    /// Attach to a manually launched simulator process over loopback.
    LoopbackSim { port: u16 },
    /// Open an in-process simulator session. `verify_backend` gates the
    /// fail-fast availability check; only the behavioral target performs it.
    InProcessSim { verify_backend: bool },
    /// Lease a board from the shared device-pool tracker.
    PooledDevice { host: String, port: u16 },
    /// Connect straight to a dedicated board.
    DirectDevice { host: String, port: u16 },
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::LoopbackSim { port } => {
                write!(f, "attach to local simulator at 127.0.0.1:{port}")
            }
            Strategy::InProcessSim {
                verify_backend: true,
            } => write!(f, "open an in-process simulator session (backend checked first)"),
            Strategy::InProcessSim {
                verify_backend: false,
            } => write!(f, "open an in-process simulator session"),
            Strategy::PooledDevice { host, port } => {
                write!(f, "lease a board from tracker {host}:{port}")
            }
            Strategy::DirectDevice { host, port } => {
                write!(f, "connect directly to board {host}:{port}")
            }
        }
    }
}

/// The acquisition operations the resolver consumes.
///
/// [`WireProvider`] is the production implementation; tests substitute
/// recording mocks.
pub trait SessionProvider {
    type Session;

    /// Connects to a device server at `host:port`.
    fn connect(&self, host: &str, port: u16) -> Result<Self::Session, AcquireError>;

    /// Opens an in-process session for a simulation-class target.
    fn open_local(&self, target: Target) -> Result<Self::Session, AcquireError>;

    /// Leases a device of the target's class from a tracker, waiting up to
    /// `timeout` for one to free up.
    fn lease_pooled(
        &self,
        target: Target,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<Self::Session, AcquireError>;

    /// Whether the in-process simulator backend is present.
    fn simulator_available(&self) -> bool;
}

/// Picks the acquisition strategy for `target` under `config`.
///
/// Pure on its inputs: no environment reads, no I/O, no precondition
/// probes. [`resolve`] performs the simulator availability check when the
/// selected strategy calls for it.
pub fn select_strategy(
    target: Target,
    config: &HarnessConfig,
) -> Result<Strategy, ResolveError> {
    match target {
        Target::Sim | Target::Tsim => {
            // An explicitly configured loopback port is developer intent and
            // is never silently bypassed.
            match config.local_sim_port {
                Some(port) if port != 0 => Ok(Strategy::LoopbackSim { port }),
                _ => Ok(Strategy::InProcessSim {
                    verify_backend: target == Target::Sim,
                }),
            }
        }
        Target::Pynq => {
            if let Some(tracker) = &config.tracker {
                Ok(Strategy::PooledDevice {
                    host: tracker.host.clone(),
                    port: tracker.port,
                })
            } else if let Some(device) = &config.device {
                Ok(Strategy::DirectDevice {
                    host: device.host.clone(),
                    port: device.port,
                })
            } else {
                Err(ResolveError::DeviceNotConfigured)
            }
        }
    }
}

/// Resolves a session for `target` and hands it to `run`.
///
/// Configuration problems surface as [`ResolveError`] before any network
/// activity; failures from the single acquisition call propagate unchanged.
pub fn resolve<P, F, R>(
    target: Target,
    config: &HarnessConfig,
    provider: &P,
    run: F,
) -> Result<R, ResolveError>
where
    P: SessionProvider,
    F: FnOnce(Target, P::Session) -> R,
{
    let strategy = select_strategy(target, config)?;
    tracing::debug!(%target, %strategy, "selected acquisition strategy");

    let session = match &strategy {
        Strategy::LoopbackSim { port } => {
            tracing::info!(port = *port, "attaching to local simulator over loopback");
            provider.connect("127.0.0.1", *port)?
        }
        Strategy::InProcessSim { verify_backend } => {
            if *verify_backend && !provider.simulator_available() {
                return Err(ResolveError::SimulatorUnavailable);
            }
            provider.open_local(target)?
        }
        Strategy::PooledDevice { host, port } => {
            provider.lease_pooled(target, host, *port, POOL_LEASE_TIMEOUT)?
        }
        Strategy::DirectDevice { host, port } => provider.connect(host, *port)?,
    };

    Ok(run(target, session))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Endpoint;

    fn endpoint(host: &str, port: u16) -> Option<Endpoint> {
        Some(Endpoint {
            host: host.to_string(),
            port,
        })
    }

    #[test]
    fn explicit_loopback_port_wins_for_both_simulation_targets() {
        let config = HarnessConfig {
            local_sim_port: Some(9090),
            ..Default::default()
        };
        for target in [Target::Sim, Target::Tsim] {
            assert_eq!(
                select_strategy(target, &config).unwrap(),
                Strategy::LoopbackSim { port: 9090 }
            );
        }
    }

    #[test]
    fn zero_loopback_port_falls_through_to_in_process() {
        let config = HarnessConfig {
            local_sim_port: Some(0),
            ..Default::default()
        };
        assert_eq!(
            select_strategy(Target::Sim, &config).unwrap(),
            Strategy::InProcessSim {
                verify_backend: true
            }
        );
    }

    #[test]
    fn only_behavioral_sim_verifies_the_backend() {
        let config = HarnessConfig::default();
        assert_eq!(
            select_strategy(Target::Sim, &config).unwrap(),
            Strategy::InProcessSim {
                verify_backend: true
            }
        );
        assert_eq!(
            select_strategy(Target::Tsim, &config).unwrap(),
            Strategy::InProcessSim {
                verify_backend: false
            }
        );
    }

    #[test]
    fn tracker_outranks_direct_device() {
        let config = HarnessConfig {
            tracker: endpoint("tracker.local", 9190),
            device: endpoint("192.168.2.99", 9091),
            ..Default::default()
        };
        assert_eq!(
            select_strategy(Target::Pynq, &config).unwrap(),
            Strategy::PooledDevice {
                host: "tracker.local".to_string(),
                port: 9190
            }
        );
    }

    #[test]
    fn direct_device_used_without_tracker() {
        let config = HarnessConfig {
            device: endpoint("192.168.2.99", 9091),
            ..Default::default()
        };
        assert_eq!(
            select_strategy(Target::Pynq, &config).unwrap(),
            Strategy::DirectDevice {
                host: "192.168.2.99".to_string(),
                port: 9091
            }
        );
    }

    #[test]
    fn board_without_endpoints_is_a_config_error() {
        let err = select_strategy(Target::Pynq, &HarnessConfig::default()).unwrap_err();
        assert!(matches!(err, ResolveError::DeviceNotConfigured));
        // Remediation names both variable pairs.
        let text = err.to_string();
        assert!(text.contains("TVM_TRACKER_HOST"));
        assert!(text.contains("TVM_TRACKER_PORT"));
        assert!(text.contains("VTA_PYNQ_RPC_HOST"));
        assert!(text.contains("VTA_PYNQ_RPC_PORT"));
    }

    #[test]
    fn loopback_port_ignores_device_pool_settings() {
        let config = HarnessConfig {
            local_sim_port: Some(9090),
            tracker: endpoint("tracker.local", 9190),
            device: endpoint("192.168.2.99", 9091),
        };
        assert_eq!(
            select_strategy(Target::Tsim, &config).unwrap(),
            Strategy::LoopbackSim { port: 9090 }
        );
    }
}
