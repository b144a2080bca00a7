//! Failure taxonomy for session resolution.
//!
//! Two levels: configuration errors are detected before any network call and
//! carry remediation text naming the exact variables or build steps to fix;
//! acquisition errors come from the underlying connect/lease calls and pass
//! through verbatim, since the resolver has no special knowledge of their
//! causes.

use thiserror::Error;

use crate::rpc::AcquireError;

/// Errors surfaced by [`resolve`](crate::resolver::resolve) and by
/// configuration assembly.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A target string from the CLI or config file is not in the closed set.
    #[error("unknown target '{name}' (expected one of: sim, tsim, pynq)")]
    UnknownTarget { name: String },

    /// An environment variable is set but cannot be parsed.
    #[error("environment variable {name} has invalid value '{value}': {reason}")]
    InvalidVariable {
        name: String,
        value: String,
        reason: String,
    },

    /// The in-process simulator backend is required but not compiled in.
    #[error(
        "simulator backend unavailable for the 'sim' target; \
         rebuild with the `sim` feature enabled (cargo build --features sim)"
    )]
    SimulatorUnavailable,

    /// Neither acquisition path for a physical board is configured.
    #[error(
        "no fpga-board endpoint configured; set TVM_TRACKER_HOST and \
         TVM_TRACKER_PORT to lease a board from a tracker, or \
         VTA_PYNQ_RPC_HOST and VTA_PYNQ_RPC_PORT to reach one directly"
    )]
    DeviceNotConfigured,

    /// The selected strategy's connect or lease call failed. Propagated
    /// unchanged, never rewritten.
    #[error(transparent)]
    Acquire(#[from] AcquireError),
}
