//! In-process simulator backend.
//!
//! Compiled in behind the `sim` cargo feature (part of the default set), so
//! hardware-only deployments can build without it. Builds without the
//! feature still resolve loopback and physical-device targets; opening a
//! local session then fails with [`AcquireError::SimulatorMissing`].

use crate::rpc::AcquireError;
use crate::session::Session;
use crate::target::Target;

/// Whether the simulator backend was compiled into this build.
pub fn available() -> bool {
    cfg!(feature = "sim")
}

/// Opens an in-process session for a simulation-class target.
#[cfg(feature = "sim")]
pub fn open(target: Target) -> Result<Session, AcquireError> {
    let mode = match target {
        Target::Sim => SimMode::Behavioral,
        Target::Tsim => SimMode::CycleAccurate,
        Target::Pynq => return Err(AcquireError::SimulatorMissing),
    };
    tracing::debug!(%target, "opening in-process simulator session");
    Ok(Session::local(Simulator::new(mode)))
}

#[cfg(not(feature = "sim"))]
pub fn open(_target: Target) -> Result<Session, AcquireError> {
    Err(AcquireError::SimulatorMissing)
}

/// Execution flavor of the software model.
#[cfg(feature = "sim")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimMode {
    /// Functional model; one cycle per request.
    Behavioral,
    /// Cycle-level model; charges the modeled pipeline depth per request.
    CycleAccurate,
}

#[cfg(feature = "sim")]
const PIPELINE_DEPTH_CYCLES: u64 = 8;

/// A private software model instance backing one local session.
#[cfg(feature = "sim")]
#[derive(Debug)]
pub struct Simulator {
    mode: SimMode,
    cycles: u64,
}

#[cfg(feature = "sim")]
impl Simulator {
    fn new(mode: SimMode) -> Self {
        Self { mode, cycles: 0 }
    }

    /// Processes one request, returning its sequence number as the ack.
    pub(crate) fn process(&mut self, seq: u32) -> u32 {
        self.cycles += match self.mode {
            SimMode::Behavioral => 1,
            SimMode::CycleAccurate => PIPELINE_DEPTH_CYCLES,
        };
        seq
    }

    /// Cycles consumed so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub(crate) fn describe(&self) -> String {
        match self.mode {
            SimMode::Behavioral => "sim://behavioral",
            SimMode::CycleAccurate => "sim://cycle-accurate",
        }
        .to_string()
    }
}
