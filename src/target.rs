use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ResolveError;

/// Device class under test.
///
/// Targets form a closed set; anything else is rejected where the string
/// enters the system (CLI flag or config file), not inside the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Behavioral in-process simulation.
    Sim,
    /// Timing-accurate (cycle-level) simulation.
    Tsim,
    /// Physical FPGA board reached over the network.
    Pynq,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Sim => "sim",
            Target::Tsim => "tsim",
            Target::Pynq => "pynq",
        }
    }

    /// True for targets backed by a software model rather than hardware.
    pub fn is_simulation(&self) -> bool {
        matches!(self, Target::Sim | Target::Tsim)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sim" => Ok(Target::Sim),
            "tsim" => Ok(Target::Tsim),
            "pynq" => Ok(Target::Pynq),
            other => Err(ResolveError::UnknownTarget {
                name: other.to_string(),
            }),
        }
    }
}
