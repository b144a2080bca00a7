//! Harness configuration.
//!
//! Two sources: environment variables carrying endpoint overrides
//! (`env.rs`), and an optional TOML file supplying CLI defaults
//! (`loader.rs`). Environment variables always win.

mod env;
mod loader;
mod types;

pub use env::{DEVICE_HOST, DEVICE_PORT, LOCAL_SIM_PORT, TRACKER_HOST, TRACKER_PORT};
pub use loader::{ConfigFileError, FileConfig};
pub use types::{Endpoint, HarnessConfig};
