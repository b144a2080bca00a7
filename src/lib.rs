//! Session resolution for hardware test targets.
//!
//! Test code asks for a session to a target (`sim`, `tsim`, `pynq`) and gets
//! back a live handle without caring where the device lives: an in-process
//! simulator, a manually launched simulator process on loopback, a board
//! leased from a shared tracker, or a directly-addressed board. [`resolve`]
//! walks a fixed priority order of acquisition strategies for the target
//! class and executes exactly one.
//!
//! ```no_run
//! use testrig::{resolve, HarnessConfig, Target, WireProvider};
//!
//! let config = HarnessConfig::from_env()?;
//! resolve(Target::Sim, &config, &WireProvider, |target, session| {
//!     println!("{target}: session to {}", session.peer());
//! })?;
//! # Ok::<(), testrig::ResolveError>(())
//! ```

pub mod config;
pub mod error;
pub mod resolver;
pub mod rpc;
pub mod session;
pub mod sim;
pub mod target;

pub use config::{Endpoint, HarnessConfig};
pub use error::ResolveError;
pub use resolver::{
    resolve, select_strategy, SessionProvider, Strategy, WireProvider, POOL_LEASE_TIMEOUT,
};
pub use rpc::AcquireError;
pub use session::Session;
pub use target::Target;
