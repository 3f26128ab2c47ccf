//! thermoq – message core for an evaporative-cooler thermostat.
//!
//! This crate exports
//!  * `core`      – message, growable queue, subscription registry, queue manager
//!  * `device`    – topic schema, set-point override, sensor → queue glue
//!  * `transport` – the seam to whatever moves messages off the device
//!  * `runtime`   – host-side cooperative main loop
//!  * `config`    – TOML-driven runtime configuration
//!
//! Sensor drivers, clock sync and the network itself live outside; they only
//! hand topic/payload strings in and take messages out.

// ───────────────────────────────────────────────────────────
// Public modules
// ───────────────────────────────────────────────────────────
pub mod config;
pub mod core;
pub mod device;
pub mod logging;
pub mod metrics;
pub mod runtime;
pub mod transport;

// ───────────────────────────────────────────────────────────
// Re-exports
// ───────────────────────────────────────────────────────────
pub use crate::config::{load_config, Config};
pub use crate::core::error::ThermoError;
pub use crate::core::message::Message;
pub use crate::core::queue_manager::{QueueManager, SharedQueueManager};
pub use crate::runtime::{run_simulation, run_simulation_until};
