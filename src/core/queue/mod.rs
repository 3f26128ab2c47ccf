//! Thermoq queue module.
//!
//! Holds the device's single outbound/inbound message buffer. The buffer is
//! a ring that doubles when it would otherwise overwrite unread messages, so
//! enqueue never fails and never drops.

pub mod ring;

pub use ring::{MessageQueue, DEFAULT_CAPACITY};
