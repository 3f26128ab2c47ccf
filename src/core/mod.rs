pub mod error;
pub mod message;
pub mod queue;
pub mod queue_manager;
pub mod topics;
