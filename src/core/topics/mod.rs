//! Topic module containing the subscription registry.

pub mod registry;

pub use registry::SubscriptionRegistry;

/// Alias for a topic name.
pub type TopicName = String;
