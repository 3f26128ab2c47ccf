use tracing::debug;

use crate::core::topics::TopicName;

/// [`SubscriptionRegistry`] is the set of topics the device wants to receive.
///
/// Topics are kept in first-insertion order with no duplicates. Storage is
/// trimmed to the live count after every change; subscription lists on this
/// class of device are a handful of entries, so linear scans are fine.
#[derive(Debug, Default, Clone)]
pub struct SubscriptionRegistry {
    topics: Vec<TopicName>,
}

impl SubscriptionRegistry {
    /// Creates a new empty [`SubscriptionRegistry`].
    pub fn new() -> Self {
        Self { topics: Vec::new() }
    }

    /// Subscribes to `topic`. Returns `false` if it was already present.
    pub fn add(&mut self, topic: &str) -> bool {
        if self.contains(topic) {
            return false;
        }

        self.topics.reserve_exact(1);
        self.topics.push(topic.to_owned());
        debug!(target: "thermoq::topics", topic, count = self.topics.len(), "subscribed");
        true
    }

    /// Unsubscribes from `topic`. Returns `false` if it was not present.
    pub fn remove(&mut self, topic: &str) -> bool {
        let Some(index) = self.topics.iter().position(|t| t == topic) else {
            return false;
        };

        self.topics.remove(index);
        self.topics.shrink_to_fit();
        debug!(target: "thermoq::topics", topic, count = self.topics.len(), "unsubscribed");
        true
    }

    /// Exact-match membership test.
    pub fn contains(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Returns the count and an owned copy of every subscribed topic.
    ///
    /// The copy stays valid across later `add`/`remove` calls.
    pub fn list(&self) -> (usize, Vec<TopicName>) {
        (self.topics.len(), self.topics.clone())
    }

    #[cfg(test)]
    fn storage_capacity(&self) -> usize {
        self.topics.capacity()
    }
}
