//! QueueManager owns the device's message queue and its subscription list.
//!
//! The firmware loop is single-threaded, so [`QueueManager`] takes `&mut self`
//! and needs no locking. Hosts that share it across threads wrap it in
//! [`SharedQueueManager`], which holds one mutex around every operation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::core::message::Message;
use crate::core::queue::{MessageQueue, DEFAULT_CAPACITY};
use crate::core::topics::{SubscriptionRegistry, TopicName};
use crate::metrics;

#[derive(Debug, Default)]
pub struct QueueManager {
    queue: MessageQueue,
    subscriptions: SubscriptionRegistry,
}

impl QueueManager {
    /// Creates a manager whose queue starts with the default capacity.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            queue: MessageQueue::with_capacity(initial_capacity),
            subscriptions: SubscriptionRegistry::new(),
        }
    }

    /// Copies `topic` and `payload` onto the back of the queue.
    pub fn enqueue(&mut self, topic: &str, payload: &str) {
        if self.queue.enqueue(topic, payload) {
            metrics::inc_grown(1);
        }
        metrics::inc_enqueued(1);
        trace!(target: "thermoq::queue", topic, len = self.queue.len(), "enqueued");
    }

    /// Takes the oldest message, if any.
    pub fn dequeue(&mut self) -> Option<Message> {
        let message = self.queue.dequeue();
        if message.is_some() {
            metrics::inc_dequeued(1);
        }
        message
    }

    /// The oldest message, left in place.
    #[inline]
    pub fn peek(&self) -> Option<&Message> {
        self.queue.peek()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    pub fn add_subscription(&mut self, topic: &str) {
        self.subscriptions.add(topic);
    }

    pub fn remove_subscription(&mut self, topic: &str) {
        self.subscriptions.remove(topic);
    }

    /// Current subscription count and an owned snapshot of the topics.
    pub fn list_subscriptions(&self) -> (usize, Vec<TopicName>) {
        self.subscriptions.list()
    }

    #[inline]
    pub fn is_subscribed(&self, topic: &str) -> bool {
        self.subscriptions.contains(topic)
    }
}

/// Thread-safe handle to a [`QueueManager`].
///
/// Each method takes the lock once, so no caller ever observes a queue
/// halfway through a resize.
#[derive(Debug, Clone, Default)]
pub struct SharedQueueManager {
    inner: Arc<Mutex<QueueManager>>,
}

impl SharedQueueManager {
    pub fn new(manager: QueueManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    // Queue operations do not unwind mid-update; poisoning only comes from
    // a panicking `with` closure.
    fn lock(&self) -> MutexGuard<'_, QueueManager> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn enqueue(&self, topic: &str, payload: &str) {
        self.lock().enqueue(topic, payload);
    }

    pub fn dequeue(&self) -> Option<Message> {
        self.lock().dequeue()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn add_subscription(&self, topic: &str) {
        self.lock().add_subscription(topic);
    }

    pub fn remove_subscription(&self, topic: &str) {
        self.lock().remove_subscription(topic);
    }

    pub fn list_subscriptions(&self) -> (usize, Vec<TopicName>) {
        self.lock().list_subscriptions()
    }

    pub fn is_subscribed(&self, topic: &str) -> bool {
        self.lock().is_subscribed(topic)
    }

    /// Runs `f` with exclusive access, for multi-step work that must not
    /// interleave with other callers.
    pub fn with<R>(&self, f: impl FnOnce(&mut QueueManager) -> R) -> R {
        f(&mut self.lock())
    }
}
