//! Seam between the queue and whatever carries messages off the device.
//!
//! The queue never talks to the network itself. [`flush`] drains outbound
//! messages into a [`Transport`]; [`accept`] pulls inbound messages and keeps
//! only those on subscribed topics.

use std::collections::VecDeque;

use tracing::{trace, warn};

use crate::core::error::ThermoError;
use crate::core::message::Message;
use crate::core::queue_manager::QueueManager;
use crate::metrics;

pub trait Transport {
    /// Sends one outbound message.
    fn send(&mut self, message: &Message) -> Result<(), ThermoError>;

    /// Returns the next inbound message, if one is waiting.
    fn poll(&mut self) -> Option<Message>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlushReport {
    pub sent: usize,
    pub failed: bool,
}

/// Sends queued messages in FIFO order until the queue is empty or a send
/// fails. A message leaves the queue only once the transport accepted it, so
/// the failed message and everything behind it are retried on the next flush.
pub fn flush<T: Transport + ?Sized>(transport: &mut T, manager: &mut QueueManager) -> FlushReport {
    let mut report = FlushReport::default();

    while let Some(message) = manager.peek() {
        match transport.send(message) {
            Ok(()) => {
                manager.dequeue();
                report.sent += 1;
            }
            Err(e) => {
                metrics::inc_send_failures(1);
                warn!(
                    target: "thermoq::transport",
                    topic = message.topic(),
                    error = %e,
                    queued = manager.len(),
                    "send failed; message kept for retry"
                );
                report.failed = true;
                break;
            }
        }
    }

    report
}

/// Keeps the messages whose topic is currently subscribed.
pub fn filter_subscribed<I>(manager: &QueueManager, inbound: I) -> Vec<Message>
where
    I: IntoIterator<Item = Message>,
{
    inbound
        .into_iter()
        .filter(|message| {
            let wanted = manager.is_subscribed(message.topic());
            if !wanted {
                metrics::inc_rejected_inbound(1);
                trace!(target: "thermoq::transport", topic = message.topic(), "not subscribed");
            }
            wanted
        })
        .collect()
}

/// Drains everything the transport has received and returns the subscribed part.
pub fn accept<T: Transport + ?Sized>(transport: &mut T, manager: &QueueManager) -> Vec<Message> {
    let inbound: Vec<Message> = std::iter::from_fn(|| transport.poll()).collect();
    filter_subscribed(manager, inbound)
}

/// In-process transport: records what was sent and replays injected inbound
/// messages. Can be switched offline to exercise send failures.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    sent: Vec<Message>,
    inbound: VecDeque<Message>,
    offline: bool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliver(&mut self, message: Message) {
        self.inbound.push_back(message);
    }

    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn sent(&self) -> &[Message] {
        &self.sent
    }

    pub fn take_sent(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.sent)
    }
}

impl Transport for MemoryTransport {
    fn send(&mut self, message: &Message) -> Result<(), ThermoError> {
        if self.offline {
            return Err(ThermoError::Transport("link down".into()));
        }
        self.sent.push(message.clone());
        Ok(())
    }

    fn poll(&mut self) -> Option<Message> {
        self.inbound.pop_front()
    }
}
