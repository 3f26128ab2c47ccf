//! Growable ring buffer of owned messages.

use tracing::debug;

use crate::core::message::Message;

/// Capacity used by [`MessageQueue::default`].
pub const DEFAULT_CAPACITY: usize = 10;

/// Position of the live window inside the ring.
///
/// `Empty` is its own state so that "no messages" is never confused with
/// "one message at slot 0".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Empty,
    Occupied { front: usize, rear: usize },
}

/// Unbounded FIFO of [`Message`]s backed by a circular buffer.
///
/// The buffer only grows when the slot after `rear` is `front`, i.e. when the
/// next insert would land on unread data. Growth doubles the capacity and
/// compacts the live messages to slots `0..len` in logical order.
#[derive(Debug)]
pub struct MessageQueue {
    slots: Vec<Option<Message>>,
    cursor: Cursor,
}

impl Default for MessageQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl MessageQueue {
    /// Creates an empty queue with `capacity` slots (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            cursor: Cursor::Empty,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cursor == Cursor::Empty
    }

    pub fn len(&self) -> usize {
        match self.cursor {
            Cursor::Empty => 0,
            Cursor::Occupied { front, rear } => {
                (rear + self.capacity() - front) % self.capacity() + 1
            }
        }
    }

    #[inline]
    fn next(&self, index: usize) -> usize {
        (index + 1) % self.capacity()
    }

    fn is_full(&self) -> bool {
        match self.cursor {
            Cursor::Empty => false,
            Cursor::Occupied { front, rear } => self.next(rear) == front,
        }
    }

    /// Copies `topic` and `payload` into a new message at the back.
    ///
    /// Returns `true` if the buffer had to grow to make room.
    pub fn enqueue(&mut self, topic: &str, payload: &str) -> bool {
        self.push(Message::new(topic, payload))
    }

    /// Appends an already-owned message. Returns `true` on growth.
    pub fn push(&mut self, message: Message) -> bool {
        let grew = if self.is_full() {
            self.grow();
            true
        } else {
            false
        };

        self.cursor = match self.cursor {
            Cursor::Empty => {
                self.slots[0] = Some(message);
                Cursor::Occupied { front: 0, rear: 0 }
            }
            Cursor::Occupied { front, rear } => {
                let slot = self.next(rear);
                self.slots[slot] = Some(message);
                Cursor::Occupied { front, rear: slot }
            }
        };

        grew
    }

    /// Removes and returns the oldest message, or `None` when empty.
    pub fn dequeue(&mut self) -> Option<Message> {
        let Cursor::Occupied { front, rear } = self.cursor else {
            return None;
        };

        let message = self.slots[front].take();
        self.cursor = if front == rear {
            Cursor::Empty
        } else {
            Cursor::Occupied {
                front: self.next(front),
                rear,
            }
        };
        message
    }

    /// Returns the oldest message without removing it.
    pub fn peek(&self) -> Option<&Message> {
        match self.cursor {
            Cursor::Empty => None,
            Cursor::Occupied { front, .. } => self.slots[front].as_ref(),
        }
    }

    /// Iterates live messages from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Message> + '_ {
        let start = match self.cursor {
            Cursor::Empty => 0,
            Cursor::Occupied { front, .. } => front,
        };
        (0..self.len()).filter_map(move |offset| {
            self.slots[(start + offset) % self.capacity()].as_ref()
        })
    }

    fn grow(&mut self) {
        let old_capacity = self.capacity();
        let new_capacity = old_capacity * 2;
        let count = self.len();

        let mut slots: Vec<Option<Message>> = Vec::with_capacity(new_capacity);
        while let Some(message) = self.dequeue() {
            slots.push(Some(message));
        }
        slots.resize_with(new_capacity, || None);

        self.slots = slots;
        self.cursor = if count == 0 {
            Cursor::Empty
        } else {
            Cursor::Occupied {
                front: 0,
                rear: count - 1,
            }
        };

        debug!(
            target: "thermoq::queue",
            old_capacity,
            new_capacity,
            live = count,
            "grew message queue"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(queue: &mut MessageQueue) -> Vec<String> {
        std::iter::from_fn(|| queue.dequeue())
            .map(|m| m.payload().to_string())
            .collect()
    }

    #[test]
    fn fresh_queue_is_empty() {
        let mut q = MessageQueue::default();
        assert!(q.is_empty());
        assert_eq!(q.len(), 0);
        assert_eq!(q.capacity(), DEFAULT_CAPACITY);
        assert!(q.dequeue().is_none());
        assert!(q.peek().is_none());
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let mut q = MessageQueue::with_capacity(0);
        assert_eq!(q.capacity(), 1);

        assert!(!q.enqueue("t", "a"));
        assert!(q.enqueue("t", "b"));
        assert_eq!(q.capacity(), 2);
        assert_eq!(drain(&mut q), ["a", "b"]);
    }

    #[test]
    fn single_element_then_empty_again() {
        let mut q = MessageQueue::with_capacity(4);
        q.enqueue("t", "only");
        assert!(!q.is_empty());
        assert_eq!(q.len(), 1);

        let msg = q.dequeue().unwrap();
        assert_eq!(msg.payload(), "only");
        assert!(q.is_empty());
        assert!(q.dequeue().is_none());
    }

    #[test]
    fn fills_every_slot_before_growing() {
        let mut q = MessageQueue::with_capacity(4);
        for i in 0..4 {
            assert!(!q.enqueue("t", &i.to_string()));
        }
        assert_eq!(q.capacity(), 4);
        assert_eq!(q.len(), 4);

        assert!(q.enqueue("t", "4"));
        assert_eq!(q.capacity(), 8);
        assert_eq!(drain(&mut q), ["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn wraps_around_without_growing() {
        let mut q = MessageQueue::with_capacity(3);
        q.enqueue("t", "a");
        q.enqueue("t", "b");
        assert_eq!(q.dequeue().unwrap().payload(), "a");

        // front is slot 1 now; "d" lands in slot 0.
        q.enqueue("t", "c");
        assert!(!q.enqueue("t", "d"));
        assert_eq!(q.capacity(), 3);
        assert_eq!(q.len(), 3);
        assert_eq!(drain(&mut q), ["b", "c", "d"]);
    }

    #[test]
    fn growth_compacts_a_wrapped_window() {
        let mut q = MessageQueue::with_capacity(4);
        for p in ["a", "b", "c"] {
            q.enqueue("t", p);
        }
        q.dequeue();
        q.dequeue();
        for p in ["d", "e", "f"] {
            q.enqueue("t", p);
        }
        // live: c d e f, wrapped across the end of the ring
        assert_eq!(q.len(), 4);
        assert!(q.enqueue("t", "g"));
        assert_eq!(q.capacity(), 8);
        assert_eq!(q.peek().map(Message::payload), Some("c"));
        assert_eq!(
            q.iter().map(Message::payload).collect::<Vec<_>>(),
            ["c", "d", "e", "f", "g"]
        );
        assert_eq!(drain(&mut q), ["c", "d", "e", "f", "g"]);
    }

    #[test]
    fn never_shrinks() {
        let mut q = MessageQueue::with_capacity(2);
        for i in 0..9 {
            q.enqueue("t", &i.to_string());
        }
        let grown = q.capacity();
        assert_eq!(grown, 16);
        drain(&mut q);
        assert_eq!(q.capacity(), grown);
    }
}
