use std::fmt;

/// A single publish/subscribe message: a topic and its text payload.
///
/// Messages own their strings. Building one from borrowed text always
/// allocates, so callers are free to reuse their buffers right after
/// handing them to the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    topic: String,
    payload: String,
}

impl Message {
    pub fn new(topic: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }

    #[inline]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[inline]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Splits the message into its owned topic and payload.
    pub fn into_parts(self) -> (String, String) {
        (self.topic, self.payload)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.topic, self.payload)
    }
}
