//! Topic naming for the thermostat.
//!
//! Topics follow `building/room/domain/device/class/type[/unit]`, e.g.
//! `home/living/hvac/evap-thermostat/sensor/temp/fahrenheit`. The queue core
//! treats topics as opaque strings; validation happens here, at the edge.

use std::fmt;

use crate::core::error::ThermoError;

pub const DEFAULT_PREFIX: &str = "home/living/hvac/evap-thermostat";

const MIN_SEGMENTS: usize = 6;
const MAX_SEGMENTS: usize = 7;

/// A parsed, validated topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicPath {
    segments: Vec<String>,
}

impl TopicPath {
    pub fn parse(topic: &str) -> Result<Self, ThermoError> {
        let invalid = |reason| ThermoError::InvalidTopic {
            topic: topic.to_string(),
            reason,
        };

        let segments: Vec<&str> = topic.split('/').collect();
        if segments.len() < MIN_SEGMENTS {
            return Err(invalid("too few segments"));
        }
        if segments.len() > MAX_SEGMENTS {
            return Err(invalid("too many segments"));
        }
        if segments.iter().any(|s| s.is_empty()) {
            return Err(invalid("empty segment"));
        }
        if segments.iter().any(|s| s.contains(['+', '#'])) {
            return Err(invalid("wildcards are not allowed"));
        }

        Ok(Self {
            segments: segments.into_iter().map(str::to_string).collect(),
        })
    }

    pub fn building(&self) -> &str {
        &self.segments[0]
    }

    pub fn room(&self) -> &str {
        &self.segments[1]
    }

    pub fn domain(&self) -> &str {
        &self.segments[2]
    }

    pub fn device(&self) -> &str {
        &self.segments[3]
    }

    /// `sensor`, `input`, `device`, `controller`, ...
    pub fn class(&self) -> &str {
        &self.segments[4]
    }

    pub fn data_type(&self) -> &str {
        &self.segments[5]
    }

    pub fn unit(&self) -> Option<&str> {
        self.segments.get(6).map(String::as_str)
    }
}

impl fmt::Display for TopicPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// Every topic the thermostat publishes or listens on, built from one prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceTopics {
    pub set_temp: String,
    pub temp: String,
    pub humidity: String,
    pub signal_strength: String,
    pub status: String,
    pub pressure: String,
    /// Controller command that overrides the set temperature.
    pub update_set_temp: String,
}

impl Default for DeviceTopics {
    fn default() -> Self {
        Self::build(DEFAULT_PREFIX)
    }
}

impl DeviceTopics {
    /// Builds the topic table for `prefix` (`building/room/domain/device`).
    pub fn new(prefix: &str) -> Result<Self, ThermoError> {
        let topics = Self::build(prefix);
        for topic in topics.publish_topics().into_iter().chain(topics.subscribe_topics()) {
            TopicPath::parse(&topic)?;
        }
        Ok(topics)
    }

    fn build(prefix: &str) -> Self {
        let t = |suffix: &str| format!("{prefix}/{suffix}");
        Self {
            set_temp: t("input/set-temp/fahrenheit"),
            temp: t("sensor/temp/fahrenheit"),
            humidity: t("sensor/humidity/rh"),
            signal_strength: t("sensor/wifi-signal-strength/dbm"),
            status: t("device/logged-in/boolean"),
            pressure: t("sensor/pressure/hpa"),
            update_set_temp: t("controller/set-temp/fahrenheit"),
        }
    }

    pub fn publish_topics(&self) -> Vec<String> {
        vec![
            self.set_temp.clone(),
            self.temp.clone(),
            self.humidity.clone(),
            self.signal_strength.clone(),
            self.status.clone(),
            self.pressure.clone(),
        ]
    }

    pub fn subscribe_topics(&self) -> Vec<String> {
        vec![self.update_set_temp.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_topic_with_unit() {
        let t =
            TopicPath::parse("home/living/hvac/evap-thermostat/sensor/temp/fahrenheit").unwrap();
        assert_eq!(t.building(), "home");
        assert_eq!(t.room(), "living");
        assert_eq!(t.domain(), "hvac");
        assert_eq!(t.device(), "evap-thermostat");
        assert_eq!(t.class(), "sensor");
        assert_eq!(t.data_type(), "temp");
        assert_eq!(t.unit(), Some("fahrenheit"));
        assert_eq!(t.to_string(), "home/living/hvac/evap-thermostat/sensor/temp/fahrenheit");
    }

    #[test]
    fn unit_is_optional() {
        let t = TopicPath::parse("home/living/hvac/evap-thermostat/device/online").unwrap();
        assert_eq!(t.unit(), None);
    }

    #[test]
    fn rejects_malformed_topics() {
        for bad in [
            "home/living/hvac",
            "home/living/hvac/evap-thermostat/sensor/temp/fahrenheit/extra",
            "home//hvac/evap-thermostat/sensor/temp",
            "home/living/hvac/evap-thermostat/sensor/+",
            "home/living/hvac/evap-thermostat/sensor/#",
        ] {
            assert!(
                matches!(TopicPath::parse(bad), Err(ThermoError::InvalidTopic { .. })),
                "accepted {bad}"
            );
        }
    }

    #[test]
    fn default_table_matches_device_schema() {
        let topics = DeviceTopics::new(DEFAULT_PREFIX).unwrap();
        assert_eq!(topics, DeviceTopics::default());
        assert_eq!(
            topics.humidity,
            "home/living/hvac/evap-thermostat/sensor/humidity/rh"
        );
        assert_eq!(
            topics.subscribe_topics(),
            ["home/living/hvac/evap-thermostat/controller/set-temp/fahrenheit"]
        );
        assert_eq!(topics.publish_topics().len(), 6);
    }

    #[test]
    fn bad_prefix_is_rejected() {
        assert!(DeviceTopics::new("home/living").is_err());
        assert!(DeviceTopics::new("home/+/hvac/t").is_err());
    }
}
