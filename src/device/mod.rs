//! Thermostat device layer: topic table, set-point handling and the glue
//! between sensor samples and the message queue.

pub mod readings;
pub mod setpoint;
pub mod topics;

pub use readings::{
    publish_readings, publish_status, Readings, SensorSample, SensorSource, SimulatedSensors,
};
pub use setpoint::SetPoint;
pub use topics::{DeviceTopics, TopicPath};

use tracing::{debug, info};

use crate::config::Config;
use crate::core::error::ThermoError;
use crate::core::message::Message;
use crate::core::queue_manager::QueueManager;

/// The thermostat's message-facing state.
#[derive(Debug)]
pub struct Thermostat {
    topics: DeviceTopics,
    extra_subscriptions: Vec<String>,
    setpoint: SetPoint,
    manager: QueueManager,
}

impl Thermostat {
    pub fn new(config: &Config) -> Result<Self, ThermoError> {
        let topics = DeviceTopics::new(&config.device.topic_prefix)?;
        let extra_subscriptions = config
            .device
            .subscribe
            .iter()
            .map(|suffix| {
                let full = format!("{}/{}", config.device.topic_prefix, suffix);
                TopicPath::parse(&full).map(|_| full)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            topics,
            extra_subscriptions,
            setpoint: SetPoint::from_knob(0),
            manager: QueueManager::with_capacity(config.queue.initial_capacity),
        })
    }

    #[inline]
    pub fn topics(&self) -> &DeviceTopics {
        &self.topics
    }

    #[inline]
    pub fn setpoint(&self) -> &SetPoint {
        &self.setpoint
    }

    #[inline]
    pub fn manager(&self) -> &QueueManager {
        &self.manager
    }

    #[inline]
    pub fn manager_mut(&mut self) -> &mut QueueManager {
        &mut self.manager
    }

    /// Subscribes to the command topics and announces the device.
    pub fn login(&mut self) {
        for topic in self
            .topics
            .subscribe_topics()
            .iter()
            .chain(&self.extra_subscriptions)
        {
            self.manager.add_subscription(topic);
        }
        publish_status(&mut self.manager, &self.topics, true);
        info!(
            target: "thermoq::device",
            subscriptions = self.manager.list_subscriptions().0,
            "logged in"
        );
    }

    /// Announces the device going away and drops every subscription.
    pub fn logout(&mut self) {
        publish_status(&mut self.manager, &self.topics, false);
        let (_, topics) = self.manager.list_subscriptions();
        for topic in &topics {
            self.manager.remove_subscription(topic);
        }
        info!(target: "thermoq::device", "logged out");
    }

    /// Takes one sample, resolves the set point and queues the report.
    pub fn tick(&mut self, sensors: &mut impl SensorSource) -> Readings {
        let sample = sensors.sample();
        let readings = Readings {
            temp_f: sample.temp_f,
            humidity: sample.humidity,
            pressure_hpa: sample.pressure_hpa,
            set_temp_f: self.setpoint.update_from_knob(sample.knob_raw),
            signal_dbm: sample.signal_dbm,
        };
        publish_readings(&mut self.manager, &self.topics, &readings);
        readings
    }

    /// Handles an accepted inbound message.
    ///
    /// A set-temp command overrides the set point and echoes the new value on
    /// the input topic. Other subscribed topics are logged and ignored.
    pub fn handle_inbound(&mut self, message: &Message) -> Result<(), ThermoError> {
        if message.topic() != self.topics.update_set_temp {
            debug!(target: "thermoq::device", topic = message.topic(), "no handler for topic");
            return Ok(());
        }

        let value = self.setpoint.apply_command(message.topic(), message.payload())?;
        let topic = self.topics.set_temp.clone();
        self.manager.enqueue(&topic, &format!("{value:.1}"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thermostat() -> Thermostat {
        Thermostat::new(&Config::default()).unwrap()
    }

    #[test]
    fn login_subscribes_and_announces() {
        let mut t = thermostat();
        t.login();

        let (count, topics) = t.manager().list_subscriptions();
        assert_eq!(count, 1);
        assert_eq!(topics, t.topics().subscribe_topics());

        let msg = t.manager_mut().dequeue().unwrap();
        assert_eq!(msg.topic(), t.topics().status);
        assert_eq!(msg.payload(), "true");
    }

    #[test]
    fn logout_clears_subscriptions() {
        let mut t = thermostat();
        t.login();
        t.logout();
        assert_eq!(t.manager().list_subscriptions().0, 0);
    }

    #[test]
    fn extra_subscriptions_come_from_config() {
        let mut cfg = Config::default();
        cfg.device.subscribe = vec!["controller/fan/mode".into()];
        let mut t = Thermostat::new(&cfg).unwrap();
        t.login();
        assert!(t
            .manager()
            .is_subscribed("home/living/hvac/evap-thermostat/controller/fan/mode"));
    }

    #[test]
    fn set_temp_command_overrides_and_echoes() {
        let mut t = thermostat();
        let cmd = Message::new(t.topics().update_set_temp.clone(), "74");
        t.handle_inbound(&cmd).unwrap();

        assert!(t.setpoint().is_overridden());
        let echo = t.manager_mut().dequeue().unwrap();
        assert_eq!(echo.topic(), t.topics().set_temp);
        assert_eq!(echo.payload(), "74.0");

        let readings = t.tick(&mut SimulatedSensors::new());
        assert_eq!(readings.set_temp_f, 74.0);
    }

    #[test]
    fn unknown_topic_is_ignored() {
        let mut t = thermostat();
        t.handle_inbound(&Message::new("a/b/c/d/e/f", "1")).unwrap();
        assert!(t.manager().is_empty());
    }

    #[test]
    fn tick_queues_five_messages() {
        let mut t = thermostat();
        t.tick(&mut SimulatedSensors::new());
        assert_eq!(t.manager().len(), 5);
    }
}
