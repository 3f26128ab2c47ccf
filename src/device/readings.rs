use crate::core::queue_manager::QueueManager;
use crate::device::topics::DeviceTopics;

/// Raw values from the sensor board, before the set point is resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    pub temp_f: f32,
    pub humidity: f32,
    pub pressure_hpa: f32,
    pub knob_raw: u16,
    pub signal_dbm: i32,
}

/// One full status report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readings {
    pub temp_f: f32,
    pub humidity: f32,
    pub pressure_hpa: f32,
    pub set_temp_f: f32,
    pub signal_dbm: i32,
}

/// Source of sensor samples. Hardware drivers sit behind this.
pub trait SensorSource {
    fn sample(&mut self) -> SensorSample;
}

/// Enqueues one message per reading, in a fixed order.
pub fn publish_readings(manager: &mut QueueManager, topics: &DeviceTopics, r: &Readings) {
    manager.enqueue(&topics.temp, &format!("{:.1}", r.temp_f));
    manager.enqueue(&topics.humidity, &format!("{:.0}", r.humidity));
    manager.enqueue(&topics.pressure, &format!("{:.1}", r.pressure_hpa));
    manager.enqueue(&topics.set_temp, &format!("{:.1}", r.set_temp_f));
    manager.enqueue(&topics.signal_strength, &r.signal_dbm.to_string());
}

pub fn publish_status(manager: &mut QueueManager, topics: &DeviceTopics, logged_in: bool) {
    manager.enqueue(&topics.status, if logged_in { "true" } else { "false" });
}

/// Deterministic stand-in for the sensor board, used by the host simulation.
#[derive(Debug, Default, Clone)]
pub struct SimulatedSensors {
    tick: u64,
}

impl SimulatedSensors {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SensorSource for SimulatedSensors {
    fn sample(&mut self) -> SensorSample {
        let phase = (self.tick % 20) as f32 - 10.0;
        self.tick += 1;
        SensorSample {
            temp_f: 78.0 + phase * 0.15,
            humidity: 22.0 + phase * 0.4,
            pressure_hpa: 1012.0 + phase * 0.05,
            knob_raw: 2048,
            signal_dbm: -60 - (phase.abs() as i32),
        }
    }
}
