//! Host-side main loop.
//!
//! Mirrors the firmware's cooperative loop on a single tokio task: every tick
//! the thermostat samples its sensors, inbound commands are filtered against
//! the subscription list and applied, and the outbound queue is flushed.

use std::future::{self, Future};
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::config::{Config, SimulationConfig};
use crate::core::message::Message;
use crate::device::{SensorSource, Thermostat};
use crate::transport::{self, Transport};

/// Fake remote controller: periodically issues a set-temp command and a
/// message on a topic the device never subscribed to.
#[derive(Debug, Clone)]
pub struct SimulatedController {
    command_topic: String,
    noise_topic: String,
    every: u64,
}

impl SimulatedController {
    pub fn new(thermostat: &Thermostat, every: u64) -> Self {
        let topics = thermostat.topics();
        Self {
            command_topic: topics.update_set_temp.clone(),
            noise_topic: topics.temp.clone(),
            every,
        }
    }

    /// Messages the controller emits on `tick` (1-based).
    pub fn messages(&self, tick: u64) -> Vec<Message> {
        if self.every == 0 || tick % self.every != 0 {
            return Vec::new();
        }
        let round = tick / self.every;
        let set_temp = 72.0 + (round % 9) as f32;
        vec![
            Message::new(self.command_topic.as_str(), format!("{set_temp:.1}")),
            Message::new(self.noise_topic.as_str(), "echo"),
        ]
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimulationReport {
    pub ticks: u64,
    pub sent: usize,
    pub commands_applied: usize,
    pub commands_rejected: usize,
}

/// Runs the loop for `sim.ticks` ticks, or forever when unset.
pub async fn run_simulation<T, S>(
    config: &Config,
    link: &mut T,
    sensors: &mut S,
) -> anyhow::Result<SimulationReport>
where
    T: Transport + ?Sized,
    S: SensorSource,
{
    run_simulation_until(config, link, sensors, future::pending()).await
}

/// Like [`run_simulation`], but also stops when `shutdown` resolves.
///
/// Stopping is graceful: the device still logs out and the queue is flushed
/// one last time, so the final status reaches the transport.
pub async fn run_simulation_until<T, S, F>(
    config: &Config,
    link: &mut T,
    sensors: &mut S,
    shutdown: F,
) -> anyhow::Result<SimulationReport>
where
    T: Transport + ?Sized,
    S: SensorSource,
    F: Future<Output = ()>,
{
    let SimulationConfig {
        tick_ms,
        ticks,
        command_every,
    } = config.simulation.clone();

    let mut thermostat = Thermostat::new(config)?;
    let controller = SimulatedController::new(&thermostat, command_every);
    let mut report = SimulationReport::default();

    thermostat.login();

    let mut timer = interval(Duration::from_millis(tick_ms));
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tokio::pin!(shutdown);

    while ticks.map_or(true, |limit| report.ticks < limit) {
        tokio::select! {
            _ = timer.tick() => {}
            _ = &mut shutdown => {
                info!(target: "thermoq::runtime", ticks = report.ticks, "shutdown requested");
                break;
            }
        }
        report.ticks += 1;

        let readings = thermostat.tick(sensors);

        let inbound = std::iter::from_fn(|| link.poll())
            .chain(controller.messages(report.ticks))
            .collect::<Vec<_>>();
        for message in transport::filter_subscribed(thermostat.manager(), inbound) {
            match thermostat.handle_inbound(&message) {
                Ok(()) => report.commands_applied += 1,
                Err(e) => {
                    report.commands_rejected += 1;
                    warn!(target: "thermoq::runtime", error = %e, "inbound command rejected");
                }
            }
        }

        let flushed = transport::flush(link, thermostat.manager_mut());
        report.sent += flushed.sent;

        info!(
            target: "thermoq::runtime",
            tick = report.ticks,
            temp_f = readings.temp_f,
            set_temp_f = thermostat.setpoint().fahrenheit(),
            sent = flushed.sent,
            "tick"
        );
    }

    thermostat.logout();
    report.sent += transport::flush(link, thermostat.manager_mut()).sent;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_fires_on_schedule() {
        let t = Thermostat::new(&Config::default()).unwrap();
        let c = SimulatedController::new(&t, 3);
        assert!(c.messages(1).is_empty());
        assert!(c.messages(2).is_empty());

        let msgs = c.messages(3);
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].topic(), t.topics().update_set_temp);
        assert_eq!(msgs[0].payload(), "73.0");
    }

    #[test]
    fn zero_interval_disables_controller() {
        let t = Thermostat::new(&Config::default()).unwrap();
        let c = SimulatedController::new(&t, 0);
        assert!(c.messages(10).is_empty());
    }
}
