//! thermoq – host simulation of the thermostat's message loop.
//
//  $ thermoq simulate --config thermoq.toml --ticks 20
//  $ thermoq topics
use thermoq::device::{DeviceTopics, SimulatedSensors};
use thermoq::logging::init_logging;
use thermoq::transport::Transport;
use thermoq::{metrics, run_simulation_until, Config, Message, ThermoError};

use clap::{Parser, Subcommand};
use tracing::warn;

#[derive(Debug, Parser)]
#[command(name = "thermoq", version, about = "Thermostat message queue simulator")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the device loop against simulated sensors and a console link.
    Simulate {
        /// Path to config TOML (env THERMOQ_CONFIG is used when omitted)
        #[arg(short, long)]
        config: Option<String>,
        /// Stop after this many ticks (overrides the config file)
        #[arg(long)]
        ticks: Option<u64>,
    },
    /// Print the topics this device publishes and subscribes to.
    Topics {
        #[arg(short, long)]
        config: Option<String>,
    },
}

/// Prints outbound messages; never receives anything.
struct ConsoleTransport;

impl Transport for ConsoleTransport {
    fn send(&mut self, message: &Message) -> Result<(), ThermoError> {
        println!("→ {message}");
        Ok(())
    }

    fn poll(&mut self) -> Option<Message> {
        None
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.cmd {
        Command::Simulate { config, ticks } => {
            let mut cfg: Config = Config::load(config.as_deref())?;
            if ticks.is_some() {
                cfg.simulation.ticks = ticks;
            }

            let mut link = ConsoleTransport;
            let mut sensors = SimulatedSensors::new();
            let interrupted = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!(error = %e, "cannot listen for ctrl-c; running until the tick limit");
                    std::future::pending::<()>().await;
                }
            };

            let report = run_simulation_until(&cfg, &mut link, &mut sensors, interrupted).await?;
            println!(
                "📡 {} ticks, {} messages sent, {} commands applied, {} rejected",
                report.ticks, report.sent, report.commands_applied, report.commands_rejected
            );
            print!("{}", metrics::snapshot());
        }
        Command::Topics { config } => {
            let cfg: Config = Config::load(config.as_deref())?;
            let topics = DeviceTopics::new(&cfg.device.topic_prefix)?;
            println!("publish:");
            for t in topics.publish_topics() {
                println!("  {t}");
            }
            println!("subscribe:");
            for t in topics.subscribe_topics() {
                println!("  {t}");
            }
            for suffix in &cfg.device.subscribe {
                println!("  {}/{}", cfg.device.topic_prefix, suffix);
            }
        }
    }
    Ok(())
}
