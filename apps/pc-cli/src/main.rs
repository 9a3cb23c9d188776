use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use host_actions::{RecordingPower, RecordingSpeaker};
use host_telemetry::{CollectorMetrics, MockCollector};
use net_reach::{InterfaceInfo, InterfaceSource, MockProbe, ProcNetInterfaces, StaticInterfaces};
use pc_driver::{
    CommandRequest, DiscoveryMode, Driver, DriverConfig, PcDriver, PcParameter, Point,
};

#[derive(Parser, Debug)]
#[command(
    name = "pc",
    version,
    about = "Local machine driver: read points, run services, describe the device",
    disable_help_subcommand = true
)]
struct Cli {
    /// Driver config (YAML, or JSON by extension)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use in-process mock backends instead of the host
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    mock: bool,

    /// Print driver counters (Prometheus text) to stderr when done
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    stats: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Discovery {
    Metrics,
    Network,
}

impl From<Discovery> for DiscoveryMode {
    fn from(d: Discovery) -> Self {
        match d {
            Discovery::Metrics => DiscoveryMode::Metrics,
            Discovery::Network => DiscoveryMode::Network,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read points; NAME reads a metric, NAME=ADDRESS probes an address
    Read {
        #[arg(required = true)]
        points: Vec<String>,
        /// Probe timeout in milliseconds (overrides config)
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Report probe status for successful probes too
        #[arg(long, action = ArgAction::SetTrue)]
        retrieve_status: bool,
    },
    /// Print the device self-description as JSON
    Describe {
        /// Discovery strategy (overrides config)
        #[arg(long, value_enum)]
        discovery: Option<Discovery>,
    },
    /// Invoke a service, e.g. `control Speak hello` or `control Reboot 15`
    Control {
        name: String,
        /// Input as JSON; anything that is not valid JSON is sent as a string
        #[arg(default_value = "null")]
        input: String,
    },
    /// List local interfaces with their gateways and DNS servers
    Interfaces,
    /// Print the driver counters in Prometheus text format
    Metrics,
}

fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => pc_driver::load_config(path)?,
        None => DriverConfig::default(),
    };
    if let Commands::Describe {
        discovery: Some(d), ..
    } = &cli.command
    {
        cfg.discovery = (*d).into();
    }

    let driver = if cli.mock {
        mock_driver(cfg.discovery)?
    } else {
        PcDriver::from_config(&cfg)?
    };
    info!(driver = PcDriver::CODE, mock = cli.mock, "driver ready");

    match cli.command {
        Commands::Read {
            points,
            timeout_ms,
            retrieve_status,
        } => {
            let param = PcParameter {
                timeout_ms: timeout_ms.unwrap_or(cfg.parameter.timeout_ms),
                retrieve_status: retrieve_status || cfg.parameter.retrieve_status,
            };
            read(&driver, param, &points)?
        }
        Commands::Describe { .. } => {
            println!("{}", serde_json::to_string_pretty(&driver.describe())?);
        }
        Commands::Control { name, input } => control(&driver, &cfg.parameter, name, &input)?,
        Commands::Interfaces => interfaces(cli.mock)?,
        Commands::Metrics => {
            print!("{}", driver.stats().encode_text());
            return Ok(());
        }
    }

    if cli.stats {
        eprint!("{}", driver.stats().encode_text());
    }
    Ok(())
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_point(spec: &str) -> Point {
    match spec.split_once('=') {
        Some((name, address)) => Point::with_address(name, address),
        None => Point::named(spec),
    }
}

fn read(driver: &PcDriver, param: PcParameter, specs: &[String]) -> Result<()> {
    let node = driver.open(param)?;
    let points: Vec<Point> = specs.iter().map(|s| parse_point(s)).collect();
    debug!(count = points.len(), "reading points");
    let result = driver.read(&node, &points);
    let sorted: std::collections::BTreeMap<_, _> = result.into_iter().collect();
    println!("{}", serde_json::to_string_pretty(&sorted)?);
    driver.close(node);
    Ok(())
}

// JSON when it parses, otherwise the raw text as a string.
fn parse_input(input: &str) -> serde_json::Value {
    serde_json::from_str(input).unwrap_or_else(|_| serde_json::Value::String(input.to_string()))
}

fn control(driver: &PcDriver, param: &PcParameter, name: String, input: &str) -> Result<()> {
    let input_data = parse_input(input);
    let node = driver.open(param.clone())?;
    driver.control(
        &node,
        &CommandRequest {
            name: name.clone(),
            input_data,
        },
    )?;
    println!("{name}: ok");
    driver.close(node);
    Ok(())
}

fn interfaces(mock: bool) -> Result<()> {
    let list = if mock {
        mock_interfaces().interfaces()?
    } else {
        ProcNetInterfaces::new().interfaces()?
    };
    for i in list {
        let join = |v: &[std::net::IpAddr]| {
            v.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(",")
        };
        println!(
            "{}\tgateways={}\tdns={}",
            i.name,
            join(&i.gateways),
            join(&i.dns_servers)
        );
    }
    Ok(())
}

fn mock_interfaces() -> StaticInterfaces {
    use std::net::{IpAddr, Ipv4Addr};
    StaticInterfaces::new(vec![InterfaceInfo {
        name: "mock0".to_string(),
        gateways: vec![IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))],
        dns_servers: vec![IpAddr::V4(Ipv4Addr::new(127, 0, 0, 53))],
    }])
}

fn mock_driver(discovery: DiscoveryMode) -> Result<PcDriver> {
    let driver = PcDriver::builder()
        .discovery(discovery)
        .metrics(Arc::new(CollectorMetrics::new(MockCollector::default())))
        .probe(Arc::new(
            MockProbe::new()
                .reachable("127.0.0.1", 0)
                .reachable("localhost", 0)
                .reachable("127.0.0.53", 1),
        ))
        .interfaces(Arc::new(mock_interfaces()))
        .speaker(Arc::new(RecordingSpeaker::new()))
        .power(Arc::new(RecordingPower::new()))
        .build()?;
    Ok(driver)
}
