use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wiseway_ups::{
    is_supported_device, InputFormat, RawOidMap, Report, Runner, Service, ThresholdConfig,
    UpsCheck,
};

/// Checks a Wiseway3 UPS from a dump of its SNMP values.
#[derive(Parser)]
#[command(name = "check_wiseway_ups", version)]
struct Cli {
    /// Dump of one poll cycle, `-` reads stdin
    #[arg(long, short)]
    input: PathBuf,
    #[arg(long, short, value_enum, default_value_t = InputFormat::Walk)]
    format: InputFormat,
    /// Threshold file, falls back to $WISEWAY_UPS_CONFIG
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// Service to check, e.g. `input_voltage`, or `all` for one line per service
    #[arg(long, short, default_value = "all")]
    service: String,
    /// Log debug output to stderr
    #[arg(long, short)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Runner::new().safe_run(|| run(&cli)).print_and_exit()
}

fn run(cli: &Cli) -> anyhow::Result<Report> {
    let raw = RawOidMap::load(&cli.input, cli.format)?;
    tracing::debug!(oids = raw.len(), "poll cycle loaded");

    if !raw.is_empty() && !is_supported_device(&raw) {
        tracing::warn!("device does not identify itself as Wiseway3, results may be incomplete");
    }

    let config = match cli.config {
        Some(ref path) => ThresholdConfig::load(path)?,
        None => ThresholdConfig::load_from_env()?,
    };

    let today = chrono::Local::now().date_naive();
    let check = UpsCheck::new(&raw, &config, today);

    let report = if cli.service == "all" {
        Report::from(check.run_all()?)
    } else {
        let service: Service = cli.service.parse()?;
        Report::from(check.run(service)?)
    };

    Ok(report)
}
