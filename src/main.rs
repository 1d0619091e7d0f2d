//! Ping with varying packet sizes to find the path MTU.
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use mtuprobe::command::DEFAULT_PING_BINARY;
use mtuprobe::easy::{probe, probe_dual, Config, Endpoint};
use mtuprobe::models::{Platform, SizeRange};
use mtuprobe::report::{FinalResults, Summary};
use mtuprobe::utilities::{configure_logger, effective_log_level, exit_process_on_panic};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable dual interface test mode.
    #[arg(long, default_value_t = false)]
    dual_interface_test: bool,
    /// First interface for dual test mode.
    #[arg(long, default_value = "")]
    interface1: String,
    /// Second interface for dual test mode.
    #[arg(long, default_value = "")]
    interface2: String,
    /// Target for first interface in dual test mode.
    #[arg(long, default_value = "")]
    target1: String,
    /// Target for second interface in dual test mode.
    #[arg(long, default_value = "")]
    target2: String,
    /// Enable verbose mode (log every ping and its output).
    #[arg(short = 'v', long, default_value_t = false)]
    verbose: bool,
    /// Target IP address to ping for single interface mode.
    #[arg(long, default_value = "8.8.8.8")]
    target: String,
    /// Range of packet sizes, in bytes.
    #[arg(long, default_value_t = SizeRange::default())]
    range: SizeRange,
    /// Increment value for packet size.
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u16).range(1..))]
    increment: u16,
    /// Number of successful pings before moving to next size.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    success_count: u32,
    /// Number of failed pings before moving to next size.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    fail_count: u32,
    /// Enable "Do Not Fragment" flag for single interface mode.
    #[arg(long, default_value_t = false)]
    no_fragment: bool,
    /// Interface or source IP to use for pinging in single interface mode.
    #[arg(long, default_value = "")]
    interface: String,
    /// Time in seconds to wait for each reply.
    #[arg(long, default_value_t = 1.0)]
    timeout: f64,
    /// Command-line syntax of the ping utility (native by default).
    #[arg(long)]
    platform: Option<Platform>,
    /// Path or name of the ping utility.
    #[arg(long, default_value = DEFAULT_PING_BINARY)]
    ping_binary: String,
    /// File to which one row per ping will be written.
    #[arg(short = 'o', long)]
    output_file_csv: Option<PathBuf>,
    /// Time in seconds between two statistics log lines.
    #[arg(long, default_value_t = 5)]
    log_interval: u64,
    /// Minimum log level.
    #[arg(short = 'L', long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

fn non_empty(value: String) -> Option<String> {
    Some(value).filter(|value| !value.is_empty())
}

fn build_config(args: &Args) -> Result<Config> {
    Ok(Config {
        target: args.target.clone(),
        interface: non_empty(args.interface.clone()),
        range: args.range,
        increment: args.increment,
        success_count: args.success_count,
        fail_count: args.fail_count,
        no_fragment: args.no_fragment,
        timeout: Duration::try_from_secs_f64(args.timeout)?,
        platform: args.platform.unwrap_or_else(Platform::native),
        ping_binary: args.ping_binary.clone(),
        output_file_csv: args.output_file_csv.clone(),
        log_interval: Duration::from_secs(args.log_interval),
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    configure_logger(effective_log_level(args.log_level, args.verbose));
    exit_process_on_panic();

    let config = build_config(&args)?;

    if args.dual_interface_test {
        let endpoints = [
            Endpoint {
                interface: non_empty(args.interface1),
                target: args.target1,
            },
            Endpoint {
                interface: non_empty(args.interface2),
                target: args.target2,
            },
        ];
        let results = probe_dual(config, endpoints)?;
        println!("\n{}", FinalResults(&results));
    } else {
        let result = probe(config)?;
        println!("\n{}", Summary(&result));
    }

    Ok(())
}
