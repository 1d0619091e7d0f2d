//! High-level interface for probing the path MTU.
//!
//! ```no_run
//! use mtuprobe::easy::{probe, Config};
//! use mtuprobe::report::Summary;
//!
//! let config = Config {
//!     target: "192.0.2.1".to_string(),
//!     no_fragment: true,
//!     ..Default::default()
//! };
//! let result = probe(config).unwrap();
//!
//! println!("{}", Summary(&result));
//! ```
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::info;

use crate::command::DEFAULT_PING_BINARY;
use crate::logger::StatisticsLogger;
use crate::models::{Platform, Probe, SizeRange};
use crate::pinger::{Pinger, SystemPinger};
use crate::report::write_csv;
use crate::sweep::{SweepLoop, SweepResult};

/// Sweep sizes towards `config.target` with the system ping utility.
pub fn probe(config: Config) -> Result<SweepResult> {
    let pinger = SystemPinger::new(&config.ping_binary, config.platform);
    probe_with(config, pinger)
}

/// Sweep sizes towards `config.target` with the given pinger.
pub fn probe_with<P: Pinger>(config: Config, pinger: P) -> Result<SweepResult> {
    info!("{}", config);
    if config.target.is_empty() {
        bail!("No target given");
    }
    let output_csv = open_output(&config)?;
    let mut sweep_loop = SweepLoop::new(pinger, config.success_count, config.fail_count)?;
    let label = if config.no_fragment { "DF" } else { "No DF" };
    let template = config.template(
        config.interface.clone(),
        config.target.clone(),
        config.no_fragment,
    );
    let result = run_sweep(&config, &mut sweep_loop, label, &template)?;
    save_results(&config, output_csv, std::slice::from_ref(&result))?;
    Ok(result)
}

/// An interface and the target to ping through it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Endpoint {
    pub interface: Option<String>,
    pub target: String,
}

/// Sweep sizes through two interfaces, without and then with the DF bit.
///
/// The results are returned in the order Interface 1 (No DF), Interface 1 (DF),
/// Interface 2 (No DF), Interface 2 (DF).
/// `config.target`, `config.interface` and `config.no_fragment` are ignored.
pub fn probe_dual(config: Config, endpoints: [Endpoint; 2]) -> Result<Vec<SweepResult>> {
    let pinger = SystemPinger::new(&config.ping_binary, config.platform);
    probe_dual_with(config, endpoints, pinger)
}

/// Same as [`probe_dual`] with the given pinger.
pub fn probe_dual_with<P: Pinger>(
    config: Config,
    endpoints: [Endpoint; 2],
    pinger: P,
) -> Result<Vec<SweepResult>> {
    info!("{}", config);
    for (i, endpoint) in endpoints.iter().enumerate() {
        if endpoint.target.is_empty() {
            bail!("No target given for interface {}", i + 1);
        }
    }

    let output_csv = open_output(&config)?;
    let mut sweep_loop = SweepLoop::new(pinger, config.success_count, config.fail_count)?;
    let mut results = Vec::with_capacity(4);
    for (i, endpoint) in endpoints.iter().enumerate() {
        for no_fragment in [false, true] {
            info!(
                "Testing Interface {} {} DF flag...",
                i + 1,
                if no_fragment { "with" } else { "without" }
            );
            let label = format!(
                "Interface {} ({})",
                i + 1,
                if no_fragment { "DF" } else { "No DF" }
            );
            let template = config.template(
                endpoint.interface.clone(),
                endpoint.target.clone(),
                no_fragment,
            );
            results.push(run_sweep(&config, &mut sweep_loop, &label, &template)?);
        }
    }

    save_results(&config, output_csv, &results)?;
    Ok(results)
}

fn run_sweep<P: Pinger>(
    config: &Config,
    sweep_loop: &mut SweepLoop<P>,
    label: &str,
    template: &Probe,
) -> Result<SweepResult> {
    let sizes = config.range.sizes(config.increment)?;
    let logger = StatisticsLogger::new(
        label.to_string(),
        sweep_loop.statistics().clone(),
        config.log_interval,
    );
    let result = sweep_loop.sweep(label, template, sizes);
    logger.stop();
    result
}

// The output file must exist before the first ping is sent.
fn open_output(config: &Config) -> Result<Option<BufWriter<File>>> {
    match &config.output_file_csv {
        None => Ok(None),
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Cannot create {}", path.display()))?;
            Ok(Some(BufWriter::new(file)))
        }
    }
}

fn save_results(
    config: &Config,
    output_csv: Option<BufWriter<File>>,
    results: &[SweepResult],
) -> Result<()> {
    if let (Some(writer), Some(path)) = (output_csv, &config.output_file_csv) {
        write_csv(writer, results)?;
        info!("Results written to {}", path.display());
    }
    Ok(())
}

/// Probing configuration.
pub struct Config {
    /// Host to ping.
    pub target: String,
    /// Interface name or source address to ping from (OS default if unset).
    pub interface: Option<String>,
    /// Payload sizes to test.
    pub range: SizeRange,
    /// Step between two tested sizes.
    pub increment: u16,
    /// Number of successful pings before moving to the next size.
    pub success_count: u32,
    /// Number of failed pings before moving to the next size.
    pub fail_count: u32,
    /// Set the "do not fragment" bit.
    pub no_fragment: bool,
    /// Time to wait for each reply.
    pub timeout: Duration,
    /// Command-line syntax of the ping utility.
    pub platform: Platform,
    /// Path or name of the ping utility.
    pub ping_binary: String,
    /// File to which one row per ping will be written.
    pub output_file_csv: Option<PathBuf>,
    /// Time between two statistics log lines.
    pub log_interval: Duration,
}

impl Config {
    fn template(&self, interface: Option<String>, target: String, no_fragment: bool) -> Probe {
        Probe {
            target,
            size: self.range.start,
            count: 1,
            no_fragment,
            interface,
            timeout: self.timeout,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            target: "8.8.8.8".to_string(),
            interface: None,
            range: SizeRange::default(),
            increment: 100,
            success_count: 1,
            fail_count: 1,
            no_fragment: false,
            timeout: Duration::from_secs(1),
            platform: Platform::native(),
            ping_binary: DEFAULT_PING_BINARY.to_string(),
            output_file_csv: None,
            log_interval: Duration::from_secs(5),
        }
    }
}

impl Display for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "target={:?}", self.target)?;
        write!(f, " interface={:?}", self.interface)?;
        write!(f, " range={}", self.range)?;
        write!(f, " increment={}", self.increment)?;
        write!(f, " success_count={}", self.success_count)?;
        write!(f, " fail_count={}", self.fail_count)?;
        write!(f, " no_fragment={}", self.no_fragment)?;
        write!(f, " timeout={:?}", self.timeout)?;
        write!(f, " platform={}", self.platform)?;
        write!(f, " ping_binary={:?}", self.ping_binary)?;
        write!(f, " output_file_csv={:?}", self.output_file_csv)?;
        write!(f, " log_interval={:?}", self.log_interval)
    }
}
