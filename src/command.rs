//! Functions for building ping invocations.
//!
//! Each platform ships a ping utility with its own flags for the payload size,
//! the reply timeout, the "do not fragment" bit and the source interface.
//!
//! ```
//! use std::time::Duration;
//! use mtuprobe::command::ping_arguments;
//! use mtuprobe::models::{Platform, Probe};
//!
//! let probe = Probe {
//!     target: "192.0.2.1".to_string(),
//!     size: 1472,
//!     count: 1,
//!     no_fragment: true,
//!     interface: Some("eth0".to_string()),
//!     timeout: Duration::from_secs(1),
//! };
//!
//! assert_eq!(
//!     ping_arguments(Platform::Linux, &probe).join(" "),
//!     "-c 1 -s 1472 -W 1 192.0.2.1 -M do -I eth0"
//! );
//! ```
use std::net::IpAddr;
use std::process::Command;
use std::time::Duration;

use crate::models::{Platform, Probe};

/// Name of the ping binary, resolved through `PATH`.
pub const DEFAULT_PING_BINARY: &str = "ping";

/// Return the command-line arguments for sending `probe` with the ping utility of `platform`.
pub fn ping_arguments(platform: Platform, probe: &Probe) -> Vec<String> {
    let mut args = match platform {
        Platform::Windows => vec![
            "-n".to_string(),
            probe.count.to_string(),
            "-l".to_string(),
            probe.size.to_string(),
            "-w".to_string(),
            timeout_millis(probe.timeout).to_string(),
            probe.target.clone(),
        ],
        Platform::Linux => vec![
            "-c".to_string(),
            probe.count.to_string(),
            "-s".to_string(),
            probe.size.to_string(),
            "-W".to_string(),
            timeout_seconds(probe.timeout).to_string(),
            probe.target.clone(),
        ],
        Platform::MacOs => vec![
            "-c".to_string(),
            probe.count.to_string(),
            "-s".to_string(),
            probe.size.to_string(),
            "-W".to_string(),
            timeout_millis(probe.timeout).to_string(),
            probe.target.clone(),
        ],
    };

    if probe.no_fragment {
        match platform {
            Platform::Windows => args.push("-f".to_string()),
            Platform::Linux => args.extend(["-M".to_string(), "do".to_string()]),
            Platform::MacOs => args.push("-D".to_string()),
        }
    }

    if let Some(interface) = probe.interface() {
        let flag = match platform {
            // On Windows the interface is given by its IP address.
            Platform::Windows => "-S",
            Platform::Linux => "-I",
            // BSD ping binds to an interface name with -b and to an address with -S.
            Platform::MacOs if interface.parse::<IpAddr>().is_ok() => "-S",
            Platform::MacOs => "-b",
        };
        args.extend([flag.to_string(), interface.to_string()]);
    }

    args
}

/// Build the full command for sending `probe`.
pub fn ping_command(binary: &str, platform: Platform, probe: &Probe) -> Command {
    let mut command = Command::new(binary);
    command.args(ping_arguments(platform, probe));
    command
}

fn timeout_millis(timeout: Duration) -> u128 {
    timeout.as_millis().max(1)
}

// iputils only accepts whole seconds on older releases.
fn timeout_seconds(timeout: Duration) -> u64 {
    let seconds = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
    seconds.max(1)
}
