//! Send pings with the ping utility of the operating system.
use anyhow::{Context, Result};
use log::debug;

use crate::command::{ping_command, DEFAULT_PING_BINARY};
use crate::models::{Platform, PingOutput, Probe};

/// Something that can send a ping and report whether it succeeded.
pub trait Pinger {
    fn ping(&mut self, probe: &Probe) -> Result<PingOutput>;
}

impl<P: Pinger + ?Sized> Pinger for &mut P {
    fn ping(&mut self, probe: &Probe) -> Result<PingOutput> {
        (**self).ping(probe)
    }
}

/// A pinger that runs the system ping utility, one process per probe.
pub struct SystemPinger {
    binary: String,
    platform: Platform,
}

impl SystemPinger {
    pub fn new(binary: &str, platform: Platform) -> Self {
        SystemPinger {
            binary: binary.to_string(),
            platform,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }
}

impl Default for SystemPinger {
    fn default() -> Self {
        SystemPinger::new(DEFAULT_PING_BINARY, Platform::native())
    }
}

impl Pinger for SystemPinger {
    fn ping(&mut self, probe: &Probe) -> Result<PingOutput> {
        debug!(
            "Sending ping to {} with packet size {} bytes...",
            probe.target, probe.size
        );
        let result = ping_command(&self.binary, self.platform, probe)
            .output()
            .with_context(|| format!("Cannot run `{}`", self.binary))?;

        // Merge the streams as errors such as "message too long" are written on stderr.
        let mut output = String::from_utf8_lossy(&result.stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&result.stderr));
        debug!("{}", output.trim_end());

        Ok(PingOutput {
            success: result.status.success(),
            output,
        })
    }
}
