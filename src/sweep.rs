//! Sweep a range of payload sizes towards a target.
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use chrono::Utc;
use log::{info, trace};

use crate::models::{FailureReason, PingRecord, Probe};
use crate::parser::{parse_failure_reason, parse_rtt};
use crate::pinger::Pinger;

/// Size of the IPv4 and ICMP headers added to the payload.
pub const IPV4_ICMP_OVERHEAD: u16 = 28;

pub struct SweepLoop<P: Pinger> {
    pinger: P,
    success_count: u32,
    fail_count: u32,
    statistics: Arc<Mutex<SweepStatistics>>,
}

impl<P: Pinger> SweepLoop<P> {
    /// Build a sweep loop that moves to the next size after `success_count`
    /// successful or `fail_count` failed pings, whichever comes first.
    pub fn new(pinger: P, success_count: u32, fail_count: u32) -> Result<Self> {
        if success_count == 0 || fail_count == 0 {
            bail!("Success and failure counts must be at least 1");
        }
        let statistics = Arc::new(Mutex::new(SweepStatistics::default()));
        Ok(SweepLoop {
            pinger,
            success_count,
            fail_count,
            statistics,
        })
    }

    /// Ping `template.target` with each of the given sizes.
    ///
    /// The statistics are reset at the beginning of each sweep.
    pub fn sweep<T: Iterator<Item = u16>>(
        &mut self,
        label: &str,
        template: &Probe,
        sizes: T,
    ) -> Result<SweepResult> {
        *self.statistics.lock().unwrap() = SweepStatistics::default();
        let mut result = SweepResult {
            label: label.to_string(),
            no_fragment: template.no_fragment,
            ..Default::default()
        };

        for size in sizes {
            let probe = Probe {
                size,
                ..template.clone()
            };
            let mut successes = 0;
            let mut failures = 0;

            while successes < self.success_count && failures < self.fail_count {
                let timestamp = Utc::now();
                let output = self.pinger.ping(&probe)?;
                let failure_reason = if output.success {
                    successes += 1;
                    None
                } else {
                    failures += 1;
                    Some(parse_failure_reason(&output.output))
                };
                trace!("{} success={}", probe, output.success);

                self.statistics
                    .lock()
                    .unwrap()
                    .record_ping(failure_reason);
                result.records.push(PingRecord {
                    timestamp,
                    label: label.to_string(),
                    interface: probe.interface().unwrap_or_default().to_string(),
                    target: probe.target.clone(),
                    size,
                    no_fragment: probe.no_fragment,
                    success: output.success,
                    failure_reason,
                    rtt: parse_rtt(&output.output).filter(|_| output.success),
                });
            }

            if successes == self.success_count {
                result.successes.push(size);
            }
            if failures == self.fail_count {
                result.failures.push(size);
            }
            self.statistics.lock().unwrap().sizes_tested += 1;
        }

        result.statistics = *self.statistics.lock().unwrap();
        info!("{} {}", label, result.statistics);
        Ok(result)
    }

    /// Return a reference to the sweep statistics.
    /// This reference can be cloned to read the statistics from another thread.
    pub fn statistics(&self) -> &Arc<Mutex<SweepStatistics>> {
        &self.statistics
    }

    pub fn into_inner(self) -> P {
        self.pinger
    }
}

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct SweepStatistics {
    pub sizes_tested: u64,
    pub sent: u64,
    pub lost: u64,
    pub timeouts: u64,
    pub fragmentation_needed: u64,
    pub unreachable: u64,
    pub unknown_failures: u64,
}

impl SweepStatistics {
    pub fn record_ping(&mut self, failure_reason: Option<FailureReason>) {
        self.sent += 1;
        if let Some(reason) = failure_reason {
            self.lost += 1;
            match reason {
                FailureReason::Timeout => self.timeouts += 1,
                FailureReason::FragmentationNeeded => self.fragmentation_needed += 1,
                FailureReason::Unreachable => self.unreachable += 1,
                FailureReason::Unknown => self.unknown_failures += 1,
            }
        }
    }

    /// Percentage of pings that got a reply (0 if nothing was sent).
    pub fn success_rate(&self) -> f64 {
        if self.sent == 0 {
            return 0.;
        }
        100. * (self.sent - self.lost) as f64 / self.sent as f64
    }

    /// Percentage of pings that failed (0 if nothing was sent).
    pub fn loss_rate(&self) -> f64 {
        if self.sent == 0 {
            return 0.;
        }
        100. * self.lost as f64 / self.sent as f64
    }
}

impl Display for SweepStatistics {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "sizes_tested={} pings_sent={} pings_lost={} timeouts={} fragmentation_needed={} unreachable={} unknown_failures={}",
               self.sizes_tested, self.sent, self.lost, self.timeouts, self.fragmentation_needed, self.unreachable, self.unknown_failures)
    }
}

/// The outcome of a sweep.
#[derive(Clone, Debug, Default)]
pub struct SweepResult {
    pub label: String,
    pub no_fragment: bool,
    /// Sizes that reached the success threshold, in sweep order.
    pub successes: Vec<u16>,
    /// Sizes that reached the failure threshold, in sweep order.
    pub failures: Vec<u16>,
    pub statistics: SweepStatistics,
    pub records: Vec<PingRecord>,
}

impl SweepResult {
    pub fn largest_success(&self) -> Option<u16> {
        self.successes.iter().max().copied()
    }

    /// Largest packet that went through unfragmented, headers included.
    /// Only meaningful when the DF bit was set.
    pub fn path_mtu_estimate(&self) -> Option<u32> {
        if !self.no_fragment {
            return None;
        }
        self.largest_success()
            .map(|size| u32::from(size) + u32::from(IPV4_ICMP_OVERHEAD))
    }
}
