use std::collections::VecDeque;
use std::fs;
use std::time::Duration;

use anyhow::{bail, Result};
use mtuprobe::easy::{probe_dual_with, probe_with, Config, Endpoint};
use mtuprobe::models::{FailureReason, PingOutput, Platform, Probe, SizeRange};
use mtuprobe::{Pinger, SweepLoop};

/// Answers like a path whose MTU is `mtu` bytes (payload + 28 bytes of headers).
/// Oversized packets get a "frag needed" error with DF and are dropped without.
struct PathPinger {
    mtu: u16,
    probes: Vec<Probe>,
}

impl PathPinger {
    fn new(mtu: u16) -> Self {
        PathPinger {
            mtu,
            probes: vec![],
        }
    }
}

impl Pinger for PathPinger {
    fn ping(&mut self, probe: &Probe) -> Result<PingOutput> {
        self.probes.push(probe.clone());
        let output = if probe.size + 28 <= self.mtu {
            PingOutput {
                success: true,
                output: format!(
                    "{} bytes from {}: icmp_seq=1 ttl=57 time=4.2 ms",
                    probe.size + 8,
                    probe.target
                ),
            }
        } else if probe.no_fragment {
            PingOutput {
                success: false,
                output: format!("ping: local error: message too long, mtu={}", self.mtu),
            }
        } else {
            PingOutput {
                success: false,
                output: "1 packets transmitted, 0 received, 100% packet loss".to_string(),
            }
        };
        Ok(output)
    }
}

/// Replays a fixed sequence of successes and failures.
struct ScriptedPinger {
    script: VecDeque<bool>,
}

impl ScriptedPinger {
    fn new(script: &[bool]) -> Self {
        ScriptedPinger {
            script: script.iter().copied().collect(),
        }
    }
}

impl Pinger for ScriptedPinger {
    fn ping(&mut self, _probe: &Probe) -> Result<PingOutput> {
        match self.script.pop_front() {
            Some(success) => Ok(PingOutput {
                success,
                output: String::new(),
            }),
            None => bail!("script exhausted"),
        }
    }
}

fn template(no_fragment: bool) -> Probe {
    Probe {
        target: "192.0.2.1".to_string(),
        size: 0,
        count: 1,
        no_fragment,
        interface: Some("eth0".to_string()),
        timeout: Duration::from_secs(1),
    }
}

fn config(range: &str, increment: u16) -> Config {
    Config {
        target: "192.0.2.1".to_string(),
        range: range.parse().unwrap(),
        increment,
        platform: Platform::Linux,
        ..Default::default()
    }
}

#[test]
fn test_sweep_with_df() {
    let mut pinger = PathPinger::new(1500);
    let mut sweep_loop = SweepLoop::new(&mut pinger, 1, 1).unwrap();
    let sizes = SizeRange::new(1400, 1500).unwrap().sizes(20).unwrap();
    let result = sweep_loop.sweep("DF", &template(true), sizes).unwrap();

    assert_eq!(result.successes, vec![1400, 1420, 1440, 1460]);
    assert_eq!(result.failures, vec![1480, 1500]);
    assert_eq!(result.statistics.sizes_tested, 6);
    assert_eq!(result.statistics.sent, 6);
    assert_eq!(result.statistics.lost, 2);
    assert_eq!(result.statistics.fragmentation_needed, 2);
    assert_eq!(result.path_mtu_estimate(), Some(1488));

    assert_eq!(result.records.len(), 6);
    assert_eq!(result.records[0].rtt, Some(4.2));
    assert_eq!(result.records[0].interface, "eth0");
    assert_eq!(
        result.records[5].failure_reason,
        Some(FailureReason::FragmentationNeeded)
    );
    assert_eq!(result.records[5].rtt, None);

    let sizes: Vec<u16> = pinger.probes.iter().map(|probe| probe.size).collect();
    assert_eq!(sizes, vec![1400, 1420, 1440, 1460, 1480, 1500]);
    assert!(pinger.probes.iter().all(|probe| probe.no_fragment));
    assert!(pinger.probes.iter().all(|probe| probe.count == 1));
}

#[test]
fn test_sweep_without_df() {
    let mut sweep_loop = SweepLoop::new(PathPinger::new(1500), 1, 1).unwrap();
    let sizes = SizeRange::new(1400, 1500).unwrap().sizes(100).unwrap();
    let result = sweep_loop.sweep("No DF", &template(false), sizes).unwrap();

    assert_eq!(result.successes, vec![1400]);
    assert_eq!(result.failures, vec![1500]);
    assert_eq!(result.statistics.timeouts, 1);
    assert_eq!(result.path_mtu_estimate(), None);
}

#[test]
fn test_failure_threshold_reached_first() {
    let pinger = ScriptedPinger::new(&[true, false, true, false]);
    let mut sweep_loop = SweepLoop::new(pinger, 3, 2).unwrap();
    let sizes = SizeRange::new(100, 100).unwrap().sizes(1).unwrap();
    let result = sweep_loop.sweep("", &template(false), sizes).unwrap();

    assert!(result.successes.is_empty());
    assert_eq!(result.failures, vec![100]);
    assert_eq!(result.statistics.sent, 4);
    assert_eq!(result.statistics.lost, 2);
    assert!(sweep_loop.into_inner().script.is_empty());
}

#[test]
fn test_success_threshold_reached_first() {
    let pinger = ScriptedPinger::new(&[true, false, true, true, false]);
    let mut sweep_loop = SweepLoop::new(pinger, 3, 2).unwrap();
    let sizes = SizeRange::new(100, 100).unwrap().sizes(1).unwrap();
    let result = sweep_loop.sweep("", &template(false), sizes).unwrap();

    assert_eq!(result.successes, vec![100]);
    assert!(result.failures.is_empty());
    assert_eq!(result.statistics.sent, 4);
    assert_eq!(result.statistics.lost, 1);
    assert_eq!(result.statistics.unknown_failures, 1);
    // The last scripted answer is never requested.
    assert_eq!(sweep_loop.into_inner().script.len(), 1);
}

#[test]
fn test_each_size_in_one_list() {
    let pinger = ScriptedPinger::new(&[true, false, false, true, false]);
    let mut sweep_loop = SweepLoop::new(pinger, 1, 1).unwrap();
    let sizes = SizeRange::new(100, 500).unwrap().sizes(100).unwrap();
    let result = sweep_loop.sweep("", &template(false), sizes).unwrap();

    assert_eq!(result.successes, vec![100, 400]);
    assert_eq!(result.failures, vec![200, 300, 500]);
    assert_eq!(result.statistics.success_rate(), 40.);
    assert_eq!(result.statistics.loss_rate(), 60.);
}

#[test]
fn test_statistics_reset_between_sweeps() {
    let mut sweep_loop = SweepLoop::new(PathPinger::new(1500), 1, 1).unwrap();
    let range = SizeRange::new(100, 300).unwrap();
    sweep_loop
        .sweep("first", &template(false), range.sizes(100).unwrap())
        .unwrap();
    let result = sweep_loop
        .sweep("second", &template(false), range.sizes(100).unwrap())
        .unwrap();
    assert_eq!(result.statistics.sent, 3);
    assert_eq!(*sweep_loop.statistics().lock().unwrap(), result.statistics);
}

#[test]
fn test_pinger_error_aborts_sweep() {
    let mut sweep_loop = SweepLoop::new(ScriptedPinger::new(&[true]), 1, 1).unwrap();
    let sizes = SizeRange::new(100, 200).unwrap().sizes(100).unwrap();
    assert!(sweep_loop.sweep("", &template(false), sizes).is_err());
}

#[test]
fn test_zero_thresholds_are_rejected() {
    assert!(SweepLoop::new(ScriptedPinger::new(&[]), 0, 1).is_err());
    assert!(SweepLoop::new(ScriptedPinger::new(&[]), 1, 0).is_err());
}

#[test]
fn test_probe_with() {
    let mut pinger = PathPinger::new(1500);
    let config = Config {
        no_fragment: true,
        interface: Some("eth1".to_string()),
        ..config("1000-2000", 250)
    };
    let result = probe_with(config, &mut pinger).unwrap();

    assert_eq!(result.label, "DF");
    assert_eq!(result.successes, vec![1000, 1250]);
    assert_eq!(result.failures, vec![1500, 1750, 2000]);
    assert!(pinger
        .probes
        .iter()
        .all(|probe| probe.interface.as_deref() == Some("eth1")));
}

#[test]
fn test_probe_with_empty_target() {
    let config = Config {
        target: String::new(),
        ..config("100-200", 100)
    };
    assert!(probe_with(config, ScriptedPinger::new(&[])).is_err());
}

#[test]
fn test_probe_dual() {
    let mut pinger = PathPinger::new(1500);
    let endpoints = [
        Endpoint {
            interface: Some("eth0".to_string()),
            target: "192.0.2.1".to_string(),
        },
        Endpoint {
            interface: None,
            target: "198.51.100.1".to_string(),
        },
    ];
    let results = probe_dual_with(config("1400-1500", 100), endpoints, &mut pinger).unwrap();

    let labels: Vec<&str> = results.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Interface 1 (No DF)",
            "Interface 1 (DF)",
            "Interface 2 (No DF)",
            "Interface 2 (DF)"
        ]
    );
    for result in &results {
        assert_eq!(result.successes, vec![1400]);
        assert_eq!(result.failures, vec![1500]);
    }
    assert_eq!(results[0].statistics.timeouts, 1);
    assert_eq!(results[1].statistics.fragmentation_needed, 1);

    let calls: Vec<(String, Option<String>, bool)> = pinger
        .probes
        .iter()
        .map(|p| (p.target.clone(), p.interface.clone(), p.no_fragment))
        .collect();
    assert_eq!(calls.len(), 8);
    assert_eq!(
        calls[0],
        ("192.0.2.1".to_string(), Some("eth0".to_string()), false)
    );
    assert_eq!(
        calls[2],
        ("192.0.2.1".to_string(), Some("eth0".to_string()), true)
    );
    assert_eq!(calls[4], ("198.51.100.1".to_string(), None, false));
    assert_eq!(calls[7], ("198.51.100.1".to_string(), None, true));
}

#[test]
fn test_probe_dual_missing_target() {
    let endpoints = [
        Endpoint {
            interface: Some("eth0".to_string()),
            target: "192.0.2.1".to_string(),
        },
        Endpoint::default(),
    ];
    let mut pinger = PathPinger::new(1500);
    assert!(probe_dual_with(config("100-200", 100), endpoints, &mut pinger).is_err());
    assert!(pinger.probes.is_empty());
}

#[test]
fn test_csv_output() {
    let path = std::env::temp_dir().join(format!("mtuprobe-{}.csv", std::process::id()));
    let config = Config {
        output_file_csv: Some(path.clone()),
        ..config("1400-1500", 100)
    };
    probe_with(config, PathPinger::new(1500)).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "timestamp,label,interface,target,size,no_fragment,success,failure_reason,rtt"
    );
    assert!(lines[1].ends_with(",No DF,,192.0.2.1,1400,false,true,,4.2"));
    assert!(lines[2].ends_with(",No DF,,192.0.2.1,1500,false,false,timeout,"));
}

#[test]
fn test_csv_output_in_missing_directory() {
    let path = std::env::temp_dir()
        .join(format!("mtuprobe-missing-{}", std::process::id()))
        .join("out.csv");

    let mut pinger = PathPinger::new(1500);
    let single = Config {
        output_file_csv: Some(path.clone()),
        ..config("100-9100", 100)
    };
    assert!(probe_with(single, &mut pinger).is_err());
    assert!(pinger.probes.is_empty());

    let endpoints = [
        Endpoint {
            interface: None,
            target: "192.0.2.1".to_string(),
        },
        Endpoint {
            interface: None,
            target: "198.51.100.1".to_string(),
        },
    ];
    let dual = Config {
        output_file_csv: Some(path),
        ..config("100-9100", 100)
    };
    assert!(probe_dual_with(dual, endpoints, &mut pinger).is_err());
    assert!(pinger.probes.is_empty());
}
