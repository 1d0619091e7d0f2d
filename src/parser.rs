//! Functions for interpreting the output of the ping utility.
//!
//! The exit status of the ping utility decides whether a ping succeeded.
//! These functions only extract extra details from its textual output.
use crate::models::FailureReason;

const FRAGMENTATION_NEEDED: [&str; 4] = [
    // iputils: "ping: local error: message too long, mtu=1500"
    "message too long",
    // iputils: "From 192.0.2.1 icmp_seq=1 Frag needed and DF set (mtu = 1400)"
    "frag needed",
    // Windows: "Packet needs to be fragmented but DF set."
    "needs to be fragmented",
    "fragmentation needed",
];

const UNREACHABLE: [&str; 1] = ["unreachable"];

const TIMEOUT: [&str; 4] = [
    // Windows: "Request timed out."
    "timed out",
    "timeout",
    "100% packet loss",
    // macOS: "1 packets transmitted, 0 packets received, 100.0% packet loss"
    "100.0% packet loss",
];

/// Guess why a ping failed from its output.
pub fn parse_failure_reason(output: &str) -> FailureReason {
    let output = output.to_lowercase();
    let matches = |patterns: &[&str]| patterns.iter().any(|pattern| output.contains(pattern));
    // Order matters: a rejected packet is also reported as 100% packet loss.
    if matches(&FRAGMENTATION_NEEDED) {
        FailureReason::FragmentationNeeded
    } else if matches(&UNREACHABLE) {
        FailureReason::Unreachable
    } else if matches(&TIMEOUT) {
        FailureReason::Timeout
    } else {
        FailureReason::Unknown
    }
}

/// Return the round-trip time in milliseconds of the first reply, if any.
///
/// Recognizes `time=12.3 ms` (Unix) as well as `time=12ms` and `time<1ms` (Windows).
pub fn parse_rtt(output: &str) -> Option<f64> {
    let output = output.to_lowercase();
    let start = output
        .find("time=")
        .or_else(|| output.find("time<"))
        .map(|index| index + "time=".len())?;
    let value: String = output[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    value.parse().ok()
}
