//! Probe the path MTU by sending ICMP echo requests of increasing size
//! with the ping utility of the operating system.
//!
//! Each size in a range is pinged until it reaches a success or a failure
//! threshold. Setting the "do not fragment" bit turns the largest successful
//! size into an estimate of the path MTU.
pub mod command;
pub mod easy;
pub mod logger;
pub mod models;
pub mod parser;
pub mod pinger;
pub mod report;
pub mod sweep;
pub mod utilities;

pub use pinger::*;
pub use sweep::*;
