use std::fmt::{Display, Formatter};
use std::time::Duration;

/// The specification for a single ping invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Probe {
    /// Host name or address to ping.
    pub target: String,
    /// ICMP payload size in bytes.
    pub size: u16,
    /// Number of echo requests sent by the invocation.
    pub count: u32,
    /// Set the "do not fragment" bit.
    pub no_fragment: bool,
    /// Interface name or source address to send from.
    pub interface: Option<String>,
    /// Time to wait for each reply.
    pub timeout: Duration,
}

impl Probe {
    /// The interface to bind to, ignoring empty names.
    pub fn interface(&self) -> Option<&str> {
        self.interface.as_deref().filter(|iface| !iface.is_empty())
    }
}

impl Display for Probe {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "target={} size={} count={} no_fragment={} interface={}",
            self.target,
            self.size,
            self.count,
            self.no_fragment,
            self.interface().unwrap_or("*")
        )
    }
}
