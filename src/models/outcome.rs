use serde::Serialize;
use strum::Display;

/// The raw result of a ping invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PingOutput {
    /// Whether the ping utility exited successfully.
    pub success: bool,
    /// Standard output followed by standard error.
    pub output: String,
}

/// Why a ping failed, as reported by the ping utility.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// No reply within the timeout.
    Timeout,
    /// The packet is too large and the DF bit is set.
    FragmentationNeeded,
    /// A host or network unreachable error.
    Unreachable,
    Unknown,
}
