//! Data structures for representing probes and their outcomes.
mod outcome;
mod platform;
mod probe;
mod range;
mod record;

pub use outcome::*;
pub use platform::*;
pub use probe::*;
pub use range::*;
pub use record::*;
