use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::{bail, Context, Error, Result};

/// An inclusive range of payload sizes, written `start-end`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SizeRange {
    pub start: u16,
    pub end: u16,
}

impl SizeRange {
    pub fn new(start: u16, end: u16) -> Result<Self> {
        if start > end {
            bail!("Invalid size range: start ({start}) is greater than end ({end})");
        }
        Ok(SizeRange { start, end })
    }

    /// Iterate over `start, start + increment, ...` up to and including `end`.
    pub fn sizes(&self, increment: u16) -> Result<impl Iterator<Item = u16>> {
        if increment == 0 {
            bail!("Size increment must be at least 1");
        }
        Ok((self.start..=self.end).step_by(increment as usize))
    }
}

impl Default for SizeRange {
    fn default() -> Self {
        SizeRange {
            start: 100,
            end: 9100,
        }
    }
}

impl FromStr for SizeRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (start, end) = s
            .split_once('-')
            .with_context(|| format!("Invalid size range `{s}`: expected `start-end`"))?;
        let start = start
            .trim()
            .parse()
            .with_context(|| format!("Invalid range start `{start}`"))?;
        let end = end
            .trim()
            .parse()
            .with_context(|| format!("Invalid range end `{end}`"))?;
        SizeRange::new(start, end)
    }
}

impl Display for SizeRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
