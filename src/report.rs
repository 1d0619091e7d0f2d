//! Human-readable summaries and CSV output of sweep results.
use std::fmt::{Display, Formatter};
use std::io::Write;

use anyhow::Result;

use crate::sweep::SweepResult;

/// Summary of a single-interface sweep.
pub struct Summary<'a>(pub &'a SweepResult);

impl Display for Summary<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let result = self.0;
        let statistics = &result.statistics;
        writeln!(f, "Summary:")?;
        writeln!(f, "Successful pings for sizes: {:?}", result.successes)?;
        writeln!(f, "Failed pings for sizes: {:?}", result.failures)?;
        writeln!(f, "Total pings sent: {}", statistics.sent)?;
        writeln!(f, "Total pings lost: {}", statistics.lost)?;
        writeln!(f, "Success rate: {:.2}%", statistics.success_rate())?;
        write!(f, "Loss rate: {:.2}%", statistics.loss_rate())?;
        if let (Some(size), Some(mtu)) = (result.largest_success(), result.path_mtu_estimate()) {
            write!(
                f,
                "\nLargest successful size: {} bytes (path MTU estimate: {} bytes)",
                size, mtu
            )?;
        }
        Ok(())
    }
}

/// Consolidated results of the dual-interface test.
pub struct FinalResults<'a>(pub &'a [SweepResult]);

impl Display for FinalResults<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Final Results:")?;
        for result in self.0 {
            write!(f, "\n\n{}:", result.label)?;
            write!(f, "\nSuccessful pings: {:?}", result.successes)?;
            write!(f, "\nFailed pings: {:?}", result.failures)?;
        }
        Ok(())
    }
}

/// Write one CSV row per ping sent, with a header row.
pub fn write_csv<W: Write>(output: W, results: &[SweepResult]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(output);
    for record in results.iter().flat_map(|result| &result.records) {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
