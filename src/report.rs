//! Console reporting for probe runs

use crate::proxy::models::ProbeOutcome;
use futures::{Stream, StreamExt};
use std::io::{self, Write};

/// Everything the reporter saw, in arrival order
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub outcomes: Vec<ProbeOutcome>,
    pub working: usize,
}

impl Report {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// `<working>/<total> working`
    pub fn summary(&self) -> String {
        format!("{}/{} working", self.working, self.total())
    }

    /// Only the working outcomes, keeping arrival order
    pub fn working_outcomes(&self) -> Vec<ProbeOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.is_working())
            .cloned()
            .collect()
    }
}

/// Prints one line per outcome and tallies the run
pub struct Reporter<W: Write> {
    out: W,
    report: Report,
}

impl Reporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            report: Report::default(),
        }
    }

    /// Record one outcome and print its status line
    pub fn record(&mut self, outcome: ProbeOutcome) -> io::Result<()> {
        writeln!(self.out, "{}", outcome)?;
        if outcome.is_working() {
            self.report.working += 1;
        }
        self.report.outcomes.push(outcome);
        Ok(())
    }

    /// Record every outcome of a stream as it arrives
    pub async fn consume<S>(&mut self, outcomes: S) -> io::Result<()>
    where
        S: Stream<Item = ProbeOutcome>,
    {
        futures::pin_mut!(outcomes);
        while let Some(outcome) = outcomes.next().await {
            self.record(outcome)?;
        }
        Ok(())
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    /// Hand back the collected report and the writer
    pub fn finish(self) -> (Report, W) {
        (self.report, self.out)
    }
}
