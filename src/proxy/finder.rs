//! Aggregation mode: gather candidates from public lists and keep the ones
//! that work

use crate::proxy::checker::ProxyChecker;
use crate::proxy::input::{save_candidate_list, save_outcomes_json};
use crate::proxy::models::Candidate;
use crate::proxy::sources::{ProxyCrawler, ProxySource, FALLBACK_CANDIDATES};
use crate::report::{Report, Reporter};
use crate::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// JSON file holding the working outcomes
pub const JSON_OUTPUT: &str = "working_proxies.json";

/// Plain list of working candidates, one per line
pub const TEXT_OUTPUT: &str = "working_proxies.txt";

/// Crawls proxy lists and checks the merged candidates
#[derive(Debug, Clone)]
pub struct ProxyFinder {
    crawler: ProxyCrawler,
    checker: ProxyChecker,
    fallback: Vec<Candidate>,
}

impl ProxyFinder {
    pub fn new(crawler: ProxyCrawler, checker: ProxyChecker) -> Self {
        Self {
            crawler,
            checker,
            fallback: FALLBACK_CANDIDATES.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Replace the candidates tested when no source produced any
    pub fn with_fallback(mut self, fallback: Vec<Candidate>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn fallback(&self) -> &[Candidate] {
        &self.fallback
    }

    /// Crawl `sources`, check every unique candidate and report each result
    /// to `out` as it arrives.
    pub async fn find_working_proxies<W: Write>(
        &self,
        sources: Vec<ProxySource>,
        out: &mut W,
    ) -> Result<Report> {
        writeln!(out, "Fetching proxy lists from sources...")?;
        let mut proxies = self.crawler.aggregate(sources, out).await?;
        writeln!(out, "\nCollected {} unique proxies", proxies.len())?;

        if proxies.is_empty() {
            writeln!(out, "No proxies found from sources. Using test proxies...")?;
            proxies.extend(self.fallback.iter().cloned());
        }

        writeln!(out, "Testing {} proxies...", proxies.len())?;
        info!(count = proxies.len(), "testing aggregated proxies");

        let mut reporter = Reporter::new(&mut *out);
        reporter.consume(self.checker.check_proxies(proxies)).await?;
        let (report, _) = reporter.finish();

        writeln!(out, "\n{}", report.summary())?;
        writeln!(out, "Found {} working proxies", report.working)?;
        Ok(report)
    }
}

/// Write the working outcomes of `report` into `dir` as
/// `working_proxies.json` and `working_proxies.txt`
pub fn save_working<P: AsRef<Path>>(report: &Report, dir: P) -> Result<(PathBuf, PathBuf)> {
    let dir = dir.as_ref();
    let json_path = dir.join(JSON_OUTPUT);
    let text_path = dir.join(TEXT_OUTPUT);

    let working = report.working_outcomes();
    save_outcomes_json(&working, &json_path)?;
    save_candidate_list(&working, &text_path)?;

    Ok((json_path, text_path))
}
