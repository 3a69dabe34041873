//! Remote proxy list sources for aggregation mode
//!
//! This module provides functionality for:
//! - Describing third-party proxy list endpoints and their body formats
//! - Fetching several lists concurrently under a small cap
//! - Merging the lists into one deduplicated candidate set

use crate::error::Error;
use crate::proxy::models::Candidate;
use crate::proxy::runner::{collect_all, run_bounded};
use futures::{Stream, StreamExt};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for list downloads in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Number of sources fetched at the same time
const DEFAULT_CONCURRENCY: usize = 5;

/// Candidates kept from each source before merging
const DEFAULT_MAX_PER_SOURCE: usize = 50;

/// Default user agent for list downloads
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Tested when no source produced anything
pub const FALLBACK_CANDIDATES: [&str; 4] = [
    "8.8.8.8:80",
    "1.1.1.1:80",
    "208.67.222.222:80",
    "208.67.220.220:80",
];

/// Regex pattern to match IP:PORT patterns in text
static IP_PORT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}):(\d{1,5})\b")
        .expect("Invalid IP:PORT regex")
});

/// How a source lays out its proxy list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// HTML page with `ip:port` pairs somewhere in the markup
    Html,
    /// JSON array of `{ip, port}` objects, or plain text as a fallback
    ProxyListDownload,
    /// One `ip:port` per line
    PlainText,
}

#[derive(Debug, Deserialize)]
struct ListedProxy {
    ip: String,
    port: serde_json::Value,
}

impl SourceFormat {
    /// Turn a raw response body into candidate strings
    pub fn parse(&self, content: &str) -> Vec<Candidate> {
        match self {
            SourceFormat::Html => extract_ip_ports(content),
            SourceFormat::ProxyListDownload => serde_json::from_str::<Vec<ListedProxy>>(content)
                .map(|listed| {
                    listed
                        .into_iter()
                        .map(|p| match p.port {
                            serde_json::Value::String(port) => format!("{}:{}", p.ip, port),
                            port => format!("{}:{}", p.ip, port),
                        })
                        .collect()
                })
                .unwrap_or_else(|_| colon_lines(content)),
            SourceFormat::PlainText => colon_lines(content),
        }
    }
}

/// Every trimmed, non-empty line containing a `:`
fn colon_lines(content: &str) -> Vec<Candidate> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.contains(':'))
        .map(str::to_string)
        .collect()
}

/// Pull `a.b.c.d:port` pairs out of arbitrary text
fn extract_ip_ports(content: &str) -> Vec<Candidate> {
    IP_PORT_REGEX
        .captures_iter(content)
        .filter_map(|cap| {
            let host = cap.get(1)?.as_str();
            let port: u16 = cap.get(2)?.as_str().parse().ok()?;

            for part in host.split('.') {
                let num: u32 = part.parse().ok()?;
                if num > 255 {
                    return None;
                }
            }

            if port == 0 {
                return None;
            }

            Some(format!("{}:{}", host, port))
        })
        .collect()
}

/// Proxy source representing a website that provides proxy lists
#[derive(Debug, Clone)]
pub struct ProxySource {
    /// Name of the proxy source
    pub name: String,
    /// URL to fetch proxies from
    pub url: String,
    /// Layout of the response body
    pub format: SourceFormat,
}

impl ProxySource {
    pub fn new(name: &str, url: &str, format: SourceFormat) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            format,
        }
    }
}

/// Lists queried by the finder when no other sources are given
pub fn default_sources() -> Vec<ProxySource> {
    vec![
        ProxySource::new(
            "free-proxy-list.net",
            "https://free-proxy-list.net/",
            SourceFormat::Html,
        ),
        ProxySource::new(
            "proxy-list.download HTTP",
            "https://www.proxy-list.download/api/v1/get?type=http",
            SourceFormat::ProxyListDownload,
        ),
        ProxySource::new(
            "proxy-list.download HTTPS",
            "https://www.proxy-list.download/api/v1/get?type=https",
            SourceFormat::ProxyListDownload,
        ),
        ProxySource::new(
            "proxyscrape HTTP",
            "https://api.proxyscrape.com/v2/?request=getproxies&protocol=http&timeout=10000&country=all&ssl=all&anonymity=all",
            SourceFormat::PlainText,
        ),
    ]
}

/// Result of crawling a single source
#[derive(Debug, Clone)]
pub struct CrawlResult {
    /// The source that was crawled
    pub source: String,
    /// Candidates extracted from the source
    pub proxies: Vec<Candidate>,
    /// Error message if crawling failed
    pub error: Option<String>,
}

impl CrawlResult {
    pub fn success(source: String, proxies: Vec<Candidate>) -> Self {
        Self {
            source,
            proxies,
            error: None,
        }
    }

    pub fn failure(source: String, error: String) -> Self {
        Self {
            source,
            proxies: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

impl fmt::Display for CrawlResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            None => write!(f, "✓ {}: Found {} proxies", self.source, self.proxies.len()),
            Some(error) => write!(f, "✗ {}", error),
        }
    }
}

/// Configuration for proxy crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Timeout for HTTP requests
    pub timeout: Duration,
    /// User agent for HTTP requests
    pub user_agent: String,
    /// Number of sources fetched concurrently
    pub concurrency: usize,
    /// Candidates kept from each source
    pub max_per_source: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            max_per_source: DEFAULT_MAX_PER_SOURCE,
        }
    }
}

impl CrawlerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_max_per_source(mut self, max_per_source: usize) -> Self {
        self.max_per_source = max_per_source;
        self
    }
}

/// Proxy crawler for fetching candidate lists from websites
#[derive(Debug, Clone)]
pub struct ProxyCrawler {
    config: CrawlerConfig,
    client: Client,
}

impl ProxyCrawler {
    /// Create a new proxy crawler with default configuration
    pub fn new() -> crate::Result<Self> {
        Self::with_config(CrawlerConfig::default())
    }

    /// Create a new proxy crawler with custom configuration
    pub fn with_config(config: CrawlerConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Fetch and parse candidates from a ProxySource
    pub async fn crawl_source(&self, source: &ProxySource) -> crate::Result<Vec<Candidate>> {
        let response = self
            .client
            .get(&source.url)
            .send()
            .await
            .map_err(|e| Error::source_fetch(&source.name, e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::source_fetch(
                &source.name,
                Error::UnexpectedStatus(status.as_u16()).to_string(),
            ));
        }

        let content = response
            .text()
            .await
            .map_err(|e| Error::source_fetch(&source.name, e.to_string()))?;
        Ok(source.format.parse(&content))
    }

    /// Fetch every source, at most `concurrency` at a time, yielding each
    /// result as soon as its source finishes.
    ///
    /// A failed source is reported in its `CrawlResult` and does not affect
    /// the others.
    pub fn crawl_sources(
        &self,
        sources: Vec<ProxySource>,
    ) -> impl Stream<Item = CrawlResult> + Send + 'static {
        let crawler = Arc::new(self.clone());
        run_bounded(sources, self.config.concurrency, move |source: ProxySource| {
            let crawler = Arc::clone(&crawler);
            async move {
                match crawler.crawl_source(&source).await {
                    Ok(proxies) => {
                        debug!(source = %source.name, count = proxies.len(), "source crawled");
                        CrawlResult::success(source.name, proxies)
                    }
                    Err(e) => {
                        warn!(source = %source.name, error = %e, "source unavailable");
                        CrawlResult::failure(source.name, e.to_string())
                    }
                }
            }
        })
    }

    /// Fetch every source and collect the results in completion order
    pub async fn crawl_sources_with_results(&self, sources: Vec<ProxySource>) -> Vec<CrawlResult> {
        collect_all(self.crawl_sources(sources)).await
    }

    /// Crawl every source and merge the lists into one unordered candidate
    /// set.
    ///
    /// A status line is written to `out` for each source as it completes.
    pub async fn aggregate<W: Write>(
        &self,
        sources: Vec<ProxySource>,
        out: &mut W,
    ) -> io::Result<Vec<Candidate>> {
        let mut results = Vec::new();
        let crawled = self.crawl_sources(sources);
        futures::pin_mut!(crawled);
        while let Some(result) = crawled.next().await {
            writeln!(out, "{}", result)?;
            results.push(result);
        }
        Ok(self.merge_results(&results))
    }

    /// Merge crawl results into one candidate set.
    ///
    /// Each list is cut to `max_per_source` before merging. The merged set is
    /// unordered.
    pub fn merge_results(&self, results: &[CrawlResult]) -> Vec<Candidate> {
        dedupe_candidates(
            results.iter().map(|r| r.proxies.as_slice()),
            self.config.max_per_source,
        )
    }
}

/// Union of the first `max_per_source` entries of every batch, without
/// duplicates. Order is not preserved.
pub fn dedupe_candidates<'a, I>(batches: I, max_per_source: usize) -> Vec<Candidate>
where
    I: IntoIterator<Item = &'a [Candidate]>,
{
    let unique: HashSet<&Candidate> = batches
        .into_iter()
        .flat_map(|batch| batch.iter().take(max_per_source))
        .collect();
    unique.into_iter().cloned().collect()
}
