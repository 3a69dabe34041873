//! Proxy checker module for checking proxy validity

use crate::error::Error;
use crate::proxy::models::{Candidate, ProbeOutcome};
use crate::proxy::runner;
use async_trait::async_trait;
use futures::Stream;
use reqwest::{Client, Proxy as ReqwestProxy, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default timeout for proxy checks in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default number of concurrent checks
const DEFAULT_CONCURRENCY: usize = 10;

/// Default URL to test proxies against
const DEFAULT_TEST_URL: &str = "http://httpbin.org/ip";

/// User agent sent with every probe
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Something that can classify a single candidate.
///
/// Implementations must never fail: every error ends up inside the returned
/// outcome.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, candidate: &str) -> ProbeOutcome;
}

/// Configuration for proxy checker
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Timeout for each proxy check
    pub timeout: Duration,
    /// Number of concurrent checks
    pub concurrency: usize,
    /// URL to test proxies against
    pub test_url: String,
    /// User agent for the test request
    pub user_agent: String,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
            test_url: DEFAULT_TEST_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CheckerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_test_url(mut self, url: String) -> Self {
        self.test_url = url;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Body returned by httpbin-style `/ip` endpoints
#[derive(Debug, Deserialize)]
struct OriginResponse {
    origin: String,
}

/// Proxy checker for validating proxies
#[derive(Debug, Clone, Default)]
pub struct ProxyChecker {
    config: CheckerConfig,
}

impl ProxyChecker {
    /// Create a new proxy checker with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new proxy checker with custom configuration
    pub fn with_config(config: CheckerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Check a single proxy
    pub async fn check_proxy(&self, candidate: &str) -> ProbeOutcome {
        let outcome = match self.try_check(candidate).await {
            Ok((elapsed, real_ip)) => {
                ProbeOutcome::working(candidate.to_string(), elapsed.as_secs_f64(), real_ip)
            }
            Err(e) => ProbeOutcome::failed(candidate.to_string(), e.to_string()),
        };
        debug!(proxy = candidate, working = outcome.is_working(), "probe finished");
        outcome
    }

    /// Check many proxies, yielding outcomes as they complete
    pub fn check_proxies(
        &self,
        candidates: Vec<Candidate>,
    ) -> impl Stream<Item = ProbeOutcome> + Send + 'static {
        let concurrency = self.config.concurrency;
        runner::run_all(candidates, concurrency, Arc::new(self.clone()))
    }

    async fn try_check(&self, candidate: &str) -> Result<(Duration, Option<String>), Error> {
        let client = self.create_client(candidate)?;

        let start = Instant::now();
        let fetch = async {
            let response = client.get(&self.config.test_url).send().await?;
            let status = response.status();
            if status != StatusCode::OK {
                return Err(Error::UnexpectedStatus(status.as_u16()));
            }
            Ok::<_, Error>(response.bytes().await?)
        };
        let body = tokio::time::timeout(self.config.timeout, fetch)
            .await
            .map_err(|_| Error::Timeout(self.config.timeout))??;
        let elapsed = start.elapsed();

        let real_ip = match parse_origin(&body) {
            Ok(origin) => Some(origin),
            Err(e) => {
                debug!(proxy = candidate, error = %e, "no origin in response");
                None
            }
        };

        Ok((elapsed, real_ip))
    }

    /// Create a reqwest client routing HTTP and HTTPS through the candidate.
    ///
    /// HTTPS goes through the `http://` proxy URL as well.
    fn create_client(&self, candidate: &str) -> Result<Client, Error> {
        let proxy_url = format!("http://{}", candidate);

        let client = Client::builder()
            .proxy(ReqwestProxy::http(&proxy_url)?)
            .proxy(ReqwestProxy::https(&proxy_url)?)
            .timeout(self.config.timeout)
            .user_agent(&self.config.user_agent)
            .build()?;

        Ok(client)
    }
}

#[async_trait]
impl Probe for ProxyChecker {
    async fn probe(&self, candidate: &str) -> ProbeOutcome {
        self.check_proxy(candidate).await
    }
}

fn parse_origin(body: &[u8]) -> Result<String, Error> {
    serde_json::from_slice::<OriginResponse>(body)
        .map(|r| r.origin)
        .map_err(|e| Error::ResponseParse(e.to_string()))
}
