//! Proxy module for probing proxies and gathering candidates
//!
//! This module provides functionality for:
//! - Reading candidate lists and writing results
//! - Checking a proxy by routing a test request through it
//! - Running many checks with a bounded worker pool
//! - Crawling public proxy lists, merging them and keeping the working ones

pub mod checker;
pub mod finder;
pub mod input;
pub mod models;
pub mod runner;
pub mod sources;

pub use checker::{CheckerConfig, Probe, ProxyChecker};
pub use finder::{save_working, ProxyFinder, JSON_OUTPUT, TEXT_OUTPUT};
pub use input::{
    load_candidates, parse_candidates, results_path, save_candidate_list, save_outcomes_json,
};
pub use models::{Candidate, ProbeOutcome, ProbeStatus};
pub use runner::{collect_all, run_all, run_bounded};
pub use sources::{
    default_sources, dedupe_candidates, CrawlResult, CrawlerConfig, ProxyCrawler, ProxySource,
    SourceFormat, FALLBACK_CANDIDATES,
};
