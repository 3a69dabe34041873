mod common;

use common::{closed_port, spawn_responder};
use proxy_checker::{
    save_working, CheckerConfig, CrawlerConfig, ProbeOutcome, ProxyChecker, ProxyCrawler,
    ProxyFinder, ProxySource, SourceFormat,
};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

const TEST_URL: &str = "http://probe.invalid/ip";

fn crawler() -> ProxyCrawler {
    ProxyCrawler::with_config(CrawlerConfig::new().with_timeout(Duration::from_secs(5))).unwrap()
}

fn finder(fallback: Vec<String>) -> ProxyFinder {
    let checker = ProxyChecker::with_config(
        CheckerConfig::new()
            .with_timeout(Duration::from_secs(5))
            .with_test_url(TEST_URL.to_string()),
    );
    ProxyFinder::new(crawler(), checker).with_fallback(fallback)
}

fn source(name: &str, addr: std::net::SocketAddr, format: SourceFormat) -> ProxySource {
    ProxySource::new(name, &format!("http://{}/list", addr), format)
}

#[tokio::test]
async fn test_duplicate_lists_merge_to_one_candidate() {
    let a = spawn_responder(200, "1.1.1.1:80\n1.1.1.1:80\n");
    let b = spawn_responder(200, "1.1.1.1:80\n1.1.1.1:80\n");

    let crawler = crawler();
    let results = crawler
        .crawl_sources_with_results(vec![
            source("a", a, SourceFormat::PlainText),
            source("b", b, SourceFormat::PlainText),
        ])
        .await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.is_success()));
    assert_eq!(crawler.merge_results(&results), vec!["1.1.1.1:80".to_string()]);
}

#[tokio::test]
async fn test_failed_sources_contribute_nothing() {
    let good = spawn_responder(
        200,
        r#"[{"ip":"2.2.2.2","port":"8080"},{"ip":"3.3.3.3","port":"3128"}]"#,
    );
    let unavailable = spawn_responder(503, "");
    let dead = closed_port();

    let crawler = crawler();
    let results = crawler
        .crawl_sources_with_results(vec![
            source("good", good, SourceFormat::ProxyListDownload),
            source("unavailable", unavailable, SourceFormat::PlainText),
            source("dead", dead, SourceFormat::PlainText),
        ])
        .await;

    assert_eq!(results.len(), 3);
    let failed: Vec<_> = results.iter().filter(|r| !r.is_success()).collect();
    assert_eq!(failed.len(), 2);
    let unavailable = results.iter().find(|r| r.source == "unavailable").unwrap();
    assert_eq!(unavailable.error.as_deref(), Some("unavailable: HTTP 503"));

    let mut merged = crawler.merge_results(&results);
    merged.sort();
    assert_eq!(merged, vec!["2.2.2.2:8080", "3.3.3.3:3128"]);
}

#[tokio::test]
async fn test_html_source_is_scraped() {
    let page = spawn_responder(
        200,
        "<table><tr><td>9.9.9.9:8080</td></tr><tr><td>300.1.1.1:80</td></tr></table>",
    );
    let candidates = crawler()
        .crawl_source(&source("page", page, SourceFormat::Html))
        .await
        .unwrap();
    assert_eq!(candidates, vec!["9.9.9.9:8080"]);
}

#[tokio::test]
async fn test_status_lines_stream_per_source() {
    let good = spawn_responder(200, "4.4.4.4:80\n5.5.5.5:80\n");
    let unavailable = spawn_responder(503, "");

    let mut out = Vec::new();
    let mut merged = crawler()
        .aggregate(
            vec![
                source("good", good, SourceFormat::PlainText),
                source("unavailable", unavailable, SourceFormat::PlainText),
            ],
            &mut out,
        )
        .await
        .unwrap();
    merged.sort();

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("✓ good: Found 2 proxies"));
    assert!(printed.contains("✗ unavailable: HTTP 503"));
    assert_eq!(merged, vec!["4.4.4.4:80", "5.5.5.5:80"]);
}

#[tokio::test]
async fn test_finder_falls_back_when_every_source_fails() {
    let unavailable = spawn_responder(503, "");
    let dead = closed_port();
    let good = spawn_responder(200, r#"{"origin":"1.2.3.4"}"#).to_string();
    let forbidden = spawn_responder(403, "").to_string();

    let mut out = Vec::new();
    let report = finder(vec![good.clone(), forbidden.clone()])
        .find_working_proxies(
            vec![
                source("unavailable", unavailable, SourceFormat::PlainText),
                source("dead", dead, SourceFormat::PlainText),
            ],
            &mut out,
        )
        .await
        .unwrap();

    assert_eq!(report.total(), 2);
    assert_eq!(report.working, 1);
    let mut tested: Vec<_> = report.outcomes.iter().map(|o| o.proxy.clone()).collect();
    tested.sort();
    let mut expected = vec![good, forbidden];
    expected.sort();
    assert_eq!(tested, expected);

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Collected 0 unique proxies"));
    assert!(printed.contains("Using test proxies"));
    assert!(printed.contains("1/2 working"));
}

#[tokio::test]
async fn test_finder_checks_shared_candidates_once() {
    let proxy = spawn_responder(200, r#"{"origin":"1.2.3.4"}"#).to_string();
    let list = format!("{}\n{}\n", proxy, proxy);
    let a = spawn_responder(200, list.clone());
    let b = spawn_responder(200, list);

    let mut out = Vec::new();
    let report = finder(Vec::new())
        .find_working_proxies(
            vec![
                source("a", a, SourceFormat::PlainText),
                source("b", b, SourceFormat::PlainText),
            ],
            &mut out,
        )
        .await
        .unwrap();

    assert_eq!(report.total(), 1);
    assert_eq!(report.outcomes[0].proxy, proxy);
    assert!(report.outcomes[0].is_working());

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Collected 1 unique proxies"));
    assert!(!printed.contains("Using test proxies"));
}

#[tokio::test]
async fn test_finder_saves_only_working_outcomes() {
    let good = spawn_responder(200, r#"{"origin":"1.2.3.4"}"#).to_string();
    let forbidden = spawn_responder(403, "").to_string();
    let dead = closed_port().to_string();
    let list = spawn_responder(200, format!("{}\n{}\n{}\n", good, forbidden, dead));

    let mut out = Vec::new();
    let report = finder(Vec::new())
        .find_working_proxies(vec![source("list", list, SourceFormat::PlainText)], &mut out)
        .await
        .unwrap();
    assert_eq!(report.total(), 3);

    let dir = tempdir().unwrap();
    let (json_path, text_path) = save_working(&report, dir.path()).unwrap();

    let saved: Vec<ProbeOutcome> =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].proxy, good);
    assert_eq!(saved[0].real_ip(), Some("1.2.3.4"));
    assert_eq!(fs::read_to_string(&text_path).unwrap(), format!("{}\n", good));
}
