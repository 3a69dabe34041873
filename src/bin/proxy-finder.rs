use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use proxy_checker::{
    default_sources, init_tracing, save_working, CheckerConfig, CrawlerConfig, ProxyChecker,
    ProxyCrawler, ProxyFinder,
};
use std::io;
use std::process::ExitCode;

/// Probes run at the same time while testing aggregated candidates
const FINDER_CONCURRENCY: usize = 20;

/// Fetch proxy lists from public sources and keep the ones that work
#[derive(Parser)]
#[command(name = "proxy-finder")]
#[command(about = "Fetch proxy lists from public sources and test them")]
struct Cli {}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    if let Err(e) = Cli::try_parse() {
        if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
            e.exit()
        }
        println!("{}", e);
        return Ok(ExitCode::FAILURE);
    }

    init_tracing();

    let crawler = ProxyCrawler::with_config(CrawlerConfig::default())?;
    let checker =
        ProxyChecker::with_config(CheckerConfig::new().with_concurrency(FINDER_CONCURRENCY));
    let finder = ProxyFinder::new(crawler, checker);

    let mut stdout = io::stdout();
    let report = finder
        .find_working_proxies(default_sources(), &mut stdout)
        .await?;

    let (json_path, text_path) = save_working(&report, ".")?;
    println!(
        "\nResults saved to {} and {}",
        json_path.display(),
        text_path.display()
    );

    Ok(ExitCode::SUCCESS)
}
