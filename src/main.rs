use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use proxy_checker::{
    init_tracing, load_candidates, results_path, save_outcomes_json, CheckerConfig, Error,
    ProxyChecker, Reporter,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;

/// Check every proxy listed in a file and save the results as JSON
#[derive(Parser)]
#[command(name = "proxy-checker")]
#[command(about = "Check proxies listed in a file, one ip:port per line")]
struct Cli {
    /// File containing one proxy per line in format: ip:port
    input: PathBuf,

    /// Number of concurrent checks
    #[arg(short = 'n', long, default_value = "10")]
    threads: usize,

    /// Timeout in seconds
    #[arg(long, default_value = "10")]
    timeout: u64,

    /// URL to test proxies against
    #[arg(long, default_value = "http://httpbin.org/ip")]
    test_url: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            println!("{}", e);
            println!("File should contain one proxy per line in format: ip:port");
            return Ok(ExitCode::FAILURE);
        }
    };

    init_tracing();

    let proxies = match load_candidates(&cli.input) {
        Ok(proxies) => proxies,
        Err(e @ Error::InputNotFound(_)) => {
            println!("Error: {}", e);
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    println!("Loaded {} proxies from {}", proxies.len(), cli.input.display());
    println!("Checking proxies with {} concurrent threads...", cli.threads);

    let config = CheckerConfig::new()
        .with_concurrency(cli.threads)
        .with_timeout(Duration::from_secs(cli.timeout))
        .with_test_url(cli.test_url);
    info!(url = %config.test_url, timeout = ?config.timeout, "starting check");

    let checker = ProxyChecker::with_config(config);
    let mut reporter = Reporter::stdout();
    reporter.consume(checker.check_proxies(proxies)).await?;
    let (report, _) = reporter.finish();

    println!("\nSummary: {}", report.summary());

    let output = results_path(&cli.input);
    save_outcomes_json(&report.outcomes, &output)?;
    println!("\nResults saved to {}", output.display());

    Ok(ExitCode::SUCCESS)
}
