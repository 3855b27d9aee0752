use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use nightly_core::{
    DigestSource, EnrichConfig, FetchConfig, GitHubPublisher, HttpFetcher, PublishConfig, Run, digest_url, yesterday,
};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Extract trending repositories from the Changelog Nightly digest as JSON
#[derive(Parser, Debug)]
#[command(name = "nightly")]
#[command(version)]
#[command(about = "Extract trending repositories from the Changelog Nightly digest", long_about = None)]
struct Args {
    /// Digest day (YYYY-MM-DD, default: yesterday in UTC)
    #[arg(short, long, value_name = "DATE")]
    date: Option<NaiveDate>,

    /// Read the digest from a local HTML file, or "-" for stdin, instead of fetching it
    #[arg(short, long, value_name = "FILE")]
    input: Option<String>,

    /// Output file (default: stdout unless --publish)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Commit the JSON to GitHub (needs GITHUB_OWNER, GITHUB_REPOSITORY, GITHUB_TOKEN)
    #[arg(long)]
    publish: bool,

    /// Skip README screenshot detection
    #[arg(long)]
    no_screenshots: bool,

    /// Maximum README requests in flight
    #[arg(long, default_value = "4", value_name = "NUM")]
    concurrency: usize,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(io::stderr)
        .init();
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else {
        nightly_core::fetch_file(input).with_context(|| format!("Failed to read file: {}", input))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    let started = Instant::now();
    let date = args.date.unwrap_or_else(yesterday);
    let total_steps = if args.publish { 3 } else { 2 };

    let source = match &args.input {
        Some(input) => {
            if args.verbose {
                echo::print_step(1, total_steps, &format!("Reading digest from {}", input.bright_white()));
            }
            let html = read_input(input)?;
            if args.verbose {
                eprintln!("  {} {}", "Size:".dimmed(), echo::format_size(html.len()).bright_white());
            }
            DigestSource::Html(html)
        }
        None => {
            if args.verbose {
                echo::print_step(
                    1,
                    total_steps,
                    &format!("Fetching digest from {}", digest_url(date).bright_white().underline()),
                );
            }
            DigestSource::Remote
        }
    };

    let fetch_config = FetchConfig {
        timeout: args.timeout,
        user_agent: args.user_agent.clone().unwrap_or_else(|| FetchConfig::default().user_agent),
    };
    let fetcher = HttpFetcher::new(fetch_config).context("Failed to build HTTP client")?;

    let enrich = (!args.no_screenshots).then_some(EnrichConfig { concurrency: args.concurrency });
    let mut run = Run::new(Arc::new(fetcher.clone()))
        .date(date)
        .source(source)
        .enrich(enrich)
        .pretty(args.pretty);

    if args.publish {
        let config = PublishConfig::from_env().context("Publishing is not configured")?;
        run = run.publisher(Arc::new(GitHubPublisher::new(fetcher.client().clone(), config)));
    }

    if args.verbose {
        echo::print_step(2, total_steps, "Extracting repositories and screenshots");
    }

    let report = run.execute().await.context("Run failed")?;

    if args.verbose {
        echo::print_run_summary(&report);
        echo::print_timing("Run", started.elapsed());
    }

    if let Some(summary) = report.enrichment {
        if summary.failed > 0 {
            echo::print_warning(&format!("{} README(s) could not be read", summary.failed));
        }
    }

    if let Some(path) = &report.published_to {
        if args.verbose {
            echo::print_step(3, total_steps, "Publishing");
        }
        echo::print_success(&format!("Published {}", path.bright_white()));
    }

    match args.output {
        Some(path) => {
            fs::write(&path, &report.json).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None if !args.publish => {
            println!("{}", report.json);
        }
        None => {}
    }

    Ok(())
}
