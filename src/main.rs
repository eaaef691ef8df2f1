mod batch;
mod cli;

use batch::{run_batch, BatchSettings};
use clap::Parser;
use cli::{load_urls, Cli};
use extractor_core::ErrorExt;
use reddit_client::ThreadFetcher;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "thread_extractor=info,reddit_client=info,thread_filter=info";

/// Exit status when the run could not start.
const EXIT_FAILURE: u8 = 1;

/// Exit status when no URL could be resolved at all.
const EXIT_NO_URLS: u8 = 2;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    ExitCode::from(run(&cli, io::stdin().lock(), io::stdout(), io::stderr()))
}

/// Resolves URLs, processes them in order and returns the process exit status.
/// `input` feeds the interactive prompt, `out` gets the prompt and `OK` lines,
/// `err` gets everything reported as a failure.
fn run<R: BufRead, O: Write, E: Write>(cli: &Cli, input: R, mut out: O, mut err: E) -> u8 {
    let urls = match load_urls(cli, input, &mut out) {
        Ok(urls) => urls,
        Err(e) => {
            tracing::error!("Could not load URLs: {:#}", e);
            let _ = writeln!(err, "{:#}", e);
            return EXIT_NO_URLS;
        }
    };
    if urls.is_empty() {
        let _ = writeln!(err, "No URLs provided");
        return EXIT_NO_URLS;
    }

    tracing::info!("Processing {} thread URL(s)", urls.len());

    // One thread at a time; nothing is spawned on this runtime.
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {}", e);
            let _ = writeln!(err, "Failed to start async runtime: {}", e);
            return EXIT_FAILURE;
        }
    };

    let mut fetcher = match ThreadFetcher::new(cli.fetch_config()) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            e.log_error();
            let _ = writeln!(err, "{}", e.user_friendly_message());
            return EXIT_FAILURE;
        }
    };

    let settings = BatchSettings {
        extract: cli.extract_config(),
        out_dir: cli.out_dir.clone(),
        output: cli.output_options(),
    };

    let summary = runtime.block_on(run_batch(&mut fetcher, &urls, &settings, out, err));

    let metrics = fetcher.retry_metrics();
    tracing::info!(
        "Done: {} succeeded, {} failed, {} retries ({:?} spent waiting)",
        summary.succeeded,
        summary.failed,
        metrics.total_retries,
        metrics.total_delay
    );

    summary.exit_code()
}
