use extractor_core::{ErrorExt, ExtractConfig, ExtractionError};
use reddit_client::{HttpTransport, Sleeper, ThreadFetcher};
use std::io::Write;
use std::path::PathBuf;
use thread_filter::{extract_thread, save_outputs, OutputOptions};
use tracing::{error, info, warn};

/// Where and how each extracted thread is written.
#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub extract: ExtractConfig,
    pub out_dir: PathBuf,
    pub output: OutputOptions,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    /// 0 when every thread was written, 1 when any failed.
    pub fn exit_code(&self) -> u8 {
        if self.failed > 0 {
            1
        } else {
            0
        }
    }
}

async fn process_url<T: HttpTransport, S: Sleeper>(
    fetcher: &mut ThreadFetcher<T, S>,
    url: &str,
    settings: &BatchSettings,
) -> Result<Vec<PathBuf>, ExtractionError> {
    let payload = fetcher.fetch_thread_json(url).await?;
    let thread = extract_thread(&payload, &settings.extract)?;
    save_outputs(&thread, &settings.out_dir, &settings.output)
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Processes URLs one after another. A failing URL is reported and the batch
/// moves on to the next one.
pub async fn run_batch<T, S, O, E>(
    fetcher: &mut ThreadFetcher<T, S>,
    urls: &[String],
    settings: &BatchSettings,
    mut out: O,
    mut err: E,
) -> BatchSummary
where
    T: HttpTransport,
    S: Sleeper,
    O: Write,
    E: Write,
{
    let mut summary = BatchSummary::default();

    for url in urls {
        let outcome = match process_url(fetcher, url, settings).await {
            Ok(paths) => writeln!(out, "OK {} -> {}", url, join_paths(&paths))
                .map_err(ExtractionError::from),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                summary.succeeded += 1;
                info!("Finished {}", url);
            }
            Err(e) => {
                summary.failed += 1;
                e.log_error();
                error!("Skipping {} [{}]", url, e.error_code());
                if let Err(write_error) = writeln!(err, "ERROR {}: {}", url, e) {
                    warn!("Could not report failure for {}: {}", url, write_error);
                }
            }
        }
    }

    summary
}
