use anyhow::{Context, Result};
use clap::Parser;
use extractor_core::{ExtractConfig, FilterConfig};
use reddit_client::{FetchConfig, RetryConfig, USER_AGENT};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use thread_filter::OutputOptions;

pub const DEFAULT_OUT_DIR: &str = "Output";

#[derive(Parser, Debug)]
#[command(
    name = "thread-extractor",
    version,
    about = "Extract compact Reddit thread data"
)]
pub struct Cli {
    #[arg(long, conflicts_with = "url_file", help = "Single Reddit thread URL")]
    pub url: Option<String>,

    #[arg(long, help = "File with Reddit URLs, one per line")]
    pub url_file: Option<PathBuf>,

    #[arg(
        long,
        env = "THREAD_EXTRACTOR_OUT_DIR",
        default_value = DEFAULT_OUT_DIR,
        help = "Output directory path"
    )]
    pub out_dir: PathBuf,

    #[arg(long, default_value_t = 500)]
    pub max_comments: usize,

    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub min_score: i64,

    #[arg(long, default_value_t = false)]
    pub include_metadata: bool,

    #[arg(long, default_value_t = 15)]
    pub min_comment_length: usize,

    #[arg(long, default_value_t = 20, allow_negative_numbers = true)]
    pub high_score_keep_short: i64,

    #[arg(
        long,
        default_value_t = false,
        help = "Do not prompt for URL when neither --url nor --url-file is provided"
    )]
    pub no_prompt: bool,

    #[arg(long, default_value_t = false, help = "Also write a plain-text transcript")]
    pub transcript: bool,

    #[arg(long, env = "THREAD_EXTRACTOR_MAX_RETRIES", default_value_t = 4)]
    pub max_retries: u32,

    #[arg(long, env = "THREAD_EXTRACTOR_TIMEOUT_SECS", default_value_t = 20)]
    pub timeout_secs: u64,
}

impl Cli {
    pub fn extract_config(&self) -> ExtractConfig {
        ExtractConfig {
            max_comments: self.max_comments,
            filter: FilterConfig {
                min_score: self.min_score,
                min_length: self.min_comment_length,
                high_score_keep_short: self.high_score_keep_short,
            },
            include_metadata: self.include_metadata,
        }
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            user_agent: USER_AGENT.to_string(),
            timeout: Duration::from_secs(self.timeout_secs),
            retry: RetryConfig {
                max_retries: self.max_retries,
                ..Default::default()
            },
        }
    }

    pub fn output_options(&self) -> OutputOptions {
        OutputOptions {
            transcript: self.transcript,
        }
    }
}

/// Non-blank lines that are not `#` comments, trimmed.
pub fn parse_url_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Resolves the URLs to process: `--url`, then `--url-file`, then an
/// interactive prompt unless `--no-prompt` is set.
pub fn load_urls<R: BufRead, W: Write>(cli: &Cli, mut input: R, mut prompt: W) -> Result<Vec<String>> {
    if let Some(url) = &cli.url {
        return Ok(vec![url.trim().to_string()]);
    }
    if let Some(path) = &cli.url_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read URL file {}", path.display()))?;
        return Ok(parse_url_lines(&text));
    }
    if cli.no_prompt {
        return Ok(Vec::new());
    }

    write!(prompt, "Reddit thread URL: ")?;
    prompt.flush()?;
    let mut line = String::new();
    input.read_line(&mut line).context("failed to read URL from stdin")?;
    let entered = line.trim();
    Ok(if entered.is_empty() {
        Vec::new()
    } else {
        vec![entered.to_string()]
    })
}
