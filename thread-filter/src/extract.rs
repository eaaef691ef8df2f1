use crate::output::thread_stats;
use crate::walker::flatten_comments;
use extractor_core::fields::{children_of, data_of};
use extractor_core::{ExtractConfig, ExtractionError, Post, Thread, ThreadMetadata};
use serde_json::Value;
use tracing::{debug, info};

/// Splits a raw payload into its post listing and comment listing.
fn listings(payload: &Value) -> Result<(&Value, &Value), ExtractionError> {
    match payload.as_array().map(Vec::as_slice) {
        Some([post_listing, comment_listing, ..]) => Ok((post_listing, comment_listing)),
        _ => Err(ExtractionError::malformed("expected 2-item list")),
    }
}

/// Builds the filtered thread record from a fetched payload.
pub fn extract_thread(payload: &Value, config: &ExtractConfig) -> Result<Thread, ExtractionError> {
    let (post_listing, comment_listing) = listings(payload)?;

    let post = children_of(post_listing)
        .first()
        .map(|child| Post::from_data(data_of(child)))
        .ok_or(ExtractionError::EmptyPostListing)?;

    let roots = children_of(comment_listing);
    debug!(
        "Post {} has {} top-level comment entries",
        post.id,
        roots.len()
    );

    let comments = flatten_comments(roots, &config.filter, config.max_comments);
    let stats = thread_stats(&post, &comments);

    info!(
        "Extracted r/{} post {} (created {}): kept {} comments, ~{} tokens",
        post.subreddit,
        post.id,
        post.created_at()
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "unknown".to_string()),
        stats.kept,
        stats.tokens
    );

    Ok(Thread {
        post,
        comments,
        total_comments_kept: stats.kept,
        total_chars: stats.chars,
        total_tokens_estimate: stats.tokens,
        metadata: config
            .include_metadata
            .then(|| ThreadMetadata::from(&config.filter)),
    })
}
