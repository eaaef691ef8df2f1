use crate::fields::{bool_field, float_field, int_field, str_field};
use crate::text::normalize_whitespace;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub subreddit: String,
    pub title: String,
    pub selftext: String,
    pub author: String,
    pub score: i64,
    pub num_comments: i64,
    pub created_utc: f64,
    pub permalink: String,
    pub url: String,
}

impl Post {
    /// Builds a post from the `data` object of the first post-listing child.
    pub fn from_data(data: &Value) -> Self {
        Self {
            id: str_field(data, "id"),
            subreddit: str_field(data, "subreddit"),
            title: str_field(data, "title"),
            selftext: normalize_whitespace(&str_field(data, "selftext")),
            author: str_field(data, "author"),
            score: int_field(data, "score"),
            num_comments: int_field(data, "num_comments"),
            created_utc: float_field(data, "created_utc"),
            permalink: str_field(data, "permalink"),
            url: str_field(data, "url"),
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.created_utc as i64, 0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub parent_id: String,
    pub depth: u32,
    pub author: String,
    pub score: i64,
    pub created_utc: f64,
    pub body: String,
}

/// Everything the filter and the walker read from one raw `t1` comment,
/// extracted once with lenient coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentFields {
    pub id: String,
    pub parent_id: String,
    pub depth: u32,
    pub author: String,
    pub score: i64,
    pub created_utc: f64,
    pub stickied: bool,
    /// Already whitespace-normalized.
    pub body: String,
}

impl CommentFields {
    pub fn from_data(data: &Value) -> Self {
        Self {
            id: str_field(data, "id"),
            parent_id: str_field(data, "parent_id"),
            depth: int_field(data, "depth").clamp(0, i64::from(u32::MAX)) as u32,
            author: str_field(data, "author"),
            score: int_field(data, "score"),
            created_utc: float_field(data, "created_utc"),
            stickied: bool_field(data, "stickied"),
            body: normalize_whitespace(&str_field(data, "body")),
        }
    }
}

impl From<CommentFields> for Comment {
    fn from(fields: CommentFields) -> Self {
        Self {
            id: fields.id,
            parent_id: fields.parent_id,
            depth: fields.depth,
            author: fields.author,
            score: fields.score,
            created_utc: fields.created_utc,
            body: fields.body,
        }
    }
}

/// Thresholds for the comment quality heuristics.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    pub min_score: i64,
    pub min_length: usize,
    /// Short comments survive when their score reaches this value.
    pub high_score_keep_short: i64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_score: 1,
            min_length: 15,
            high_score_keep_short: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractConfig {
    pub max_comments: usize,
    pub filter: FilterConfig,
    pub include_metadata: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            max_comments: 500,
            filter: FilterConfig::default(),
            include_metadata: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteringMetadata {
    pub min_score: i64,
    pub min_length: usize,
    pub high_score_keep_short: i64,
    pub remove_automoderator: bool,
    pub remove_deleted_or_removed: bool,
    pub remove_empty: bool,
    pub remove_stickied_moderator: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadMetadata {
    pub filtering: FilteringMetadata,
}

impl From<&FilterConfig> for ThreadMetadata {
    fn from(config: &FilterConfig) -> Self {
        Self {
            filtering: FilteringMetadata {
                min_score: config.min_score,
                min_length: config.min_length,
                high_score_keep_short: config.high_score_keep_short,
                remove_automoderator: true,
                remove_deleted_or_removed: true,
                remove_empty: true,
                remove_stickied_moderator: true,
            },
        }
    }
}

/// A post with its filtered, flattened comments and aggregate statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub post: Post,
    pub comments: Vec<Comment>,
    pub total_comments_kept: usize,
    pub total_chars: usize,
    pub total_tokens_estimate: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ThreadMetadata>,
}
