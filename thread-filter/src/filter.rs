use extractor_core::text::char_len;
use extractor_core::{CommentFields, FilterConfig};
use serde_json::Value;
use std::fmt;

/// Listing kind of a regular comment. Other kinds (`more` stubs) are skipped.
pub const COMMENT_KIND: &str = "t1";

const AUTOMODERATOR: &str = "automoderator";
const DELETED: &str = "[deleted]";
const REMOVED: &str = "[removed]";

/// First exclusion rule a comment tripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    AutoModerator,
    StickiedModerator,
    EmptyOrDeleted,
    LowScore,
    ShortAndLowScore,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            RejectReason::AutoModerator => "automoderator",
            RejectReason::StickiedModerator => "stickied moderator post",
            RejectReason::EmptyOrDeleted => "empty, deleted or removed",
            RejectReason::LowScore => "score below minimum",
            RejectReason::ShortAndLowScore => "short with low score",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Reject(RejectReason),
}

impl Verdict {
    pub fn is_keep(self) -> bool {
        self == Verdict::Keep
    }
}

/// Rules are checked in a fixed order and the first match wins.
pub fn verdict(comment: &CommentFields, config: &FilterConfig) -> Verdict {
    let author = comment.author.to_lowercase();

    if author == AUTOMODERATOR {
        return Verdict::Reject(RejectReason::AutoModerator);
    }
    // Pinned posts from accounts named like "...mod" are treated as
    // moderator announcements. Matches the name only, no mod flag.
    if comment.stickied && author.ends_with("mod") {
        return Verdict::Reject(RejectReason::StickiedModerator);
    }
    if comment.body.is_empty() || comment.body == DELETED || comment.body == REMOVED {
        return Verdict::Reject(RejectReason::EmptyOrDeleted);
    }
    if comment.score < config.min_score {
        return Verdict::Reject(RejectReason::LowScore);
    }
    if char_len(&comment.body) < config.min_length && comment.score < config.high_score_keep_short {
        return Verdict::Reject(RejectReason::ShortAndLowScore);
    }
    Verdict::Keep
}

/// Quality gate applied to every comment the walker visits.
pub trait CommentFilter {
    fn keep_fields(&self, comment: &CommentFields) -> bool;

    /// Same decision on the raw `data` object of a `t1` child.
    fn keep(&self, comment_data: &Value) -> bool {
        self.keep_fields(&CommentFields::from_data(comment_data))
    }
}

impl CommentFilter for FilterConfig {
    fn keep_fields(&self, comment: &CommentFields) -> bool {
        verdict(comment, self).is_keep()
    }
}

/// `keep(comment_raw, min_score, min_length, high_score_keep_short)` with
/// the thresholds spelled out.
pub fn keep(
    comment_data: &Value,
    min_score: i64,
    min_length: usize,
    high_score_keep_short: i64,
) -> bool {
    FilterConfig {
        min_score,
        min_length,
        high_score_keep_short,
    }
    .keep(comment_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn comment(author: &str, score: i64, body: &str) -> Value {
        json!({"author": author, "score": score, "body": body})
    }

    #[test]
    fn test_automoderator_is_rejected_case_insensitively() {
        for author in ["AutoModerator", "automoderator", "AUTOMODERATOR"] {
            assert!(!keep(&comment(author, 500, "A perfectly long comment body"), 1, 10, 20));
        }
    }

    #[test]
    fn test_stickied_mod_suffix_is_rejected() {
        let mut data = comment("SubredditMod", 50, "Please read the rules before posting");
        data["stickied"] = json!(true);
        let fields = CommentFields::from_data(&data);
        assert_eq!(
            verdict(&fields, &FilterConfig::default()),
            Verdict::Reject(RejectReason::StickiedModerator)
        );

        // same author, not pinned
        data["stickied"] = json!(false);
        assert!(keep(&data, 1, 10, 20));

        // pinned, but the name does not end in "mod"
        let mut pinned = comment("moderator_bob", 50, "Please read the rules before posting");
        pinned["stickied"] = json!(true);
        assert!(keep(&pinned, 1, 10, 20));
    }

    #[test]
    fn test_deleted_removed_and_empty_never_kept() {
        for body in ["[deleted]", "[removed]", "", "   \n\t "] {
            for score in [-5, 0, 1, 20, 10_000] {
                assert!(!keep(&comment("user", score, body), i64::MIN, 0, i64::MIN));
            }
        }
        // markers only match exactly
        assert!(keep(&comment("user", 5, "[deleted] by the author, sorry"), 1, 10, 20));
    }

    #[test]
    fn test_score_below_minimum_never_kept() {
        let data = comment("user", 4, "Long enough body to pass the length rule");
        assert!(!keep(&data, 5, 0, 0));
        assert!(keep(&data, 4, 0, 0));
    }

    #[test]
    fn test_short_low_score_rule_flips_on_either_bound() {
        // 5 chars < 10 and score 10 < 20
        assert!(!keep(&comment("user", 10, "short"), 1, 10, 20));
        // score reaches the exemption, length unchanged
        assert!(keep(&comment("user", 20, "short"), 1, 10, 20));
        // body reaches min_length, score unchanged
        assert!(keep(&comment("user", 10, "short body"), 1, 10, 20));

        assert!(keep(&comment("user", 30, "ok"), 1, 10, 20));
    }

    #[test]
    fn test_body_length_counts_normalized_characters() {
        // 11 chars once the run of spaces is squeezed
        let data = comment("user", 1, "héllo    wörld");
        assert_eq!(CommentFields::from_data(&data).body, "héllo wörld");
        assert!(keep(&data, 1, 11, 20));
        assert!(!keep(&data, 1, 12, 20));
    }

    #[test]
    fn test_rule_precedence() {
        let config = FilterConfig {
            min_score: 100,
            min_length: 100,
            high_score_keep_short: 100,
        };
        let fields = CommentFields::from_data(&comment("AutoModerator", 0, "[removed]"));
        assert_eq!(
            verdict(&fields, &config),
            Verdict::Reject(RejectReason::AutoModerator)
        );
        let fields = CommentFields::from_data(&comment("user", 0, "[removed]"));
        assert_eq!(
            verdict(&fields, &config),
            Verdict::Reject(RejectReason::EmptyOrDeleted)
        );
        let fields = CommentFields::from_data(&comment("user", 0, "hi"));
        assert_eq!(verdict(&fields, &config), Verdict::Reject(RejectReason::LowScore));
        assert_eq!(RejectReason::LowScore.to_string(), "score below minimum");
    }
}
