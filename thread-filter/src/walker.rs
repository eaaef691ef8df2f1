//! Depth-first flattening of a nested reply tree.
//!
//! The walk keeps its own stack of sibling iterators instead of recursing, so
//! a deep thread cannot exhaust the call stack. Comments come out in pre-order
//! (parent before children, siblings in payload order) and keep the `depth`
//! the payload reports for them.

use crate::filter::{CommentFilter, COMMENT_KIND};
use extractor_core::fields::{children_of, data_of};
use extractor_core::{Comment, CommentFields};
use serde_json::Value;
use std::slice;
use tracing::{debug, trace, warn};

/// Reply levels the walker descends before ignoring deeper replies.
pub const MAX_NESTING: usize = 512;

/// Flattens `roots` (the children of a comment listing) into at most
/// `max_comments` kept comments.
///
/// A rejected comment is left out but its replies are still visited. Once the
/// cap is reached the walk stops entirely. Children whose kind is not `t1`
/// are skipped together with anything below them.
pub fn flatten_comments<F>(roots: &[Value], filter: &F, max_comments: usize) -> Vec<Comment>
where
    F: CommentFilter + ?Sized,
{
    let mut kept: Vec<Comment> = Vec::new();
    let mut visited = 0usize;
    let mut stack: Vec<slice::Iter<'_, Value>> = vec![roots.iter()];

    while let Some(siblings) = stack.last_mut() {
        if kept.len() >= max_comments {
            debug!("Comment cap of {} reached, stopping walk", max_comments);
            break;
        }
        let Some(item) = siblings.next() else {
            stack.pop();
            continue;
        };

        if item.get("kind").and_then(Value::as_str) != Some(COMMENT_KIND) {
            continue;
        }
        visited += 1;

        let data = data_of(item);
        let fields = CommentFields::from_data(data);
        if filter.keep_fields(&fields) {
            kept.push(fields.into());
        } else {
            trace!("Dropping comment {}", fields.id);
        }

        // "replies" is "" when there are none
        let Some(replies) = data.get("replies").filter(|r| r.is_object()) else {
            continue;
        };
        if stack.len() >= MAX_NESTING {
            warn!(
                "Reply nesting deeper than {} levels below comment {}, skipping replies",
                MAX_NESTING,
                str_id(data)
            );
            continue;
        }
        stack.push(children_of(replies).iter());
    }

    debug!("Visited {} comments, kept {}", visited, kept.len());
    kept
}

fn str_id(data: &Value) -> &str {
    data.get("id").and_then(Value::as_str).unwrap_or("?")
}
