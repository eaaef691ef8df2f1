pub mod extract;
pub mod filter;
pub mod output;
pub mod transcript;
pub mod walker;

pub use extract::extract_thread;
pub use filter::{keep, verdict, CommentFilter, RejectReason, Verdict};
pub use output::{json_filename, load_thread, save_outputs, slugify, OutputOptions};
pub use transcript::render_transcript;
pub use walker::flatten_comments;
