pub mod error;
pub mod error_utils;
pub mod fields;
pub mod text;
pub mod types;

pub use error::*;
pub use error_utils::*;
pub use types::*;
