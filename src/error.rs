//! Error types for range search operations.

use thiserror::Error;

use crate::Point;

/// Error variants for range search operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A query was issued before the structure was built.
    #[error("range search structure queried before build()")]
    NotBuilt,

    /// The query corners do not describe a rectangle: a coordinate is NaN or
    /// `bottom_left` is not componentwise `<=` `top_right`.
    #[error("invalid query rectangle: bottom_left {bottom_left:?}, top_right {top_right:?}")]
    InvalidRectangle {
        /// Lower-left corner as supplied by the caller.
        bottom_left: Point,
        /// Upper-right corner as supplied by the caller.
        top_right: Point,
    },
}

/// A specialized Result type for range search operations.
pub type Result<T> = std::result::Result<T, Error>;
