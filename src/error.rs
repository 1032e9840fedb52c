use thiserror::Error;

/// Errors produced by [`SongWriter`](crate::songwriter::SongWriter) and its
/// generator seam.
///
/// The extraction engine itself never fails; everything here belongs to the
/// request around it.
#[derive(Error, Debug)]
pub enum ComposeError {
    /// The generator returned no output records at all.
    #[error("generator '{generator}' returned no output")]
    NoOutput { generator: String },

    /// The injected generator failed.
    #[error("generator '{generator}' failed: {message}")]
    Generation { generator: String, message: String },

    /// Invalid configuration detected before generation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Catch-all for other errors.
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for ComposeError {
    fn from(err: anyhow::Error) -> Self {
        ComposeError::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ComposeError>;
