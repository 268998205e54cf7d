use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
pub enum GeoKdError {
    #[error("General error: {0}")]
    General(String),

    #[error("Invalid kdtree buffer: {0}")]
    InvalidBuffer(String),

    #[error("Added {added} items when expected {expected}.")]
    ItemCountMismatch { expected: usize, added: usize },
}

pub type Result<T> = std::result::Result<T, GeoKdError>;
