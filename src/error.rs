use thiserror::Error;

/// Errors that can occur while managing the pantry or analyzing photos
#[derive(Error, Debug)]
pub enum PantryError {
    /// No pantry or shopping list entry has the given id
    #[error("Item not found: {0}")]
    NotFound(i64),

    /// Item payload failed validation (e.g. a blank name)
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    /// Failed to read or write the pantry file
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to encode or decode the pantry file
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The vision service could not analyze the image
    ///
    /// Distinct from an empty detection result: this means the call itself
    /// failed or returned something we could not understand.
    #[error("Image analysis failed: {0}")]
    AnalysisFailed(String),

    /// The file is not an image type photo analysis accepts
    #[error("Unsupported image type: {0}")]
    UnsupportedImage(String),

    /// Failed to build an HTTP client
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
