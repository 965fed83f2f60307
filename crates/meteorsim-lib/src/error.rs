use thiserror::Error;

/// Convenient result alias for the MeteorSim library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or out-of-domain numeric input (non-positive diameter,
    /// negative velocity, non-finite values).
    #[error("invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// Raised when the reference-location table contains no entries.
    #[error("reference location table is empty")]
    NoReferenceData,

    /// Raised when a reference-location key is not in the table.
    #[error("unknown reference location: {key}")]
    UnknownLocation { key: String },

    /// Raised when the upstream catalog or an enrichment service is
    /// unreachable, timed out, or returned a non-success status.
    #[error("upstream catalog unavailable: {message}")]
    UpstreamUnavailable { message: String },

    /// Raised when a catalog record is missing fields that normalization
    /// cannot default, or its body cannot be decoded.
    #[error("malformed upstream data for '{id}': {message}")]
    MalformedUpstreamData { id: String, message: String },
}

impl Error {
    /// Shorthand constructor for [`Error::InvalidParameter`].
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            message: message.into(),
        }
    }
}
