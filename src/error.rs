use thiserror::Error;

/// Result alias for `tickcluster`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned at the configuration and dataset boundary.
///
/// The engines and the event fold never fail; everything here is raised
/// before an engine is constructed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Input was empty.
    #[error("empty input provided")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// Dataset name that does not match any generator.
    #[error("unknown dataset '{0}' (expected smiley, moons, blobs, circles or random)")]
    UnknownDataset(String),
}
