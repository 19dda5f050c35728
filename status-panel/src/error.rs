use thiserror::Error;

/// Raised synchronously while accepting configuration; halts
/// initialisation and is never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PanelError {
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Failure of a single poll cycle.
///
/// Caught at the cycle boundary and converted into the failed display
/// state; the next timer tick retries. None of these propagate to the
/// host.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The request could not complete (DNS, connection, etc.).
    #[error("{0}")]
    Transport(String),

    /// A response arrived but its status was not a success.
    #[error("HTTP error: {0}")]
    HttpStatus(u16),

    /// The response body was not valid JSON.
    #[error("{0}")]
    Decode(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("a panel named \"{0}\" is already registered")]
    Duplicate(String),
}
