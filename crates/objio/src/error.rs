//! Error types for objio

use crate::multi_error::MultiError;
use thiserror::Error;

/// Boxed error produced by a remote backend, propagated verbatim
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Core error types for the objio library
#[derive(Error, Debug)]
pub enum Error {
    /// The URI could not be parsed
    #[error("invalid object uri: {0}")]
    Parse(#[from] url::ParseError),

    /// The URI scheme selects no known backend
    #[error("unsupported object uri scheme '{0}'")]
    UnsupportedScheme(String),

    /// A local URI named a host other than the local machine
    #[error("unsupported file object host '{0}'")]
    UnsupportedHost(String),

    /// A store option needed by the URI was not supplied
    #[error("{0} required")]
    OptionRequired(&'static str),

    /// The remote object does not exist
    #[error("object not found: {0}")]
    NotFound(String),

    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Remote backend failure
    #[error("remote error: {0}")]
    Remote(#[source] BoxError),

    /// One or more layers failed to close
    #[error("close failed: {0}")]
    Close(#[from] MultiError),

    /// Configuration-related error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap any backend error without altering it
    pub fn remote<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Remote(err.into())
    }

    /// Whether this error means the object does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound(_) => true,
            Error::Io(err) => err.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(io_err) => io_err,
            Error::NotFound(path) => std::io::Error::new(std::io::ErrorKind::NotFound, path),
            other => std::io::Error::new(std::io::ErrorKind::Other, other),
        }
    }
}

/// Result alias for objio operations
pub type Result<T> = std::result::Result<T, Error>;
