use thiserror::Error;

/// Errors raised by the cloud client
#[derive(Error, Debug)]
pub enum CloudError {
    /// Failure reported by the object store
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The object key is not a valid store path
    #[error("Invalid cloud path: {0}")]
    InvalidPath(#[from] object_store::path::Error),

    /// The blocking runtime could not be used
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// The writer was already closed
    #[error("Writer already closed")]
    Closed,
}

/// Result alias for cloud operations
pub type Result<T> = std::result::Result<T, CloudError>;

impl CloudError {
    /// Whether the object does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CloudError::ObjectStore(object_store::Error::NotFound { .. })
        )
    }
}

impl From<CloudError> for std::io::Error {
    fn from(err: CloudError) -> Self {
        match err {
            CloudError::Io(io_err) => io_err,
            CloudError::Closed => std::io::Error::new(std::io::ErrorKind::BrokenPipe, err),
            other if other.is_not_found() => {
                std::io::Error::new(std::io::ErrorKind::NotFound, other)
            }
            other => std::io::Error::new(std::io::ErrorKind::Other, other),
        }
    }
}

impl From<CloudError> for objio::Error {
    fn from(err: CloudError) -> Self {
        match err {
            CloudError::ObjectStore(object_store::Error::NotFound { path, .. }) => {
                objio::Error::NotFound(path)
            }
            CloudError::Io(io_err) => objio::Error::Io(io_err),
            other => objio::Error::remote(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found() -> CloudError {
        CloudError::ObjectStore(object_store::Error::NotFound {
            path: "bucket/missing".to_string(),
            source: "404".into(),
        })
    }

    #[test]
    fn test_not_found_conversions() {
        assert!(not_found().is_not_found());

        let err: objio::Error = not_found().into();
        assert!(matches!(err, objio::Error::NotFound(ref path) if path == "bucket/missing"));

        let err: std::io::Error = not_found().into();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_other_errors_stay_remote() {
        let err: objio::Error = CloudError::Runtime("no threads".to_string()).into();
        assert!(matches!(err, objio::Error::Remote(_)));
        assert!(err.to_string().contains("no threads"));

        let err: std::io::Error = CloudError::Closed.into();
        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
    }
}
