//! Scoped release of layered streams

use crate::multi_error::MultiError;

/// A resource released by an explicit, fallible close.
///
/// Closing consumes the value, so a stream cannot be used afterwards.
/// `Option<T>` closes its content when present; closing `None` succeeds.
pub trait Close {
    /// Release every layer, reporting all failures together
    fn close(self) -> Result<(), MultiError>;
}

impl<T: Close> Close for Option<T> {
    fn close(self) -> Result<(), MultiError> {
        match self {
            Some(inner) => inner.close(),
            None => Ok(()),
        }
    }
}

impl<T: Close> Close for Box<T> {
    fn close(self) -> Result<(), MultiError> {
        (*self).close()
    }
}
