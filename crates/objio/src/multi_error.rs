//! Aggregation of independent cleanup failures

use std::fmt;
use std::io;

/// Identity of a stream layer, used to annotate close failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// gzip encoder or decoder
    Gzip,
    /// Local file handle
    File,
    /// Remote object stream
    Remote,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layer::Gzip => "gzip",
            Layer::File => "file",
            Layer::Remote => "gs",
        };
        f.write_str(name)
    }
}

/// A close failure from one layer
#[derive(Debug)]
pub struct LayerError {
    /// Layer that failed
    pub layer: Layer,
    /// Underlying failure
    pub source: io::Error,
}

impl fmt::Display for LayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.layer, self.source)
    }
}

impl std::error::Error for LayerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Every failure collected while tearing down a stream, in teardown order
#[derive(Debug, Default)]
pub struct MultiError {
    errors: Vec<LayerError>,
}

impl MultiError {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the failure of `layer`
    pub fn push(&mut self, layer: Layer, source: io::Error) {
        self.errors.push(LayerError { layer, source });
    }

    /// Record the outcome of closing `layer`, keeping only failures
    pub fn record(&mut self, layer: Layer, outcome: io::Result<()>) {
        if let Err(source) = outcome {
            self.push(layer, source);
        }
    }

    /// Number of collected failures
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether nothing failed
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Collected failures
    pub fn errors(&self) -> &[LayerError] {
        &self.errors
    }

    /// Layers that failed, in teardown order
    pub fn layers(&self) -> Vec<Layer> {
        self.errors.iter().map(|e| e.layer).collect()
    }

    /// `Ok(())` when nothing was collected, the aggregate otherwise
    pub fn into_result(self) -> Result<(), MultiError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for MultiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.errors
            .first()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl IntoIterator for MultiError {
    type Item = LayerError;
    type IntoIter = std::vec::IntoIter<LayerError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl From<MultiError> for io::Error {
    fn from(err: MultiError) -> Self {
        io::Error::new(io::ErrorKind::Other, err)
    }
}
