//! Reader - layered read access to object data

use crate::backend::BackendReader;
use crate::close::Close;
use crate::multi_error::{Layer, MultiError};
use crate::uri::Scheme;
use flate2::read::MultiGzDecoder;
use std::fmt;
use std::io::{self, Read};
use tracing::debug;

/// A reader of object data. Use [`crate::Object::new_reader`] to get one.
///
/// Reads go to the outermost layer: a gzip decoder when the object is
/// decompressed locally, the backend stream otherwise. [`Reader::close`]
/// must be called when done reading.
pub struct Reader {
    scheme: Scheme,
    content_encoding: String,
    stream: ReadStream,
}

enum ReadStream {
    Raw(BackendReader),
    Gzip(GzipReader),
}

/// gzip decoding layer remembering the first error it produced
struct GzipReader {
    decoder: MultiGzDecoder<BackendReader>,
    failure: Option<io::Error>,
}

impl GzipReader {
    fn new(inner: BackendReader) -> Self {
        Self {
            decoder: MultiGzDecoder::new(inner),
            failure: None,
        }
    }

    /// Close this layer and hand back the one below it
    fn finish(self, errors: &mut MultiError) -> BackendReader {
        if let Some(err) = self.failure {
            errors.push(Layer::Gzip, err);
        }
        self.decoder.into_inner()
    }
}

impl Read for GzipReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.decoder.read(buf) {
            Err(err) if err.kind() != io::ErrorKind::Interrupted => {
                if self.failure.is_some() {
                    return Err(err);
                }
                // close reports the original; the caller gets a copy
                let copy = io::Error::new(err.kind(), err.to_string());
                self.failure = Some(err);
                Err(copy)
            }
            result => result,
        }
    }
}

impl Reader {
    pub(crate) fn new(
        scheme: Scheme,
        content_encoding: String,
        backend: BackendReader,
        decompress: bool,
    ) -> Self {
        let stream = if decompress {
            ReadStream::Gzip(GzipReader::new(backend))
        } else {
            ReadStream::Raw(backend)
        };

        Self {
            scheme,
            content_encoding,
            stream,
        }
    }

    /// Scheme of the object being read
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Content encoding of the object when the reader was opened
    pub fn content_encoding(&self) -> &str {
        &self.content_encoding
    }

    /// Whether this reader decodes gzip itself
    pub fn is_decompressing(&self) -> bool {
        matches!(self.stream, ReadStream::Gzip(_))
    }

    /// Close every layer, outermost first.
    ///
    /// Each layer is closed even when an earlier one failed; all failures
    /// are returned together.
    pub fn close(self) -> Result<(), MultiError> {
        let mut errors = MultiError::new();

        let backend = match self.stream {
            ReadStream::Raw(backend) => backend,
            ReadStream::Gzip(gzip) => gzip.finish(&mut errors),
        };
        let layer = backend.layer();
        errors.record(layer, backend.close());

        debug!(scheme = %self.scheme, failures = errors.len(), "Closed reader");
        errors.into_result()
    }
}

impl Read for Reader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.stream {
            ReadStream::Raw(backend) => backend.read(buf),
            ReadStream::Gzip(gzip) => gzip.read(buf),
        }
    }
}

impl Close for Reader {
    fn close(self) -> Result<(), MultiError> {
        Reader::close(self)
    }
}

impl fmt::Debug for Reader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("scheme", &self.scheme)
            .field("content_encoding", &self.content_encoding)
            .field("decompressing", &self.is_decompressing())
            .finish()
    }
}
