//! Writer - layered write access to object data

use crate::backend::BackendWriter;
use crate::close::Close;
use crate::metadata::ContentAttrs;
use crate::multi_error::{Layer, MultiError};
use crate::uri::Scheme;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fmt;
use std::io::{self, Write};
use tracing::debug;

/// A writer of object data. Use [`crate::Object::new_writer`] to get one.
///
/// [`Writer::close`] must be called when done writing, and its result
/// tells whether the write succeeded.
pub struct Writer {
    scheme: Scheme,
    content: ContentAttrs,
    stream: WriteStream,
}

enum WriteStream {
    Raw(BackendWriter),
    Gzip(GzEncoder<Detachable<BackendWriter>>),
}

/// Lets the backend be taken back from an encoder that failed to finish.
///
/// Once detached, writes fail, so the encoder's own drop cannot reach the
/// backend again.
struct Detachable<W>(Option<W>);

impl<W> Detachable<W> {
    fn take(&mut self) -> Option<W> {
        self.0.take()
    }
}

impl<W: Write> Write for Detachable<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.0 {
            Some(inner) => inner.write(buf),
            None => Err(detached()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.0 {
            Some(inner) => inner.flush(),
            None => Err(detached()),
        }
    }
}

fn detached() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "stream already closed")
}

impl Writer {
    pub(crate) fn new(
        scheme: Scheme,
        content: ContentAttrs,
        backend: BackendWriter,
        level: Compression,
    ) -> Self {
        let stream = if content.is_gzip() {
            WriteStream::Gzip(GzEncoder::new(Detachable(Some(backend)), level))
        } else {
            WriteStream::Raw(backend)
        };

        Self {
            scheme,
            content,
            stream,
        }
    }

    /// Scheme of the object being written
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Content type stored with the object, where the backend supports it
    pub fn content_type(&self) -> &str {
        &self.content.content_type
    }

    /// Content encoding applied to the written bytes
    pub fn content_encoding(&self) -> &str {
        &self.content.content_encoding
    }

    /// Whether this writer compresses with gzip
    pub fn is_compressing(&self) -> bool {
        matches!(self.stream, WriteStream::Gzip(_))
    }

    /// Finish and close every layer, outermost first.
    ///
    /// The gzip trailer is written before the backend is committed. A
    /// failure in one layer does not stop the next one from closing; every
    /// failure is returned.
    pub fn close(self) -> Result<(), MultiError> {
        let mut errors = MultiError::new();

        let backend = match self.stream {
            WriteStream::Raw(backend) => Some(backend),
            WriteStream::Gzip(mut encoder) => {
                errors.record(Layer::Gzip, encoder.try_finish());
                encoder.get_mut().take()
            }
        };

        if let Some(backend) = backend {
            let layer = backend.layer();
            errors.record(layer, backend.close());
        }

        debug!(scheme = %self.scheme, failures = errors.len(), "Closed writer");
        errors.into_result()
    }
}

impl Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.stream {
            WriteStream::Raw(backend) => backend.write(buf),
            WriteStream::Gzip(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.stream {
            WriteStream::Raw(backend) => backend.flush(),
            WriteStream::Gzip(encoder) => encoder.flush(),
        }
    }
}

impl Close for Writer {
    fn close(self) -> Result<(), MultiError> {
        Writer::close(self)
    }
}

impl fmt::Debug for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writer")
            .field("scheme", &self.scheme)
            .field("content_type", &self.content.content_type)
            .field("content_encoding", &self.content.content_encoding)
            .field("compressing", &self.is_compressing())
            .finish()
    }
}
