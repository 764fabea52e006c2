//! CloudReader - provides synchronous Read access to cloud objects

use crate::buffer::ReadBuffer;
use crate::error::Result;
use crate::runtime::block_on;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use object_store::{path::Path as ObjectPath, GetResult, ObjectStore};
use objio::RemoteReader;
use std::fmt;
use std::io::{self, Read};
use std::sync::Arc;
use tracing::{debug, trace};

/// A reader that streams the body of a cloud object through `std::io::Read`.
///
/// Chunks are pulled from the response stream one at a time as the caller
/// reads, so memory use stays bounded by the transport's chunk size.
pub struct CloudReader {
    path: ObjectPath,
    /// Size reported by the store; for transcoded objects this is the
    /// stored size, not the number of bytes served
    size: u64,
    stream: Option<BoxStream<'static, object_store::Result<Bytes>>>,
    buffer: ReadBuffer,
    bytes_read: u64,
}

impl CloudReader {
    /// Open `path` in `store` for reading
    ///
    /// # Errors
    /// Returns an error if the object does not exist or the request fails
    pub fn open(store: Arc<dyn ObjectStore>, path: ObjectPath) -> Result<Self> {
        let result = block_on(store.get(&path))??;
        debug!(path = %path, size = result.meta.size, "Opened cloud reader");
        Ok(Self::from_result(path, result))
    }

    pub(crate) fn from_result(path: ObjectPath, result: GetResult) -> Self {
        Self {
            path,
            size: result.meta.size as u64,
            stream: Some(result.into_stream()),
            buffer: ReadBuffer::default(),
            bytes_read: 0,
        }
    }

    /// Path of the object being read
    pub fn path(&self) -> &ObjectPath {
        &self.path
    }

    /// Size of the object as reported by the store
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Get the total number of bytes read so far
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Pull the next chunk; `false` at end of stream
    fn next_chunk(&mut self) -> Result<bool> {
        let Some(stream) = self.stream.as_mut() else {
            return Ok(false);
        };

        match block_on(stream.next())? {
            Some(chunk) => {
                let chunk = chunk?;
                trace!(path = %self.path, len = chunk.len(), "Received chunk");
                self.buffer = ReadBuffer::new(chunk);
                Ok(true)
            }
            None => {
                self.stream = None;
                Ok(false)
            }
        }
    }
}

impl Read for CloudReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        while self.buffer.is_empty() {
            if !self.next_chunk()? {
                return Ok(0); // EOF
            }
        }

        let n = self.buffer.fill(buf);
        self.bytes_read += n as u64;
        Ok(n)
    }
}

impl RemoteReader for CloudReader {
    fn close(mut self: Box<Self>) -> io::Result<()> {
        // Dropping the body stream releases the connection
        self.stream = None;
        debug!(path = %self.path, bytes_read = self.bytes_read, "Closed cloud reader");
        Ok(())
    }
}

impl fmt::Debug for CloudReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudReader")
            .field("path", &self.path)
            .field("size", &self.size)
            .field("bytes_read", &self.bytes_read)
            .field("finished", &self.stream.is_none())
            .finish()
    }
}
