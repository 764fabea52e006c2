//! Buffer management utilities

use bytes::{Buf, Bytes, BytesMut};

/// The unread remainder of one downloaded chunk
#[derive(Debug, Default)]
pub(crate) struct ReadBuffer {
    data: Bytes,
}

impl ReadBuffer {
    /// Create a new read buffer
    pub fn new(data: Bytes) -> Self {
        Self { data }
    }

    /// Check if everything has been consumed
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Copy as much as fits into `out`, returning the count
    pub fn fill(&mut self, out: &mut [u8]) -> usize {
        let n = out.len().min(self.data.len());
        out[..n].copy_from_slice(&self.data[..n]);
        self.data.advance(n);
        n
    }
}

/// A write buffer that accumulates data before uploading
#[derive(Debug)]
pub(crate) struct WriteBuffer {
    buffer: BytesMut,
}

impl WriteBuffer {
    /// Create a new write buffer with the given initial capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Get the current length
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Append data to the buffer
    pub fn write(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Take the buffer contents, leaving it empty
    pub fn take(&mut self) -> Bytes {
        self.buffer.split().freeze()
    }
}
