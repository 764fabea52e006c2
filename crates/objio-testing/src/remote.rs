//! In-memory remote client for tests
//!
//! [`MemoryRemote`] behaves like a small object store: objects live in a map
//! keyed by bucket and key, writers commit on close, and gzip objects are
//! served decoded unless compressed bytes are requested or the object
//! carries `Cache-Control: no-transform`. Every call is recorded, and
//! failures can be injected per operation. Clones share state.

use flate2::read::MultiGzDecoder;
use objio::metadata::{NO_TRANSFORM, X_GZIP_CONTENT_TYPE};
use objio::{
    ContentAttrs, Error, ObjectAttributes, RemoteClient, RemoteReader, RemoteWriter, Result,
    GZIP_ENCODING,
};
use std::collections::HashMap;
use std::io::{self, Cursor, Read, Write};
use std::sync::{Arc, Mutex, MutexGuard};

/// Bytes and attributes of one stored object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredObject {
    /// Stored bytes, exactly as uploaded
    pub data: Vec<u8>,
    /// Stored attributes
    pub attributes: ObjectAttributes,
}

/// A call made against the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// Attribute lookup
    Attributes { bucket: String, key: String },
    /// Reader opened
    OpenReader {
        bucket: String,
        key: String,
        compressed: bool,
    },
    /// Writer opened
    OpenWriter {
        bucket: String,
        key: String,
        content: ContentAttrs,
    },
    /// Object deleted
    Delete { bucket: String, key: String },
}

#[derive(Debug, Default, Clone)]
struct Faults {
    attributes: Option<String>,
    reader_close: Option<String>,
    writes: Option<String>,
    writer_close: Option<String>,
}

#[derive(Debug, Default)]
struct Shared {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    calls: Mutex<Vec<Call>>,
    faults: Mutex<Faults>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn injected(message: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Other, message.to_string())
}

/// An in-memory [`RemoteClient`]
#[derive(Debug, Default, Clone)]
pub struct MemoryRemote {
    shared: Arc<Shared>,
}

impl MemoryRemote {
    /// An empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` at `bucket/key` with `attributes`
    pub fn insert(&self, bucket: &str, key: &str, data: &[u8], attributes: ObjectAttributes) {
        lock(&self.shared.objects).insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                data: data.to_vec(),
                attributes,
            },
        );
    }

    /// The object stored at `bucket/key`
    pub fn get(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        lock(&self.shared.objects)
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<Call> {
        lock(&self.shared.calls).clone()
    }

    /// Fail attribute lookups with `message`
    pub fn fail_attributes(&self, message: &str) {
        lock(&self.shared.faults).attributes = Some(message.to_string());
    }

    /// Fail closing readers with `message`
    pub fn fail_reader_close(&self, message: &str) {
        lock(&self.shared.faults).reader_close = Some(message.to_string());
    }

    /// Fail writes on open and future writers with `message`
    pub fn fail_writes(&self, message: &str) {
        lock(&self.shared.faults).writes = Some(message.to_string());
    }

    /// Fail committing writers with `message`
    pub fn fail_writer_close(&self, message: &str) {
        lock(&self.shared.faults).writer_close = Some(message.to_string());
    }

    fn record(&self, call: Call) {
        lock(&self.shared.calls).push(call);
    }

    fn faults(&self) -> Faults {
        lock(&self.shared.faults).clone()
    }

    fn lookup(&self, bucket: &str, key: &str) -> Result<StoredObject> {
        self.get(bucket, key)
            .ok_or_else(|| Error::NotFound(format!("{}/{}", bucket, key)))
    }
}

/// Whether the service would decode the object before sending it
fn transcodes(attributes: &ObjectAttributes) -> bool {
    let gzipped = attributes.content_encoding == GZIP_ENCODING
        || attributes.content_type == X_GZIP_CONTENT_TYPE;
    gzipped && attributes.cache_control != NO_TRANSFORM
}

impl RemoteClient for MemoryRemote {
    fn attributes(&self, bucket: &str, key: &str) -> Result<ObjectAttributes> {
        self.record(Call::Attributes {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        if let Some(message) = self.faults().attributes {
            return Err(Error::remote(injected(&message)));
        }
        Ok(self.lookup(bucket, key)?.attributes)
    }

    fn open_reader(
        &self,
        bucket: &str,
        key: &str,
        compressed: bool,
    ) -> Result<Box<dyn RemoteReader>> {
        self.record(Call::OpenReader {
            bucket: bucket.to_string(),
            key: key.to_string(),
            compressed,
        });
        let object = self.lookup(bucket, key)?;

        let data = if !compressed && transcodes(&object.attributes) {
            let mut decoded = Vec::new();
            MultiGzDecoder::new(object.data.as_slice()).read_to_end(&mut decoded)?;
            decoded
        } else {
            object.data
        };

        Ok(Box::new(MemoryReader {
            remote: self.clone(),
            data: Cursor::new(data),
        }))
    }

    fn open_writer(
        &self,
        bucket: &str,
        key: &str,
        content: &ContentAttrs,
    ) -> Result<Box<dyn RemoteWriter>> {
        self.record(Call::OpenWriter {
            bucket: bucket.to_string(),
            key: key.to_string(),
            content: content.clone(),
        });
        Ok(Box::new(MemoryWriter {
            remote: self.clone(),
            bucket: bucket.to_string(),
            key: key.to_string(),
            content: content.clone(),
            buffer: Vec::new(),
        }))
    }

    fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        self.record(Call::Delete {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        lock(&self.shared.objects)
            .remove(&(bucket.to_string(), key.to_string()))
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("{}/{}", bucket, key)))
    }
}

struct MemoryReader {
    remote: MemoryRemote,
    data: Cursor<Vec<u8>>,
}

impl Read for MemoryReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.data.read(buf)
    }
}

impl RemoteReader for MemoryReader {
    fn close(self: Box<Self>) -> io::Result<()> {
        match self.remote.faults().reader_close {
            Some(message) => Err(injected(&message)),
            None => Ok(()),
        }
    }
}

/// Buffers until close; an unclosed writer stores nothing
struct MemoryWriter {
    remote: MemoryRemote,
    bucket: String,
    key: String,
    content: ContentAttrs,
    buffer: Vec<u8>,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(message) = self.remote.faults().writes {
            return Err(injected(&message));
        }
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl RemoteWriter for MemoryWriter {
    fn close(self: Box<Self>) -> io::Result<()> {
        if let Some(message) = self.remote.faults().writer_close {
            return Err(injected(&message));
        }

        let attributes = ObjectAttributes {
            content_type: self.content.content_type.clone(),
            content_encoding: self.content.content_encoding.clone(),
            cache_control: String::new(),
        };
        self.remote
            .insert(&self.bucket, &self.key, &self.buffer, attributes);
        Ok(())
    }
}
