//! Storage backends and the capability interface they share.
//!
//! An object's backend is chosen once from its URI scheme and stored as a
//! [`Backend`] variant. Every later operation goes through the
//! [`Capability`] trait, so scheme checks never repeat at call sites.

mod local;
mod remote;

pub(crate) use local::LocalFile;
pub(crate) use remote::RemoteObject;

use crate::config::Config;
use crate::metadata::{ContentAttrs, ObjectAttributes};
use crate::multi_error::Layer;
use crate::uri::Scheme;
use crate::Result;
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};

/// A read stream handed out by a remote client
pub trait RemoteReader: Read + Send {
    /// Release the stream
    fn close(self: Box<Self>) -> io::Result<()>;
}

/// A write stream handed out by a remote client.
///
/// Data is committed by `close`; its result tells whether the write
/// succeeded.
pub trait RemoteWriter: Write + Send {
    /// Commit and release the stream
    fn close(self: Box<Self>) -> io::Result<()>;
}

/// Operations objio needs from a remote object store client.
///
/// Implementations own transport, authentication and retries. A missing
/// object must be reported as [`crate::Error::NotFound`] so it can be told
/// apart from other failures.
pub trait RemoteClient: Send + Sync + fmt::Debug {
    /// Fetch the stored attributes of `bucket/key`
    fn attributes(&self, bucket: &str, key: &str) -> Result<ObjectAttributes>;

    /// Open `bucket/key` for reading. With `compressed` set, stored gzip
    /// bytes are returned as-is instead of being decoded by the service.
    fn open_reader(&self, bucket: &str, key: &str, compressed: bool)
        -> Result<Box<dyn RemoteReader>>;

    /// Open `bucket/key` for writing, replacing existing content and storing
    /// `content` as the object's type and encoding
    fn open_writer(
        &self,
        bucket: &str,
        key: &str,
        content: &ContentAttrs,
    ) -> Result<Box<dyn RemoteWriter>>;

    /// Remove `bucket/key`
    fn delete(&self, bucket: &str, key: &str) -> Result<()>;
}

/// What every backend variant can do for an object
pub(crate) trait Capability {
    /// Stored attributes, `None` when the backend keeps none or the object
    /// does not exist yet
    fn attributes(&self) -> Result<Option<ObjectAttributes>>;

    /// Whether a reader must add its own gzip layer for `content`
    fn decompress_locally(&self, content: &ContentAttrs) -> Result<bool>;

    /// Open the raw byte stream
    fn open_reader(&self, compressed: bool) -> Result<BackendReader>;

    /// Create or truncate the destination
    fn open_writer(&self, content: &ContentAttrs, config: &Config) -> Result<BackendWriter>;

    /// Remove the object
    fn delete(&self) -> Result<()>;
}

/// The backend bound to an object
#[derive(Debug)]
pub(crate) enum Backend {
    Local(LocalFile),
    Remote(RemoteObject),
}

impl Backend {
    pub(crate) fn scheme(&self) -> Scheme {
        match self {
            Backend::Local(_) => Scheme::File,
            Backend::Remote(_) => Scheme::Gs,
        }
    }

    pub(crate) fn capability(&self) -> &dyn Capability {
        match self {
            Backend::Local(local) => local as &dyn Capability,
            Backend::Remote(remote) => remote as &dyn Capability,
        }
    }
}

/// Innermost stream of a reader
pub(crate) enum BackendReader {
    File(File),
    Remote(Box<dyn RemoteReader>),
}

impl BackendReader {
    pub(crate) fn layer(&self) -> Layer {
        match self {
            BackendReader::File(_) => Layer::File,
            BackendReader::Remote(_) => Layer::Remote,
        }
    }

    pub(crate) fn close(self) -> io::Result<()> {
        match self {
            BackendReader::File(file) => {
                drop(file);
                Ok(())
            }
            BackendReader::Remote(reader) => reader.close(),
        }
    }
}

impl Read for BackendReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            BackendReader::File(file) => file.read(buf),
            BackendReader::Remote(reader) => reader.read(buf),
        }
    }
}

impl fmt::Debug for BackendReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendReader::File(file) => f.debug_tuple("File").field(file).finish(),
            BackendReader::Remote(_) => f.write_str("Remote(..)"),
        }
    }
}

/// Innermost stream of a writer
pub(crate) enum BackendWriter {
    File { file: File, sync_on_close: bool },
    Remote(Box<dyn RemoteWriter>),
}

impl BackendWriter {
    pub(crate) fn layer(&self) -> Layer {
        match self {
            BackendWriter::File { .. } => Layer::File,
            BackendWriter::Remote(_) => Layer::Remote,
        }
    }

    pub(crate) fn close(self) -> io::Result<()> {
        match self {
            BackendWriter::File {
                mut file,
                sync_on_close,
            } => {
                file.flush()?;
                if sync_on_close {
                    file.sync_all()?;
                }
                Ok(())
            }
            BackendWriter::Remote(writer) => writer.close(),
        }
    }
}

impl Write for BackendWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            BackendWriter::File { file, .. } => file.write(buf),
            BackendWriter::Remote(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            BackendWriter::File { file, .. } => file.flush(),
            BackendWriter::Remote(writer) => writer.flush(),
        }
    }
}

impl fmt::Debug for BackendWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendWriter::File {
                file,
                sync_on_close,
            } => f
                .debug_struct("File")
                .field("file", file)
                .field("sync_on_close", sync_on_close)
                .finish(),
            BackendWriter::Remote(_) => f.write_str("Remote(..)"),
        }
    }
}
