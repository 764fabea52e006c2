//! Object - a resolved data location and its content metadata

use crate::backend::Backend;
use crate::config::Config;
use crate::metadata::Metadata;
use crate::reader::Reader;
use crate::uri::{ObjectUri, Scheme};
use crate::writer::Writer;
use crate::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// A named, addressable location for data. Use [`crate::Store::new_object`]
/// to get one.
///
/// Set the content type and encoding as desired before calling
/// [`Object::new_reader`] or [`Object::new_writer`]; both read the
/// effective metadata at the time they are called.
#[derive(Debug)]
pub struct Object {
    uri: ObjectUri,
    metadata: Metadata,
    backend: Backend,
    config: Arc<Config>,
}

impl Object {
    pub(crate) fn new(
        uri: ObjectUri,
        metadata: Metadata,
        backend: Backend,
        config: Arc<Config>,
    ) -> Self {
        Self {
            uri,
            metadata,
            backend,
            config,
        }
    }

    /// A copy of the object's URI
    pub fn url(&self) -> ObjectUri {
        self.uri.clone()
    }

    /// Backend family serving this object
    pub fn scheme(&self) -> Scheme {
        self.backend.scheme()
    }

    /// Filesystem path, for local objects
    pub fn local_path(&self) -> Option<&Path> {
        match &self.backend {
            Backend::Local(local) => Some(local.path()),
            Backend::Remote(_) => None,
        }
    }

    /// Effective content type
    pub fn content_type(&self) -> &str {
        self.metadata.content_type()
    }

    /// Effective content encoding
    pub fn content_encoding(&self) -> &str {
        self.metadata.content_encoding()
    }

    /// Assign the content type, overriding inferred and stored values
    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.metadata.set_content_type(content_type.into());
    }

    /// Assign the content encoding, overriding inferred and stored values
    pub fn set_content_encoding(&mut self, content_encoding: impl Into<String>) {
        self.metadata.set_content_encoding(content_encoding.into());
    }

    /// All metadata sources of this object
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Remove the object from storage
    pub fn delete(&self) -> Result<()> {
        self.backend.capability().delete()
    }

    /// Open a reader of the object's data, decoding gzip when the content
    /// encoding asks for it and the backend has not already done so.
    ///
    /// The caller must close the returned reader.
    pub fn new_reader(&self) -> Result<Reader> {
        let content = self.metadata.resolve();
        let capability = self.backend.capability();

        let decompress = capability.decompress_locally(&content)?;
        let backend = capability.open_reader(decompress)?;

        debug!(uri = %self.uri, decompress, "Opened reader");
        Ok(Reader::new(
            self.scheme(),
            content.content_encoding,
            backend,
            decompress,
        ))
    }

    /// Open a writer of the object's data, truncating existing content.
    ///
    /// Bytes are gzip encoded when the content encoding is `gzip`, and the
    /// content type and encoding are stored with remote objects. The caller
    /// must close the returned writer and check the result.
    pub fn new_writer(&self) -> Result<Writer> {
        let content = self.metadata.resolve();
        let backend = self
            .backend
            .capability()
            .open_writer(&content, &self.config)?;

        debug!(uri = %self.uri, content_encoding = %content.content_encoding, "Opened writer");
        Ok(Writer::new(
            self.scheme(),
            content,
            backend,
            self.config.compression(),
        ))
    }
}
