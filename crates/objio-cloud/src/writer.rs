//! CloudWriter - provides synchronous Write access to cloud objects

use crate::buffer::WriteBuffer;
use crate::error::{CloudError, Result};
use crate::runtime::block_on;
use crate::CloudConfig;
use object_store::{
    path::Path as ObjectPath, Attribute, Attributes, MultipartUpload, ObjectStore,
    PutMultipartOpts, PutOptions,
};
use objio::{ContentAttrs, RemoteWriter};
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{debug, trace, warn};

const INITIAL_BUFFER_CAPACITY: usize = 64 * 1024;

/// A writer that provides synchronous write access to cloud storage objects.
///
/// Small objects are uploaded with one PUT when the writer is closed. Once
/// `multipart_threshold` bytes are buffered the writer switches to a
/// multipart upload and sends a part every `buffer_size` bytes. Nothing is
/// visible in the store before [`CloudWriter::finalize`] succeeds.
#[derive(Debug)]
pub struct CloudWriter {
    /// The object store
    store: Arc<dyn ObjectStore>,
    /// Path to the object
    path: ObjectPath,
    /// Content type and encoding stored with the object
    attributes: Attributes,
    /// Write buffer
    buffer: WriteBuffer,
    /// Configuration
    config: CloudConfig,
    /// Total bytes written
    bytes_written: u64,
    /// Multipart upload handle (if using multipart)
    multipart: Option<Box<dyn MultipartUpload>>,
    /// Set once finalization was attempted
    finished: bool,
}

impl CloudWriter {
    /// Create a new CloudWriter
    ///
    /// # Arguments
    /// * `store` - The object store to write to
    /// * `path` - Path to the object
    /// * `content` - Content type and encoding to store; empty values are omitted
    /// * `config` - Configuration for the writer
    pub fn new(
        store: Arc<dyn ObjectStore>,
        path: ObjectPath,
        content: &ContentAttrs,
        config: CloudConfig,
    ) -> Self {
        let mut attributes = Attributes::new();
        if !content.content_type.is_empty() {
            attributes.insert(Attribute::ContentType, content.content_type.clone().into());
        }
        if !content.content_encoding.is_empty() {
            attributes.insert(
                Attribute::ContentEncoding,
                content.content_encoding.clone().into(),
            );
        }

        Self {
            store,
            path,
            attributes,
            buffer: WriteBuffer::new(INITIAL_BUFFER_CAPACITY.min(config.buffer_size)),
            config,
            bytes_written: 0,
            multipart: None,
            finished: false,
        }
    }

    /// Get the total number of bytes written
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Whether the upload switched to multipart
    pub fn is_multipart(&self) -> bool {
        self.multipart.is_some()
    }

    /// Start a multipart upload or send a part when enough data is buffered
    fn upload_ready(&mut self) -> Result<()> {
        if self.multipart.is_none() {
            if !self.config.use_multipart_upload
                || self.buffer.len() < self.config.multipart_threshold
            {
                return Ok(());
            }

            debug!(path = %self.path, "Starting multipart upload");
            let opts = PutMultipartOpts {
                attributes: self.attributes.clone(),
                ..Default::default()
            };
            let upload = block_on(self.store.put_multipart_opts(&self.path, opts))??;
            self.multipart = Some(upload);
        }

        if self.buffer.len() >= self.config.buffer_size {
            if let Some(upload) = self.multipart.as_mut() {
                let part = self.buffer.take();
                trace!(path = %self.path, len = part.len(), "Uploading part");
                block_on(upload.put_part(part.into()))??;
            }
        }

        Ok(())
    }

    /// Upload whatever is left and commit the object
    fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Err(CloudError::Closed);
        }
        self.finished = true;

        let data = self.buffer.take();
        match self.multipart.take() {
            Some(mut upload) => {
                debug!(path = %self.path, bytes = self.bytes_written, "Completing multipart upload");
                let result = block_on(async {
                    if !data.is_empty() {
                        upload.put_part(data.into()).await?;
                    }
                    upload.complete().await
                })?;

                if let Err(err) = result {
                    if let Err(abort_err) = block_on(upload.abort())? {
                        warn!(path = %self.path, error = %abort_err, "Failed to abort multipart upload");
                    }
                    return Err(err.into());
                }
            }
            None => {
                debug!(path = %self.path, bytes = data.len(), "Uploading object");
                let opts = PutOptions {
                    attributes: self.attributes.clone(),
                    ..Default::default()
                };
                block_on(self.store.put_opts(&self.path, data.into(), opts))??;
            }
        }

        Ok(())
    }

    /// Finalize the write operation
    ///
    /// This must be called to ensure all data is uploaded to the cloud.
    /// It's automatically called on drop, but calling it explicitly allows
    /// for proper error handling.
    pub fn finalize(mut self) -> Result<()> {
        self.finish()
    }
}

impl Write for CloudWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.finished {
            return Err(CloudError::Closed.into());
        }
        if buf.is_empty() {
            return Ok(0);
        }

        self.buffer.write(buf);
        self.bytes_written += buf.len() as u64;
        self.upload_ready()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // In cloud storage, flush doesn't immediately upload
        // We only upload on part boundaries or finalize
        Ok(())
    }
}

impl RemoteWriter for CloudWriter {
    fn close(mut self: Box<Self>) -> io::Result<()> {
        self.finish().map_err(io::Error::from)
    }
}

impl Drop for CloudWriter {
    fn drop(&mut self) {
        if !self.finished {
            warn!(path = %self.path, "CloudWriter dropped without close, finalizing");
            if let Err(e) = self.finish() {
                warn!(path = %self.path, error = %e, "Failed to finalize CloudWriter on drop");
            }
        }
    }
}
