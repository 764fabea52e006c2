//! Remote object store backend

use super::{BackendReader, BackendWriter, Capability, RemoteClient};
use crate::config::Config;
use crate::metadata::{ContentAttrs, ObjectAttributes, NO_TRANSFORM, X_GZIP_CONTENT_TYPE};
use crate::Result;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// An object in a remote bucket
#[derive(Clone)]
pub(crate) struct RemoteObject {
    client: Arc<dyn RemoteClient>,
    bucket: String,
    key: String,
}

impl RemoteObject {
    pub(crate) fn new(client: Arc<dyn RemoteClient>, bucket: String, key: String) -> Self {
        Self {
            client,
            bucket,
            key,
        }
    }
}

impl fmt::Debug for RemoteObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteObject")
            .field("bucket", &self.bucket)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl Capability for RemoteObject {
    fn attributes(&self) -> Result<Option<ObjectAttributes>> {
        match self.client.attributes(&self.bucket, &self.key) {
            Ok(attrs) => Ok(Some(attrs)),
            Err(err) if err.is_not_found() => {
                debug!(bucket = %self.bucket, key = %self.key, "Remote object does not exist yet");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn decompress_locally(&self, content: &ContentAttrs) -> Result<bool> {
        if !content.is_gzip() {
            return Ok(false);
        }

        // Stores tag gzip uploads without an explicit type as x-gzip and
        // decode them server side unless transformation is disabled.
        if content.content_type == X_GZIP_CONTENT_TYPE {
            let cache_control = self
                .attributes()?
                .map(|attrs| attrs.cache_control)
                .unwrap_or_default();
            if cache_control != NO_TRANSFORM {
                debug!(
                    bucket = %self.bucket,
                    key = %self.key,
                    "Relying on server-side decompression"
                );
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn open_reader(&self, compressed: bool) -> Result<BackendReader> {
        debug!(bucket = %self.bucket, key = %self.key, compressed, "Opening remote reader");
        let reader = self.client.open_reader(&self.bucket, &self.key, compressed)?;
        Ok(BackendReader::Remote(reader))
    }

    fn open_writer(&self, content: &ContentAttrs, _config: &Config) -> Result<BackendWriter> {
        debug!(
            bucket = %self.bucket,
            key = %self.key,
            content_type = %content.content_type,
            content_encoding = %content.content_encoding,
            "Opening remote writer"
        );
        let writer = self.client.open_writer(&self.bucket, &self.key, content)?;
        Ok(BackendWriter::Remote(writer))
    }

    fn delete(&self) -> Result<()> {
        info!(bucket = %self.bucket, key = %self.key, "Deleting remote object");
        self.client.delete(&self.bucket, &self.key)
    }
}
