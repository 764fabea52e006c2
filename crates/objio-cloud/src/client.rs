//! ObjectStoreClient - the objio remote client backed by `object_store`

use crate::error::{CloudError, Result};
use crate::reader::CloudReader;
use crate::runtime::block_on;
use crate::writer::CloudWriter;
use crate::CloudConfig;
use object_store::{
    path::Path as ObjectPath, Attribute, Attributes, GetOptions, ObjectStore,
};
use objio::{ContentAttrs, ObjectAttributes, RemoteClient, RemoteReader, RemoteWriter};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

#[cfg(feature = "gcp")]
use lru::LruCache;
#[cfg(feature = "gcp")]
use std::num::NonZeroUsize;
#[cfg(feature = "gcp")]
use std::sync::{Mutex, MutexGuard};

/// The stores used for one bucket
#[derive(Debug, Clone)]
struct BucketStores {
    /// Lets the service decode gzip objects it serves
    transcoding: Arc<dyn ObjectStore>,
    /// Asks for stored bytes as-is
    passthrough: Arc<dyn ObjectStore>,
}

impl BucketStores {
    fn select(&self, compressed: bool) -> Arc<dyn ObjectStore> {
        if compressed {
            Arc::clone(&self.passthrough)
        } else {
            Arc::clone(&self.transcoding)
        }
    }
}

enum StoreSource {
    /// One store serves every bucket name
    Fixed(Arc<dyn ObjectStore>),
    /// Google Cloud Storage clients built per bucket on first use
    #[cfg(feature = "gcp")]
    Gcs(Mutex<LruCache<String, BucketStores>>),
}

/// A [`RemoteClient`] over [`ObjectStore`] implementations.
///
/// Blocking calls run on a shared Tokio runtime; the client must not be
/// used from inside an async context.
pub struct ObjectStoreClient {
    source: StoreSource,
    config: CloudConfig,
}

impl ObjectStoreClient {
    /// A client for Google Cloud Storage.
    ///
    /// Credentials and endpoints come from the environment the way
    /// `GoogleCloudStorageBuilder::from_env` reads them. Per-bucket clients
    /// are created lazily, so construction never touches the network.
    #[cfg(feature = "gcp")]
    pub fn gcs(config: CloudConfig) -> Self {
        let capacity = NonZeroUsize::new(config.bucket_cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            source: StoreSource::Gcs(Mutex::new(LruCache::new(capacity))),
            config,
        }
    }

    /// A client that serves every bucket from `store`, with default
    /// configuration
    pub fn from_store(store: Arc<dyn ObjectStore>) -> Self {
        Self::from_store_with_config(store, CloudConfig::default())
    }

    /// A client that serves every bucket from `store`
    pub fn from_store_with_config(store: Arc<dyn ObjectStore>, config: CloudConfig) -> Self {
        Self {
            source: StoreSource::Fixed(store),
            config,
        }
    }

    /// Configuration used for new streams
    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    fn store(&self, bucket: &str, compressed: bool) -> Result<Arc<dyn ObjectStore>> {
        match &self.source {
            StoreSource::Fixed(store) => Ok(Arc::clone(store)),
            #[cfg(feature = "gcp")]
            StoreSource::Gcs(cache) => {
                let mut cache = lock(cache);
                if let Some(stores) = cache.get(bucket) {
                    return Ok(stores.select(compressed));
                }

                debug!(bucket, "Creating storage clients for bucket");
                let stores = BucketStores {
                    transcoding: gcs::build(bucket, &self.config, false)?,
                    passthrough: gcs::build(bucket, &self.config, true)?,
                };
                let selected = stores.select(compressed);
                cache.put(bucket.to_string(), stores);
                Ok(selected)
            }
        }
    }
}

#[cfg(feature = "gcp")]
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(feature = "gcp")]
mod gcs {
    use crate::error::Result;
    use crate::CloudConfig;
    use http::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
    use object_store::gcp::GoogleCloudStorageBuilder;
    use object_store::{ClientOptions, ObjectStore};
    use std::sync::Arc;

    /// Build a client for `bucket`. A passthrough client advertises gzip
    /// support so the service sends stored bytes without decoding them.
    pub(super) fn build(
        bucket: &str,
        config: &CloudConfig,
        passthrough: bool,
    ) -> Result<Arc<dyn ObjectStore>> {
        let mut options = ClientOptions::new().with_timeout(config.request_timeout);
        if passthrough {
            let mut headers = HeaderMap::new();
            headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
            options = options.with_default_headers(headers);
        }

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .with_client_options(options)
            .build()?;
        Ok(Arc::new(store))
    }
}

/// The store path of an escaped URI key
fn object_path(key: &str) -> Result<ObjectPath> {
    Ok(ObjectPath::from_url_path(key)?)
}

fn attribute(attributes: &Attributes, key: &Attribute) -> String {
    attributes
        .get(key)
        .map(|value| value.as_ref().to_string())
        .unwrap_or_default()
}

impl RemoteClient for ObjectStoreClient {
    fn attributes(&self, bucket: &str, key: &str) -> objio::Result<ObjectAttributes> {
        let store = self.store(bucket, false)?;
        let path = object_path(key)?;

        let options = GetOptions {
            head: true,
            ..Default::default()
        };
        let result = block_on(store.get_opts(&path, options))?.map_err(CloudError::from)?;

        let attributes = &result.attributes;
        Ok(ObjectAttributes {
            content_type: attribute(attributes, &Attribute::ContentType),
            content_encoding: attribute(attributes, &Attribute::ContentEncoding),
            cache_control: attribute(attributes, &Attribute::CacheControl),
        })
    }

    fn open_reader(
        &self,
        bucket: &str,
        key: &str,
        compressed: bool,
    ) -> objio::Result<Box<dyn RemoteReader>> {
        let store = self.store(bucket, compressed)?;
        let reader = CloudReader::open(store, object_path(key)?)?;
        Ok(Box::new(reader))
    }

    fn open_writer(
        &self,
        bucket: &str,
        key: &str,
        content: &ContentAttrs,
    ) -> objio::Result<Box<dyn RemoteWriter>> {
        let store = self.store(bucket, false)?;
        let writer = CloudWriter::new(store, object_path(key)?, content, self.config.clone());
        Ok(Box::new(writer))
    }

    fn delete(&self, bucket: &str, key: &str) -> objio::Result<()> {
        let store = self.store(bucket, false)?;
        let path = object_path(key)?;
        debug!(bucket, key, "Deleting cloud object");
        block_on(store.delete(&path))?.map_err(CloudError::from)?;
        Ok(())
    }
}

impl fmt::Debug for ObjectStoreClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            StoreSource::Fixed(store) => format!("Fixed({})", store),
            #[cfg(feature = "gcp")]
            StoreSource::Gcs(cache) => format!("Gcs({} buckets cached)", lock(cache).len()),
        };
        f.debug_struct("ObjectStoreClient")
            .field("source", &source)
            .field("config", &self.config)
            .finish()
    }
}
