//! # objio-cloud
//!
//! Cloud object store client for objio. This crate implements
//! [`objio::RemoteClient`] over any [`object_store::ObjectStore`], so `gs://`
//! objects can be read and written through plain `std::io` streams without
//! the caller dealing with async code.
//!
//! ## Architecture
//!
//! The main abstractions are:
//! - `ObjectStoreClient`: resolves a bucket to a store and hands out streams
//! - `CloudReader`: implements `std::io::Read` over a GET response body
//! - `CloudWriter`: implements `std::io::Write`, uploading on close
//!
//! These adapters use an internal Tokio runtime to bridge the async
//! `object_store` API with the synchronous std::io traits. They must not be
//! used from inside an async context.
//!
//! ```no_run
//! use objio::{Store, StoreOption};
//! use objio_cloud::{CloudConfig, ObjectStoreClient};
//!
//! let client = ObjectStoreClient::gcs(CloudConfig::default());
//! let store = Store::new([StoreOption::remote(client)]);
//! let object = store.new_object("gs://my-bucket/exports/day.ndjson.gz")?;
//! # Ok::<(), objio::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod buffer;
mod client;
mod error;
mod reader;
mod runtime;
mod writer;

pub use client::ObjectStoreClient;
pub use error::{CloudError, Result};
pub use reader::CloudReader;
pub use writer::CloudWriter;

// Re-export commonly used types from object_store
pub use object_store::{path::Path as ObjectPath, ObjectStore};

use std::time::Duration;

/// Configuration for cloud storage operations
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// Size of each multipart upload part in bytes (default: 8MB)
    pub buffer_size: usize,
    /// Whether to use multipart upload for large objects (default: true)
    pub use_multipart_upload: bool,
    /// Buffered bytes after which a multipart upload starts (default: 64MB)
    pub multipart_threshold: usize,
    /// Timeout applied to every request (default: 60s)
    pub request_timeout: Duration,
    /// Number of buckets whose clients are kept (default: 16)
    pub bucket_cache_size: usize,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            buffer_size: 8 * 1024 * 1024,          // 8MB
            use_multipart_upload: true,
            multipart_threshold: 64 * 1024 * 1024, // 64MB
            request_timeout: Duration::from_secs(60),
            bucket_cache_size: 16,
        }
    }
}
