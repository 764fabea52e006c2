//! # objio
//!
//! Uniform object access by URI. Callers read and write bytes without caring
//! whether they live on local disk or in a remote object store, and without
//! handling gzip by hand.
//!
//! ## Architecture
//!
//! - [`Store`] resolves a URI into an [`Object`], guessing content metadata
//!   from the path and, for existing remote objects, taking the stored
//!   attributes instead.
//! - [`Object`] opens a [`Reader`] or [`Writer`] on the backend chosen by
//!   the URI scheme, adding a gzip layer when the content encoding is `gzip`.
//! - Closing a stream closes every layer and reports all failures at once as
//!   a [`MultiError`].
//!
//! Supported URIs are `gs://bucket/key` (needs a [`RemoteClient`], see the
//! `objio-cloud` crate), `file:///path`, `file://localhost/path` and plain
//! paths.
//!
//! ```no_run
//! use objio::Store;
//! use std::io::{Read, Write};
//!
//! # fn main() -> objio::Result<()> {
//! let store = Store::default();
//! let object = store.new_object("events.ndjson.gz")?;
//!
//! let mut writer = object.new_writer()?;
//! writer.write_all(b"{\"id\":1}\n")?;
//! writer.close()?;
//!
//! let mut reader = object.new_reader()?;
//! let mut contents = String::new();
//! reader.read_to_string(&mut contents)?;
//! reader.close()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod backend;
pub mod close;
pub mod config;
pub mod error;
pub mod metadata;
pub mod multi_error;
pub mod object;
pub mod reader;
pub mod store;
pub mod uri;
pub mod writer;

pub use backend::{RemoteClient, RemoteReader, RemoteWriter};
pub use close::Close;
pub use config::Config;
pub use error::{BoxError, Error, Result};
pub use metadata::{ContentAttrs, Metadata, ObjectAttributes, GZIP_ENCODING};
pub use multi_error::{Layer, LayerError, MultiError};
pub use object::Object;
pub use reader::Reader;
pub use store::{Store, StoreOption};
pub use uri::{ObjectUri, Scheme};
pub use writer::Writer;
