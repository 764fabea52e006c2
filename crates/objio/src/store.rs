//! Store - resolves URIs into objects

use crate::backend::{Backend, LocalFile, RemoteClient, RemoteObject};
use crate::config::Config;
use crate::metadata::Metadata;
use crate::object::Object;
use crate::uri::{ObjectUri, Scheme};
use crate::{Error, Result};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A setting applied while building a [`Store`]
pub enum StoreOption {
    /// Enable `gs://` objects through the given client
    Remote(Arc<dyn RemoteClient>),
    /// Replace the default configuration
    Config(Config),
}

impl StoreOption {
    /// Name used when a URI needs an option that was not given
    const REMOTE: &'static str = "StoreOption::Remote";

    /// Attach a remote client
    pub fn remote<C>(client: C) -> Self
    where
        C: RemoteClient + 'static,
    {
        StoreOption::Remote(Arc::new(client))
    }
}

impl fmt::Debug for StoreOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreOption::Remote(client) => f.debug_tuple("Remote").field(client).finish(),
            StoreOption::Config(config) => f.debug_tuple("Config").field(config).finish(),
        }
    }
}

/// Creates [`Object`]s from URIs.
///
/// A store should be built once and reused. It holds no per-object state
/// and is safe to share between threads.
#[derive(Debug, Clone, Default)]
pub struct Store {
    remote: Option<Arc<dyn RemoteClient>>,
    config: Arc<Config>,
}

impl Store {
    /// Build a store by applying `options` in order
    pub fn new<I>(options: I) -> Self
    where
        I: IntoIterator<Item = StoreOption>,
    {
        let mut store = Store::default();
        for option in options {
            store.apply(option);
        }
        store
    }

    fn apply(&mut self, option: StoreOption) {
        match option {
            StoreOption::Remote(client) => self.remote = Some(client),
            StoreOption::Config(config) => self.config = Arc::new(config),
        }
    }

    /// Whether `gs://` URIs can be resolved
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Configuration handed to every object
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve `uri` into an object.
    ///
    /// The content type and encoding are guessed from the path. For remote
    /// objects that already exist, the stored attributes replace the guess.
    /// Scheme-less input is a local path.
    pub fn new_object(&self, uri: &str) -> Result<Object> {
        let uri = ObjectUri::parse(uri)?;
        let scheme = Scheme::classify(uri.scheme())?;
        let mut metadata = Metadata::inferred_from(uri.path());

        let backend = match scheme {
            Scheme::Gs => {
                let client = self
                    .remote
                    .clone()
                    .ok_or(Error::OptionRequired(StoreOption::REMOTE))?;
                let (bucket, key) = uri.bucket_and_key();
                Backend::Remote(RemoteObject::new(client, bucket, key))
            }
            Scheme::File => {
                if !uri.is_local_host() {
                    return Err(Error::UnsupportedHost(
                        uri.host().unwrap_or_default().to_string(),
                    ));
                }
                Backend::Local(LocalFile::new(uri.file_path()?, uri.host())?)
            }
        };

        if let Some(stored) = backend.capability().attributes()? {
            metadata = metadata.with_stored(stored.content());
        }

        debug!(
            uri = %uri,
            scheme = %scheme,
            content_type = metadata.content_type(),
            content_encoding = metadata.content_encoding(),
            "Resolved object"
        );

        Ok(Object::new(uri, metadata, backend, Arc::clone(&self.config)))
    }
}
