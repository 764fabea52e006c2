//! Content metadata: filename inference and the precedence between
//! inferred, stored and explicitly assigned values.

use serde::{Deserialize, Serialize};

/// The only content encoding with behavior attached
pub const GZIP_ENCODING: &str = "gzip";

/// Content type some stores assign to gzip uploads lacking an explicit one
pub const X_GZIP_CONTENT_TYPE: &str = "application/x-gzip";

/// Cache-Control value that disables server-side transcoding
pub const NO_TRANSFORM: &str = "no-transform";

/// Content type tokens, evaluated in order; the first match wins
const CONTENT_TYPES: &[(&str, &str)] = &[
    (".csv", "text/csv"),
    (".ndjson", "application/x-ndjson"),
    (".json", "application/json"),
    (".txt", "text/plain"),
];

/// Encoding tokens; any match selects gzip
const GZIP_TOKENS: &[&str] = &[".gz", ".gzip"];

/// Content type and encoding pair. Empty strings mean "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentAttrs {
    /// MIME type, advisory only
    pub content_type: String,
    /// Content encoding; only `gzip` changes stream behavior
    pub content_encoding: String,
}

impl ContentAttrs {
    /// Create a pair from explicit values
    pub fn new(content_type: impl Into<String>, content_encoding: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            content_encoding: content_encoding.into(),
        }
    }

    /// Guess content attributes from a URI path.
    ///
    /// Matching is substring based over the extension region of the last
    /// path segment, so `report.csv.bak` is still `text/csv`.
    pub fn infer(path: &str) -> Self {
        let ext = extension_region(path);

        let content_type = CONTENT_TYPES
            .iter()
            .find(|(token, _)| ext.contains(token))
            .map(|(_, mime)| mime.to_string())
            .unwrap_or_default();

        let content_encoding = if GZIP_TOKENS.iter().any(|token| ext.contains(token)) {
            GZIP_ENCODING.to_string()
        } else {
            String::new()
        };

        Self {
            content_type,
            content_encoding,
        }
    }

    /// Whether the encoding calls for a gzip layer
    pub fn is_gzip(&self) -> bool {
        self.content_encoding == GZIP_ENCODING
    }
}

/// Everything from the first `.` of the last path segment onwards
fn extension_region(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.find('.') {
        Some(idx) => &name[idx..],
        None => "",
    }
}

/// Attributes held by a remote store for an existing object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectAttributes {
    /// Stored content type
    pub content_type: String,
    /// Stored content encoding
    pub content_encoding: String,
    /// Stored Cache-Control header
    pub cache_control: String,
}

impl ObjectAttributes {
    /// The content pair of these attributes
    pub fn content(&self) -> ContentAttrs {
        ContentAttrs::new(self.content_type.clone(), self.content_encoding.clone())
    }
}

/// Per-field explicit assignments made by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Assigned content type
    pub content_type: Option<String>,
    /// Assigned content encoding
    pub content_encoding: Option<String>,
}

/// The three metadata sources of an object.
///
/// Resolution order is inferred < stored < overrides. A stored layer
/// replaces the inferred one wholesale, empty values included, because the
/// store's view of an existing object is authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    inferred: ContentAttrs,
    stored: Option<ContentAttrs>,
    overrides: Overrides,
}

impl Metadata {
    /// Metadata guessed from `path` only
    pub fn inferred_from(path: &str) -> Self {
        Self {
            inferred: ContentAttrs::infer(path),
            ..Default::default()
        }
    }

    /// Install the attributes a store holds for the object
    pub fn with_stored(mut self, stored: ContentAttrs) -> Self {
        self.stored = Some(stored);
        self
    }

    /// Values guessed from the filename
    pub fn inferred(&self) -> &ContentAttrs {
        &self.inferred
    }

    /// Values read from the backend, if the object existed
    pub fn stored(&self) -> Option<&ContentAttrs> {
        self.stored.as_ref()
    }

    /// Caller assignments
    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    /// Effective content type
    pub fn content_type(&self) -> &str {
        match (&self.overrides.content_type, &self.stored) {
            (Some(ct), _) => ct,
            (None, Some(stored)) => &stored.content_type,
            (None, None) => &self.inferred.content_type,
        }
    }

    /// Effective content encoding
    pub fn content_encoding(&self) -> &str {
        match (&self.overrides.content_encoding, &self.stored) {
            (Some(ce), _) => ce,
            (None, Some(stored)) => &stored.content_encoding,
            (None, None) => &self.inferred.content_encoding,
        }
    }

    /// Effective pair
    pub fn resolve(&self) -> ContentAttrs {
        ContentAttrs::new(self.content_type(), self.content_encoding())
    }

    pub(crate) fn set_content_type(&mut self, value: String) {
        self.overrides.content_type = Some(value);
    }

    pub(crate) fn set_content_encoding(&mut self, value: String) {
        self.overrides.content_encoding = Some(value);
    }
}
