//! Object URIs and scheme classification

use crate::{Error, Result};
use percent_encoding::percent_decode_str;
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Backend family selected by a URI scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// `file://` URIs and scheme-less paths
    File,
    /// `gs://bucket/key` remote objects
    Gs,
}

impl Scheme {
    /// Classify a raw scheme string
    pub fn classify(scheme: &str) -> Result<Self> {
        match scheme {
            "" | "file" => Ok(Scheme::File),
            "gs" => Ok(Scheme::Gs),
            other => Err(Error::UnsupportedScheme(other.to_string())),
        }
    }

    /// Canonical scheme name
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::File => "file",
            Scheme::Gs => "gs",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed object location.
///
/// Input carrying a scheme is parsed as a standard URL. Input without one
/// (`data/report.csv`, `/tmp/x`, `//host/share/x`) is a URI reference to a
/// local path: query and fragment are dropped, escapes are decoded, and a
/// leading `//` introduces a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectUri {
    raw: String,
    url: Option<Url>,
    host: Option<String>,
    /// Decoded path without query or fragment
    path: String,
}

impl ObjectUri {
    /// Parse `uri`
    pub fn parse(uri: &str) -> Result<Self> {
        match Url::parse(uri) {
            Ok(url) => {
                let host = url
                    .host_str()
                    .filter(|host| !host.is_empty())
                    .map(str::to_string);
                let path = decode(url.path());
                Ok(Self {
                    raw: uri.to_string(),
                    url: Some(url),
                    host,
                    path,
                })
            }
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Self::reference(uri)),
            Err(err) => Err(Error::Parse(err)),
        }
    }

    /// A scheme-less reference
    fn reference(raw: &str) -> Self {
        let end = raw.find(|c: char| c == '?' || c == '#').unwrap_or(raw.len());
        let reference = &raw[..end];

        let (host, path) = match reference.strip_prefix("//") {
            Some(rest) => {
                let (authority, path) = rest.split_at(rest.find('/').unwrap_or(rest.len()));
                (Some(authority_host(authority)), path)
            }
            None => (None, reference),
        };

        Self {
            raw: raw.to_string(),
            url: None,
            host: host.filter(|host| !host.is_empty()).map(decode),
            path: decode(path),
        }
    }

    /// Scheme as written, empty for bare paths
    pub fn scheme(&self) -> &str {
        self.url.as_ref().map(Url::scheme).unwrap_or("")
    }

    /// Host component, if any
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Decoded path component, without query or fragment
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The underlying URL, absent for bare paths
    pub fn as_url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// The text this URI was parsed from
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the host names the local machine
    pub fn is_local_host(&self) -> bool {
        matches!(self.host(), None | Some("localhost"))
    }

    /// Filesystem path of a local URI
    pub(crate) fn file_path(&self) -> Result<PathBuf> {
        match &self.url {
            None => Ok(PathBuf::from(&self.path)),
            Some(url) => url
                .to_file_path()
                .map_err(|()| Error::UnsupportedHost(self.host().unwrap_or_default().to_string())),
        }
    }

    /// Bucket and key of a remote URI; the key keeps its escapes and drops
    /// its leading `/`
    pub(crate) fn bucket_and_key(&self) -> (String, String) {
        let bucket = self.host().unwrap_or_default().to_string();
        let escaped = self.url.as_ref().map(Url::path).unwrap_or(&self.path);
        let key = escaped.trim_start_matches('/').to_string();
        (bucket, key)
    }
}

fn decode(text: &str) -> String {
    percent_decode_str(text).decode_utf8_lossy().into_owned()
}

/// Host part of an authority, without user info or port
fn authority_host(authority: &str) -> &str {
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    if host.starts_with('[') {
        return host.find(']').map_or(host, |end| &host[..=end]);
    }
    host.split(':').next().unwrap_or(host)
}

impl fmt::Display for ObjectUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for ObjectUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_paths() {
        let uri = ObjectUri::parse("report.ndjson.gz").unwrap();
        assert_eq!(uri.scheme(), "");
        assert_eq!(uri.host(), None);
        assert_eq!(uri.path(), "report.ndjson.gz");
        assert!(uri.as_url().is_none());

        let uri = ObjectUri::parse("/var/data/events.csv").unwrap();
        assert_eq!(uri.path(), "/var/data/events.csv");
        assert_eq!(uri.file_path().unwrap(), PathBuf::from("/var/data/events.csv"));
    }

    #[test]
    fn test_remote_uri() {
        let uri = ObjectUri::parse("gs://my-bucket/path/to/file.csv.gz").unwrap();
        assert_eq!(uri.scheme(), "gs");
        assert_eq!(uri.host(), Some("my-bucket"));
        assert_eq!(
            uri.bucket_and_key(),
            ("my-bucket".to_string(), "path/to/file.csv.gz".to_string())
        );
    }

    #[test]
    fn test_file_uri_hosts() {
        assert!(ObjectUri::parse("file:///tmp/a.txt").unwrap().is_local_host());
        assert!(ObjectUri::parse("file://localhost/tmp/a.txt").unwrap().is_local_host());

        let uri = ObjectUri::parse("file://fileserver/share/a.txt").unwrap();
        assert!(!uri.is_local_host());
        assert_eq!(uri.host(), Some("fileserver"));
    }

    #[test]
    fn test_classify() {
        assert_eq!(Scheme::classify("").unwrap(), Scheme::File);
        assert_eq!(Scheme::classify("file").unwrap(), Scheme::File);
        assert_eq!(Scheme::classify("gs").unwrap(), Scheme::Gs);

        let err = Scheme::classify("s3").unwrap_err();
        assert_eq!(err.to_string(), "unsupported object uri scheme 's3'");
    }

    #[test]
    fn test_malformed_uri() {
        assert!(matches!(
            ObjectUri::parse("gs://bad host/key"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_network_path_reference() {
        let uri = ObjectUri::parse("//fileserver/share/report.csv").unwrap();
        assert_eq!(uri.scheme(), "");
        assert_eq!(uri.host(), Some("fileserver"));
        assert_eq!(uri.path(), "/share/report.csv");
        assert!(!uri.is_local_host());

        let uri = ObjectUri::parse("//user@nas:445/x").unwrap();
        assert_eq!(uri.host(), Some("nas"));
        assert!(ObjectUri::parse("//localhost/tmp/x").unwrap().is_local_host());
        assert!(ObjectUri::parse("///tmp/x").unwrap().is_local_host());
    }

    #[test]
    fn test_bare_path_reference_syntax() {
        let uri = ObjectUri::parse("/tmp/a%20b.csv?x=1#frag").unwrap();
        assert_eq!(uri.path(), "/tmp/a b.csv");
        assert_eq!(uri.file_path().unwrap(), PathBuf::from("/tmp/a b.csv"));

        let uri = ObjectUri::parse("../data/q%231.json").unwrap();
        assert_eq!(uri.path(), "../data/q#1.json");
        assert_eq!(uri.file_path().unwrap(), PathBuf::from("../data/q#1.json"));
    }

    #[test]
    fn test_file_url_path_matches_file_path() {
        let uri = ObjectUri::parse("file:///tmp/a%20b.csv?x=1").unwrap();
        assert_eq!(uri.path(), "/tmp/a b.csv");
        assert_eq!(uri.file_path().unwrap(), PathBuf::from("/tmp/a b.csv"));
    }

    #[test]
    fn test_escaped_remote_key() {
        let uri = ObjectUri::parse("gs://bucket/dir/my%20file.txt").unwrap();
        let (_, key) = uri.bucket_and_key();
        assert_eq!(key, "dir/my%20file.txt");
        assert_eq!(uri.path(), "/dir/my file.txt");
    }
}
