//! Local filesystem backend

use super::{BackendReader, BackendWriter, Capability};
use crate::config::Config;
use crate::metadata::{ContentAttrs, ObjectAttributes};
use crate::{Error, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A file on the local machine
#[derive(Debug, Clone)]
pub(crate) struct LocalFile {
    path: PathBuf,
    host: Option<String>,
}

impl LocalFile {
    /// Bind to `path`, refusing any host but the local one
    pub(crate) fn new(path: PathBuf, host: Option<&str>) -> Result<Self> {
        check_host(host)?;
        Ok(Self {
            path,
            host: host.map(str::to_string),
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

/// Only an empty host or `localhost` may address local files
pub(crate) fn check_host(host: Option<&str>) -> Result<()> {
    match host {
        None | Some("") | Some("localhost") => Ok(()),
        Some(other) => Err(Error::UnsupportedHost(other.to_string())),
    }
}

impl Capability for LocalFile {
    fn attributes(&self) -> Result<Option<ObjectAttributes>> {
        Ok(None)
    }

    fn decompress_locally(&self, content: &ContentAttrs) -> Result<bool> {
        Ok(content.is_gzip())
    }

    fn open_reader(&self, _compressed: bool) -> Result<BackendReader> {
        debug!(path = ?self.path, "Opening local file for reading");
        let file = File::open(&self.path)?;
        Ok(BackendReader::File(file))
    }

    fn open_writer(&self, _content: &ContentAttrs, config: &Config) -> Result<BackendWriter> {
        check_host(self.host.as_deref())?;

        debug!(path = ?self.path, "Creating local file");
        let file = File::create(&self.path)?;
        Ok(BackendWriter::File {
            file,
            sync_on_close: config.sync_on_close,
        })
    }

    fn delete(&self) -> Result<()> {
        info!(path = ?self.path, "Removing local file");
        fs::remove_file(&self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use tempfile::TempDir;

    #[test]
    fn test_host_guard() {
        assert!(check_host(None).is_ok());
        assert!(check_host(Some("localhost")).is_ok());
        assert!(matches!(
            check_host(Some("fileserver")),
            Err(Error::UnsupportedHost(host)) if host == "fileserver"
        ));
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let local = LocalFile::new(temp_dir.path().join("a.txt"), None).unwrap();

        let mut writer = local
            .open_writer(&ContentAttrs::default(), &Config::default())
            .unwrap();
        writer.write_all(b"hello world").unwrap();
        writer.close().unwrap();

        let mut reader = local.open_reader(false).unwrap();
        let mut contents = String::new();
        reader.read_to_string(&mut contents).unwrap();
        reader.close().unwrap();

        assert_eq!(contents, "hello world");
    }

    #[test]
    fn test_delete_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let local = LocalFile::new(temp_dir.path().join("missing"), None).unwrap();
        assert!(local.delete().unwrap_err().is_not_found());
    }
}
