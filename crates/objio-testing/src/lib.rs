//! Testing utilities and fixtures for objio
//!
//! This crate provides temporary directories, payload fixtures, an in-memory
//! remote client with failure injection, and assertions for close errors.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub mod assertions;
pub mod fixtures;
pub mod helpers;
pub mod remote;

pub use remote::{Call, MemoryRemote, StoredObject};

/// Creates a temporary test directory with cleanup on drop
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    /// Creates a new temporary test directory
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Returns the path to the temporary directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of `name` inside the directory, as a plain local URI
    pub fn uri(&self, name: &str) -> String {
        self.dir.path().join(name).to_string_lossy().into_owned()
    }

    /// `file://` URI of `name` inside the directory
    pub fn file_uri(&self, name: &str) -> String {
        format!("file://{}", self.uri(name))
    }

    /// Creates a file with the given name and content in the test directory
    pub fn create_file(&self, name: &str, content: &[u8]) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Reads back a file from the test directory
    pub fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        Ok(std::fs::read(self.dir.path().join(name))?)
    }
}
