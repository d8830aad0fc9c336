//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the extraction engine and the
//! file system. Implementations live in other crates.

/// Trait for reading source files by name
///
/// Implemented by the CLI (directory on disk) and by in-memory sources in tests.
/// Implementations must be shareable across worker threads.
pub trait SourceProvider: Send + Sync {
    /// Error type for source operations
    type Error: std::fmt::Display + Send;

    /// Read a file's bytes; `Ok(None)` when the file does not exist
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, Self::Error>;

    /// All file names available, sorted
    fn list(&self) -> Result<Vec<String>, Self::Error>;

    /// File names with the given prefix and `.xml` suffix, sorted
    fn list_matching(&self, prefix: &str) -> Result<Vec<String>, Self::Error> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|name| name.starts_with(prefix) && name.ends_with(".xml"))
            .collect())
    }
}
