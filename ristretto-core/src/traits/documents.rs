//! Profile document source

use crate::profile::ProfileOverride;

/// Trait for reading profile documents
///
/// Implementations resolve a document path relative to their own data
/// root. Parsing is field by field: a malformed field is `None` in the
/// returned override.
pub trait ProfileSource {
    /// Read the document at `path`
    ///
    /// Returns `None` if the document does not exist.
    fn read_override(&mut self, path: &str) -> Option<ProfileOverride>;
}

/// Source with no documents; every profile uses its default targets
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProfileDocuments;

impl ProfileSource for NoProfileDocuments {
    fn read_override(&mut self, _path: &str) -> Option<ProfileOverride> {
        None
    }
}
