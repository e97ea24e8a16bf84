//! Identifier to object key resolution.

use std::fmt;

use crate::error::KeyError;

/// Extension appended to every identifier to form its object key.
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// A validated storage key of the form `<digits>.zip`.
///
/// Only [`resolve`] constructs keys, so holding an `ObjectKey` means the
/// identifier has already been checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier this key was derived from.
    pub fn identifier(&self) -> &str {
        self.0
            .strip_suffix(ARCHIVE_EXTENSION)
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Map an external identifier to its storage key.
///
/// The identifier must be a non-empty run of ASCII digits. Anything else,
/// including path separators, dots and non-ASCII digits, is rejected before a
/// key is built.
pub fn resolve(identifier: &str) -> Result<ObjectKey, KeyError> {
    if identifier.is_empty() {
        return Err(KeyError::Empty);
    }

    if !identifier.bytes().all(|b| b.is_ascii_digit()) {
        return Err(KeyError::NotNumeric(identifier.to_string()));
    }

    Ok(ObjectKey(format!("{}{}", identifier, ARCHIVE_EXTENSION)))
}
