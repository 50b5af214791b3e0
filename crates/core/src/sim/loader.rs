//! Source Loader.
//!
//! Reads assembly source files from disk. Failures are returned to the caller
//! as [`SimError::Io`] rather than terminating the process, so an interactive
//! front end can keep running with its previous source.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::common::error::SimError;

/// Reads an assembly source file into a string.
///
/// # Arguments
///
/// * `path` - Path to the source file.
///
/// # Errors
///
/// [`SimError::Io`] if the file cannot be read or is not valid UTF-8.
pub fn load_source(path: impl AsRef<Path>) -> Result<String, SimError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "loaded source");
    Ok(text)
}
