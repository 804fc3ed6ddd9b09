//! Single-slot on-disk cache of the version manifest.
//!
//! A run either replaces the whole cache file with the freshly fetched
//! document or leaves it exactly as it was.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::config::CacheConfig;
use crate::error::{Error, Result};
use crate::fetch::ManifestSource;

/// Indentation used for the cached document.
const INDENT: &[u8] = b"    ";

/// How a run that reached the server ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// The document was written to this path.
    Written(PathBuf),
    /// The server answered with a status other than 200; nothing was written.
    Rejected {
        /// Status code received.
        status: u16,
    },
}

/// What: Serialize a JSON document with 4-space indentation.
///
/// Inputs:
/// - `document`: Parsed JSON tree
///
/// Output:
/// - UTF-8 bytes without a trailing newline
///
/// # Errors
/// - Returns `Err(Error::Encode)` if serialization fails
///
/// Details:
/// - Object keys keep their original order, so the same document always renders to the same bytes.
/// - Non-ASCII text is written as UTF-8 rather than `\u` escapes.
pub fn render_pretty(document: &Value) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    document.serialize(&mut serializer).map_err(Error::Encode)?;
    Ok(buffer)
}

/// What: Replace `path` with `contents` in one step.
///
/// Inputs:
/// - `path`: Destination file; its parent directory is created if missing
/// - `contents`: Full new file contents
///
/// Output:
/// - `Ok(())` once the new contents are in place
///
/// # Errors
/// - Returns `Err(Error::Io)` if the directory, temp file, write or rename fails
///
/// Details:
/// - Writes to a temp file in the same directory, syncs it and renames it
///   over `path`, so readers never observe a partially written file.
/// - An existing file keeps its permissions; a new file gets `0o644` minus the umask.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(Error::io(dir))?;

    let existing = std::fs::metadata(path).ok().map(|meta| meta.permissions());
    let mut builder = tempfile::Builder::new();
    if let Some(permissions) = staging_permissions(existing.as_ref()) {
        builder.permissions(permissions);
    }
    let mut staged = builder.tempfile_in(dir).map_err(Error::io(dir))?;
    // The builder's mode is filtered by the umask; restore an existing mode exactly.
    if let Some(permissions) = existing {
        staged
            .as_file()
            .set_permissions(permissions)
            .map_err(Error::io(staged.path()))?;
    }

    staged.write_all(contents).map_err(Error::io(staged.path()))?;
    staged.as_file().sync_all().map_err(Error::io(staged.path()))?;
    staged.persist(path).map_err(|e| Error::io(path)(e.error))?;
    Ok(())
}

/// What: Pick the mode the staged file is created with.
///
/// Inputs:
/// - `existing`: Permissions of the file being replaced, if any
///
/// Output:
/// - Those permissions, or `0o644` for a new file
#[cfg(unix)]
fn staging_permissions(existing: Option<&std::fs::Permissions>) -> Option<std::fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;

    Some(
        existing
            .cloned()
            .unwrap_or_else(|| std::fs::Permissions::from_mode(0o644)),
    )
}

/// Non-unix targets keep the platform default for the staged file.
#[cfg(not(unix))]
fn staging_permissions(_existing: Option<&std::fs::Permissions>) -> Option<std::fs::Permissions> {
    None
}

/// What: Fetch the manifest once and refresh the cache file.
///
/// Inputs:
/// - `source`: Where the manifest comes from
/// - `config`: Cache directory and file name
///
/// Output:
/// - `Update::Written(path)` after a 200 response was re-encoded and stored
/// - `Update::Rejected { status }` for any other status; the cache is untouched
///
/// # Errors
/// - Returns `Err(Error::Request)` when the request fails outright
/// - Returns `Err(Error::Decode)` when a 200 body is not JSON
/// - Returns `Err(Error::Io)` when the cache file cannot be written
///
/// Details:
/// - Logs an INFO line before the request and after a write, and an ERROR
///   line carrying the response body on rejection. No retries.
pub fn update(source: &impl ManifestSource, config: &CacheConfig) -> Result<Update> {
    tracing::info!(url = %source.location(), "Updating version manifest");

    let fetched = source.fetch()?;
    if !fetched.is_ok() {
        tracing::error!(
            status = fetched.status,
            body = %fetched.body_text(),
            "Status code did not return 200 OK"
        );
        return Ok(Update::Rejected {
            status: fetched.status,
        });
    }

    let document: Value = serde_json::from_slice(&fetched.body).map_err(Error::Decode)?;
    let text = render_pretty(&document)?;

    let target = config.target_path();
    write_atomic(&target, &text)?;
    tracing::info!(path = %target.display(), "Wrote version manifest");
    Ok(Update::Written(target))
}
