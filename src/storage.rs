//! Opening and replacing the flat files the ledger and the credential store
//! live in.

use std::fs::File;
use std::io;
use std::path::Path;

use tempfile::NamedTempFile;

/// Opens `path` for reading. A missing file is `None` rather than an error,
/// callers decide what a first run looks like.
pub fn open_existing(path: &Path) -> io::Result<Option<File>> {
    match File::open(path) {
        Ok(f) => Ok(Some(f)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Replaces the contents of `path` with whatever `write` produces. The new
/// contents go to a temporary file in the same directory which is renamed
/// over `path` only once `write` has succeeded, so readers see either the old
/// or the new file in full.
pub fn replace_file<F, E>(path: &Path, write: F) -> Result<(), E>
where
    F: FnOnce(&mut NamedTempFile) -> Result<(), E>,
    E: From<io::Error>,
{
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    write(&mut tmp)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
