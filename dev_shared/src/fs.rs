use std::path::Path;
use std::time::SystemTime;
use std::{fs, io};

use tempfile::{NamedTempFile, TempDir};

/// Creates a new temporary file that is cleaned up when dropped.
pub fn create_temp_file() -> Result<NamedTempFile, io::Error> {
  Ok(NamedTempFile::new()?)
}

/// Creates a new temporary directory that is cleaned up when dropped.
pub fn create_temp_dir() -> Result<TempDir, io::Error> {
  Ok(TempDir::new()?)
}

/// Writes `contents` to the file at `path`, repeating the write until the file's last modified
/// time changes. Some modified time implementations have low precision, so a single write in
/// quick succession may not register as a modification.
pub fn write_until_modified(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<SystemTime, io::Error> {
  let path = path.as_ref();
  let contents = contents.as_ref();
  let previous_modified = modified_or_epoch(path)?;
  loop {
    fs::write(path, contents)?;
    let modified = modified_or_epoch(path)?;
    if modified != previous_modified {
      return Ok(modified);
    }
  }
}

fn modified_or_epoch(path: &Path) -> Result<SystemTime, io::Error> {
  match fs::metadata(path) {
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(SystemTime::UNIX_EPOCH),
    Err(e) => Err(e),
    Ok(metadata) => metadata.modified(),
  }
}
