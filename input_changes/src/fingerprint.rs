use std::fmt::{Debug, Formatter};
use std::fs::Metadata;
use std::path::Path;
use std::time::SystemTime;
use std::{fs, io};

// Fingerprinters

/// Selects how a declared input is fingerprinted for change detection.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Fingerprinter {
  /// Fingerprint by whether something exists at the path.
  Exists,
  /// Fingerprint by last modified time.
  Modified,
  /// Fingerprint by hashing file contents, or directory entry names for directories.
  #[cfg(feature = "hash_fingerprints")]
  Hash,
}

impl Fingerprinter {
  /// Fingerprints whatever is currently at given `path`. A path at which nothing exists
  /// fingerprints as the absent form of the selected fingerprint, not as an error.
  pub fn fingerprint(&self, path: impl AsRef<Path>) -> Result<Fingerprint, io::Error> {
    match self {
      Fingerprinter::Exists => {
        Ok(Fingerprint::Exists(path.as_ref().try_exists()?))
      }
      Fingerprinter::Modified => {
        let Some(metadata) = metadata(path)? else {
          return Ok(Fingerprint::Modified(None));
        };
        Ok(Fingerprint::Modified(Some(metadata.modified()?)))
      }
      #[cfg(feature = "hash_fingerprints")]
      Fingerprinter::Hash => {
        let Some(metadata) = metadata(&path)? else {
          return Ok(Fingerprint::Hash(None));
        };

        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        if metadata.is_file() {
          let mut file = fs::File::open(&path)?;
          io::copy(&mut file, &mut hasher)?;
        } else {
          for entry in fs::read_dir(path)? {
            hasher.update(entry?.file_name().to_string_lossy().as_bytes());
          }
        }
        Ok(Fingerprint::Hash(Some(hasher.finalize().into())))
      }
    }
  }
}

/// Fingerprint of (the state of) one declared input, produced by a [`Fingerprinter`].
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Fingerprint {
  Exists(bool),
  Modified(Option<SystemTime>),
  Hash(Option<[u8; 32]>),
}

impl Fingerprint {
  /// Whether this fingerprint was taken at a path at which nothing existed. Every
  /// fingerprinter has such an absent form, so that inputs that appear or disappear between
  /// two snapshots are detectable regardless of the fingerprinter in use.
  #[inline]
  pub fn is_absent(&self) -> bool {
    matches!(
      self,
      Fingerprint::Exists(false) | Fingerprint::Modified(None) | Fingerprint::Hash(None)
    )
  }
}

impl Debug for Fingerprint {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Fingerprint::Exists(b) => write!(f, "Exists({:?})", b),
      Fingerprint::Modified(st) => write!(f, "Modified({:?})", st),
      Fingerprint::Hash(None) => write!(f, "Hash(None)"),
      Fingerprint::Hash(Some(h)) => {
        f.write_str("Hash(")?;
        for b in h {
          write!(f, "{:02x}", b)?;
        }
        f.write_str(")")
      }
    }
  }
}

/// Gets the metadata for given `path`, returning:
/// - `Ok(Some(metadata))` if a file or directory exists at given path,
/// - `Ok(None)` if nothing exists at given path,
/// - `Err(e)` if there was an error getting the metadata for given path.
fn metadata(path: impl AsRef<Path>) -> Result<Option<Metadata>, io::Error> {
  match fs::metadata(path) {
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
    Err(e) => Err(e),
    Ok(m) => Ok(Some(m)),
  }
}


#[cfg(test)]
mod test {
  use std::fs;
  use std::io;

  use dev_shared::fs::{create_temp_file, write_until_modified};

  use super::*;

  #[test]
  fn test_exists_fingerprinter() -> Result<(), io::Error> {
    let fingerprinter = Fingerprinter::Exists;
    let temp_file = create_temp_file()?;
    let fingerprint = fingerprinter.fingerprint(&temp_file)?;
    assert_eq!(fingerprint, fingerprinter.fingerprint(&temp_file)?);

    fs::remove_file(&temp_file)?;
    assert_ne!(fingerprint, fingerprinter.fingerprint(&temp_file)?);
    Ok(())
  }

  #[test]
  fn test_modified_fingerprinter() -> Result<(), io::Error> {
    let fingerprinter = Fingerprinter::Modified;
    let temp_file = create_temp_file()?;
    let fingerprint = fingerprinter.fingerprint(&temp_file)?;
    assert_eq!(fingerprint, fingerprinter.fingerprint(&temp_file)?);

    write_until_modified(&temp_file, "changed contents")?;
    assert_ne!(fingerprint, fingerprinter.fingerprint(&temp_file)?, "modified fingerprint is equal after modifying file");

    fs::remove_file(&temp_file)?;
    assert_ne!(fingerprint, fingerprinter.fingerprint(&temp_file)?, "modified fingerprint is equal after removing file");
    Ok(())
  }

  #[test]
  fn test_modified_fingerprinter_non_existent() -> Result<(), io::Error> {
    let fingerprinter = Fingerprinter::Modified;
    let temp_file = create_temp_file()?;
    fs::remove_file(&temp_file)?;
    assert_eq!(Fingerprint::Modified(None), fingerprinter.fingerprint(&temp_file)?);
    Ok(())
  }
}
