use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::fingerprint::{Fingerprint, Fingerprinter};

/// Fingerprints of a task's declared inputs, captured at one point in time. An
/// [incremental change set](crate::IncrementalChangeSet) diffs the snapshot of the previous
/// successful execution against a fresh one to determine what changed.
///
/// Iteration is in path order, so sequences computed from a snapshot are deterministic and
/// stable across repeated iteration.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct InputSnapshot {
  fingerprints: BTreeMap<PathBuf, Fingerprint>,
}

impl InputSnapshot {
  /// Creates an empty snapshot, representing a task that has no declared inputs (or has never
  /// been executed).
  #[inline]
  pub fn new() -> Self { Self::default() }

  /// Captures the current fingerprint of every path in `inputs` with given `fingerprinter`.
  /// Inputs at which nothing currently exists are captured with their absent fingerprint, so
  /// that their later (re)appearance is detected as a change.
  pub fn capture(
    inputs: impl IntoIterator<Item = impl Into<PathBuf>>,
    fingerprinter: Fingerprinter,
  ) -> Result<Self, io::Error> {
    let mut fingerprints = BTreeMap::new();
    for input in inputs {
      let path = input.into();
      let fingerprint = fingerprinter.fingerprint(&path)?;
      fingerprints.insert(path, fingerprint);
    }
    Ok(Self { fingerprints })
  }

  /// Sets the fingerprint for `path`, replacing a previously set one.
  #[inline]
  pub fn insert(&mut self, path: impl Into<PathBuf>, fingerprint: Fingerprint) {
    self.fingerprints.insert(path.into(), fingerprint);
  }

  #[inline]
  pub fn get(&self, path: impl AsRef<Path>) -> Option<&Fingerprint> {
    self.fingerprints.get(path.as_ref())
  }
  #[inline]
  pub fn contains(&self, path: impl AsRef<Path>) -> bool {
    self.fingerprints.contains_key(path.as_ref())
  }
  #[inline]
  pub fn len(&self) -> usize { self.fingerprints.len() }
  #[inline]
  pub fn is_empty(&self) -> bool { self.fingerprints.is_empty() }

  /// Iterates entries in path order.
  #[inline]
  pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &Fingerprint)> {
    self.fingerprints.iter()
  }
}
