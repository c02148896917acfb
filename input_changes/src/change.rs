use std::path::{Path, PathBuf};

use crate::fingerprint::Fingerprint;

/// How a declared input changed relative to the previous successful execution of its task.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ChangeKind {
  /// The input was not present in the previous execution.
  Added,
  /// The input was present in the previous execution, but its fingerprint differs.
  Modified,
  /// The input was present in the previous execution, but is gone now.
  Removed,
}

/// One changed input of a task invocation. Immutable once produced by a change set; the
/// coordinator never retains it beyond the consumer callback it is delivered to.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct InputChange {
  path: PathBuf,
  kind: ChangeKind,
  fingerprint: Fingerprint,
}

impl InputChange {
  /// Creates an input change for `path` with given `kind`. For [added](ChangeKind::Added) and
  /// [modified](ChangeKind::Modified) changes, `fingerprint` is the current fingerprint of the
  /// input; for [removed](ChangeKind::Removed) changes, it is the fingerprint the input had in
  /// the previous execution.
  #[inline]
  pub fn new(path: impl Into<PathBuf>, kind: ChangeKind, fingerprint: Fingerprint) -> Self {
    Self { path: path.into(), kind, fingerprint }
  }

  #[inline]
  pub fn path(&self) -> &Path { &self.path }
  #[inline]
  pub fn kind(&self) -> ChangeKind { self.kind }
  #[inline]
  pub fn fingerprint(&self) -> Fingerprint { self.fingerprint }

  /// Whether this change is delivered through the out-of-date phase.
  #[inline]
  pub fn is_out_of_date(&self) -> bool {
    matches!(self.kind, ChangeKind::Added | ChangeKind::Modified)
  }
  /// Whether this change is delivered through the removed phase.
  #[inline]
  pub fn is_removed(&self) -> bool {
    matches!(self.kind, ChangeKind::Removed)
  }
}
