use std::error::Error;
use std::path::PathBuf;

use crate::change::{ChangeKind, InputChange};
use crate::fingerprint::Fingerprinter;
use crate::snapshot::InputSnapshot;

/// Capability to produce the two change sequences of one task invocation: inputs that are
/// out-of-date (added or modified since the previous successful execution), and inputs that
/// were removed since then.
///
/// The coordinator calls each method exactly once per invocation, out-of-date first. Both
/// sequences must be stable within one instance: producing a sequence twice from the same
/// instance must yield the same elements in the same order.
pub trait ChangeSet {
  /// Produces the changes for inputs that are new or modified.
  fn out_of_date_changes(&self) -> Result<Vec<InputChange>, Box<dyn Error>>;
  /// Produces the changes for inputs that no longer exist.
  fn removed_changes(&self) -> Result<Vec<InputChange>, Box<dyn Error>>;
}

impl<C: ChangeSet + ?Sized> ChangeSet for Box<C> {
  #[inline]
  fn out_of_date_changes(&self) -> Result<Vec<InputChange>, Box<dyn Error>> {
    (**self).out_of_date_changes()
  }
  #[inline]
  fn removed_changes(&self) -> Result<Vec<InputChange>, Box<dyn Error>> {
    (**self).removed_changes()
  }
}

/// Change set that reports every declared input as [added](ChangeKind::Added) and nothing as
/// removed. Used when no usable snapshot of the previous execution exists, or when incremental
/// execution is disabled, forcing the task to rebuild from scratch.
#[derive(Clone, Debug)]
pub struct FullChangeSet {
  inputs: Vec<PathBuf>,
  fingerprinter: Fingerprinter,
}

impl FullChangeSet {
  /// Creates a full change set over the declared `inputs` of a task. Inputs are delivered in
  /// path order, each fingerprinted with `fingerprinter` at the time the sequence is produced.
  pub fn new(inputs: impl IntoIterator<Item = impl Into<PathBuf>>, fingerprinter: Fingerprinter) -> Self {
    let mut inputs: Vec<_> = inputs.into_iter().map(|p| p.into()).collect();
    inputs.sort();
    inputs.dedup();
    Self { inputs, fingerprinter }
  }
}

impl ChangeSet for FullChangeSet {
  fn out_of_date_changes(&self) -> Result<Vec<InputChange>, Box<dyn Error>> {
    let mut changes = Vec::with_capacity(self.inputs.len());
    for path in &self.inputs {
      let fingerprint = self.fingerprinter.fingerprint(path)?;
      changes.push(InputChange::new(path.clone(), ChangeKind::Added, fingerprint));
    }
    Ok(changes)
  }

  #[inline]
  fn removed_changes(&self) -> Result<Vec<InputChange>, Box<dyn Error>> {
    Ok(Vec::new())
  }
}

/// Change set computed from a structural diff between the snapshot of the previous successful
/// execution and a snapshot of the current state of the declared inputs. Only the actual delta
/// is reported. Both sequences are in path order.
///
/// An input with an [absent](crate::Fingerprint::is_absent) current fingerprint is treated the
/// same as an input missing from the current snapshot entirely: if it existed before, it is
/// removed; otherwise it is no change at all.
#[derive(Clone, Debug)]
pub struct IncrementalChangeSet {
  previous: InputSnapshot,
  current: InputSnapshot,
}

impl IncrementalChangeSet {
  #[inline]
  pub fn new(previous: InputSnapshot, current: InputSnapshot) -> Self {
    Self { previous, current }
  }
}

impl ChangeSet for IncrementalChangeSet {
  fn out_of_date_changes(&self) -> Result<Vec<InputChange>, Box<dyn Error>> {
    let mut changes = Vec::new();
    for (path, fingerprint) in self.current.iter() {
      if fingerprint.is_absent() {
        continue; // Disappearance is reported through the removed sequence.
      }
      match self.previous.get(path) {
        Some(previous_fingerprint) if previous_fingerprint.is_absent() => {
          changes.push(InputChange::new(path.clone(), ChangeKind::Added, *fingerprint));
        }
        Some(previous_fingerprint) if previous_fingerprint != fingerprint => {
          changes.push(InputChange::new(path.clone(), ChangeKind::Modified, *fingerprint));
        }
        Some(_) => {} // Unchanged input.
        None => changes.push(InputChange::new(path.clone(), ChangeKind::Added, *fingerprint)),
      }
    }
    Ok(changes)
  }

  fn removed_changes(&self) -> Result<Vec<InputChange>, Box<dyn Error>> {
    let mut changes = Vec::new();
    for (path, fingerprint) in self.previous.iter() {
      if fingerprint.is_absent() {
        continue; // Did not exist in the previous execution either.
      }
      let gone = match self.current.get(path) {
        None => true, // No longer a declared input.
        Some(current_fingerprint) => current_fingerprint.is_absent(),
      };
      if gone {
        // Removed changes carry the fingerprint the input had in the previous execution.
        changes.push(InputChange::new(path.clone(), ChangeKind::Removed, *fingerprint));
      }
    }
    Ok(changes)
  }
}
