//! Two-phase delivery of input changes to the incremental logic of a task.
//!
//! Before a task is re-executed, the execution engine reports which of its declared inputs
//! changed since the previous successful execution, split into two disjoint categories:
//! out-of-date inputs (new or modified) and removed inputs (no longer present). The
//! [`InputChanges`] coordinator governs how that report is consumed: out-of-date changes are
//! always delivered before removed changes, and each category is delivered exactly once per
//! invocation. Processing removals first would let task logic observe (and build derived state
//! against) an input set that is neither the old nor the new state, for example by deleting an
//! output for a removed input before the replacement input has been reported. The coordinator
//! is the single choke point that makes that ordering violation impossible, independent of
//! which [`ChangeSet`] variant or task-specific consumer is plugged in.
//!
//! One coordinator instance governs exactly one task invocation, driven by a single thread,
//! and is discarded afterwards. Retrying an invocation requires a fresh instance.

use std::error::Error;
use std::fmt;

pub mod change;
pub mod change_set;
pub mod fingerprint;
pub mod snapshot;

pub use change::{ChangeKind, InputChange};
pub use change_set::{ChangeSet, FullChangeSet, IncrementalChangeSet};
pub use fingerprint::{Fingerprint, Fingerprinter};
pub use snapshot::InputSnapshot;

/// Coordinator that delivers the input changes of one task invocation in two ordered phases:
/// first [out-of-date](Self::out_of_date) changes, then [removed](Self::removed) changes. Each
/// phase completes at most once; calling a phase again, or calling `removed` before
/// `out_of_date` has completed, fails without invoking the consumer.
///
/// A phase only counts as processed when every change was delivered without error. If the
/// change set or a consumer fails mid-delivery, the phase is left unprocessed: it can be
/// inspected as such, and may be retried from the start on the same instance.
pub struct InputChanges<C> {
  change_set: C,
  phase: Phase,
}

/// Delivery progress of a coordinator. Modeled as a single enum so that the illegal
/// combination (removed processed but out-of-date not) is unrepresentable.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Phase {
  Init,
  OutOfDateDone,
  BothDone,
}

impl<C: ChangeSet> InputChanges<C> {
  /// Creates a coordinator for one task invocation over given `change_set`. The variant to use
  /// (full or incremental) is the construction-time choice of the execution engine.
  #[inline]
  pub fn new(change_set: C) -> Self {
    Self { change_set, phase: Phase::Init }
  }

  /// Delivers every out-of-date (added or modified) change to `consumer`, in the change set's
  /// order.
  ///
  /// # Errors
  ///
  /// Returns [`ChangesError::RepeatedPhase`] when this phase already completed, without
  /// invoking the consumer. Change set and consumer failures propagate as
  /// [`ChangesError::ChangeSet`] and [`ChangesError::Consumer`], stopping delivery and leaving
  /// the phase unprocessed.
  pub fn out_of_date<F>(&mut self, mut consumer: F) -> Result<(), ChangesError>
  where
    F: FnMut(&InputChange) -> Result<(), Box<dyn Error>>,
  {
    if self.phase != Phase::Init {
      return Err(ChangesError::RepeatedPhase(PhaseKind::OutOfDate));
    }
    let changes = self.change_set.out_of_date_changes().map_err(ChangesError::ChangeSet)?;
    for change in &changes {
      consumer(change).map_err(ChangesError::Consumer)?;
    }
    self.phase = Phase::OutOfDateDone;
    Ok(())
  }

  /// Delivers every removed change to `consumer`, in the change set's order. Legal only after
  /// [`out_of_date`](Self::out_of_date) has completed.
  ///
  /// # Errors
  ///
  /// Returns [`ChangesError::OutOfOrderPhase`] when the out-of-date phase has not completed,
  /// and [`ChangesError::RepeatedPhase`] when this phase already completed; neither invokes
  /// the consumer. Change set and consumer failures propagate as with `out_of_date`.
  pub fn removed<F>(&mut self, mut consumer: F) -> Result<(), ChangesError>
  where
    F: FnMut(&InputChange) -> Result<(), Box<dyn Error>>,
  {
    match self.phase {
      Phase::Init => return Err(ChangesError::OutOfOrderPhase),
      Phase::BothDone => return Err(ChangesError::RepeatedPhase(PhaseKind::Removed)),
      Phase::OutOfDateDone => {}
    }
    let changes = self.change_set.removed_changes().map_err(ChangesError::ChangeSet)?;
    for change in &changes {
      consumer(change).map_err(ChangesError::Consumer)?;
    }
    self.phase = Phase::BothDone;
    Ok(())
  }

  /// Whether the out-of-date phase completed without error.
  #[inline]
  pub fn out_of_date_processed(&self) -> bool {
    self.phase != Phase::Init
  }
  /// Whether the removed phase completed without error.
  #[inline]
  pub fn removed_processed(&self) -> bool {
    self.phase == Phase::BothDone
  }
}

/// The phase a [`ChangesError`] refers to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PhaseKind {
  OutOfDate,
  Removed,
}

impl fmt::Display for PhaseKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PhaseKind::OutOfDate => write!(f, "out-of-date"),
      PhaseKind::Removed => write!(f, "removed"),
    }
  }
}

/// Failure of an [`InputChanges`] phase operation. The coordinator never logs, swallows, or
/// retries: every failure surfaces synchronously to the caller of the operation.
#[derive(Debug)]
pub enum ChangesError {
  /// A phase operation was invoked again after that phase had already completed on this
  /// instance. The caller has a logic bug; the instance cannot recover.
  RepeatedPhase(PhaseKind),
  /// `removed` was invoked before `out_of_date` completed on this instance. The caller has a
  /// logic bug; the instance cannot recover.
  OutOfOrderPhase,
  /// The change set failed while producing a sequence.
  ChangeSet(Box<dyn Error>),
  /// A consumer callback failed while processing a change.
  Consumer(Box<dyn Error>),
}

impl fmt::Display for ChangesError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ChangesError::RepeatedPhase(kind) => {
        write!(f, "cannot process {} changes multiple times", kind)
      }
      ChangesError::OutOfOrderPhase => {
        write!(f, "out-of-date changes must be processed before removed changes")
      }
      ChangesError::ChangeSet(e) => write!(f, "change set failed to produce changes: {}", e),
      ChangesError::Consumer(e) => write!(f, "consumer failed to process a change: {}", e),
    }
  }
}

impl Error for ChangesError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      ChangesError::ChangeSet(e) | ChangesError::Consumer(e) => Some(e.as_ref()),
      _ => None,
    }
  }
}
