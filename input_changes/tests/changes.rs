use std::error::Error;
use std::fs::{remove_file, write};

use assert_matches::assert_matches;
use rstest::rstest;
use tempfile::TempDir;

use ::input_changes::{
  ChangeKind, ChangesError, FullChangeSet, Fingerprinter, IncrementalChangeSet, InputChanges,
  InputSnapshot,
};
use dev_shared::fs::write_until_modified;
use dev_shared::test::temp_dir;

#[rstest]
fn test_incremental_change_delivery(temp_dir: TempDir) -> Result<(), Box<dyn Error>> {
  let unchanged = temp_dir.path().join("unchanged.txt");
  let modified = temp_dir.path().join("modified.txt");
  let removed = temp_dir.path().join("removed.txt");
  let added = temp_dir.path().join("added.txt");
  write(&unchanged, "unchanged")?;
  write(&modified, "before")?;
  write(&removed, "removed")?;

  // Snapshot the declared inputs as they were after the previous execution.
  let inputs = [&unchanged, &modified, &removed];
  let previous = InputSnapshot::capture(inputs, Fingerprinter::Modified)?;
  let removed_fingerprint = *previous.get(&removed).expect("removed input must be in previous snapshot");

  // Change the inputs: modify one, remove one, add one.
  write_until_modified(&modified, "after")?;
  remove_file(&removed)?;
  write(&added, "added")?;

  let inputs = [&unchanged, &modified, &removed, &added];
  let current = InputSnapshot::capture(inputs, Fingerprinter::Modified)?;
  let mut changes = InputChanges::new(IncrementalChangeSet::new(previous, current));

  // Out-of-date changes come first: the added and the modified input, in path order. The
  // unchanged and the removed input are not part of this sequence.
  let mut out_of_date = Vec::new();
  changes.out_of_date(|change| {
    out_of_date.push((change.path().to_path_buf(), change.kind()));
    Ok(())
  })?;
  assert_eq!(out_of_date, [
    (added.clone(), ChangeKind::Added),
    (modified.clone(), ChangeKind::Modified),
  ]);

  // Then the removed input, carrying the fingerprint it had in the previous execution.
  let mut removed_changes = Vec::new();
  changes.removed(|change| {
    assert_eq!(change.fingerprint(), removed_fingerprint);
    removed_changes.push((change.path().to_path_buf(), change.kind()));
    Ok(())
  })?;
  assert_eq!(removed_changes, [(removed.clone(), ChangeKind::Removed)]);
  assert!(changes.removed_processed());
  Ok(())
}

#[rstest]
fn test_full_change_set_delivers_all_inputs_as_added(temp_dir: TempDir) -> Result<(), Box<dyn Error>> {
  let paths = ["a.txt", "b.txt", "c.txt"].map(|n| temp_dir.path().join(n));
  for path in &paths {
    write(path, "contents")?;
  }

  let mut changes = InputChanges::new(FullChangeSet::new(paths.clone(), Fingerprinter::Modified));

  let mut out_of_date = Vec::new();
  changes.out_of_date(|change| {
    assert_eq!(change.kind(), ChangeKind::Added);
    out_of_date.push(change.path().to_path_buf());
    Ok(())
  })?;
  assert_eq!(out_of_date, paths);

  let mut removed_invocations = 0;
  changes.removed(|_| {
    removed_invocations += 1;
    Ok(())
  })?;
  assert_eq!(removed_invocations, 0);
  Ok(())
}

#[rstest]
fn test_out_of_order_processing_is_rejected(temp_dir: TempDir) -> Result<(), Box<dyn Error>> {
  let path = temp_dir.path().join("in.txt");
  write(&path, "contents")?;
  let mut changes = InputChanges::new(FullChangeSet::new([&path], Fingerprinter::Modified));

  assert_matches!(changes.removed(|_| Ok(())), Err(ChangesError::OutOfOrderPhase));

  // The rejected call did not consume the out-of-date phase.
  let mut invocations = 0;
  changes.out_of_date(|_| {
    invocations += 1;
    Ok(())
  })?;
  assert_eq!(invocations, 1);
  Ok(())
}
