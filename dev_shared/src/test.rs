use rstest::fixture;
use tempfile::TempDir;

/// Fixture providing a fresh temporary directory per test.
#[fixture]
#[inline]
pub fn temp_dir() -> TempDir {
  crate::fs::create_temp_dir().expect("failed to create temporary directory")
}
