//! Test fixtures for library and streaming tests.
//!
//! Provides temporary audio/metadata directory layouts and helpers to
//! write files with controlled modification times.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

// Type alias for complex return type
type TempLibraryDirs = (tempfile::TempDir, PathBuf, PathBuf);

/// Creates a temporary `audio_files` / `meta_data_files` pair.
///
/// # Panics
///
/// Panics if temporary directory creation fails or if subdirectories cannot be created.
/// This is acceptable in test fixtures where failures indicate environment issues.
pub fn create_temp_library_dirs() -> TempLibraryDirs {
    let temp_dir = tempfile::tempdir().unwrap();
    let audio_dir = temp_dir.path().join("audio_files");
    let metadata_dir = temp_dir.path().join("meta_data_files");

    std::fs::create_dir_all(&audio_dir).unwrap();
    std::fs::create_dir_all(&metadata_dir).unwrap();

    (temp_dir, audio_dir, metadata_dir)
}

/// Fixed reference instant so timestamps in tests are reproducible.
pub fn base_time() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

/// Writes `contents` to `dir/name` and sets its modification time.
///
/// # Panics
///
/// Panics if the file cannot be written or its timestamp cannot be set.
pub fn write_audio_file(dir: &Path, name: &str, contents: &[u8], modified: SystemTime) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    std::fs::File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(modified)
        .unwrap();
    path
}

/// Deterministic byte pattern where each byte equals its offset modulo 256.
pub fn patterned_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 256) as u8).collect()
}
