//! Theme asset copying.

use std::fs;
use std::io;
use std::path::Path;

use tracing::warn;

/// Recursively copy `src` into `dst`, returning the number of files copied.
///
/// A missing source directory is not an error; themes without assets are
/// legal, so it logs a warning and copies nothing.
pub fn copy_dir_all(src: &Path, dst: &Path) -> io::Result<usize> {
    if !src.is_dir() {
        warn!("asset directory {} does not exist, skipping", src.display());
        return Ok(0);
    }

    fs::create_dir_all(dst)?;
    let mut copied = 0;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copied += copy_dir_all(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}
