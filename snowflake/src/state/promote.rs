//! Moving a finished artifact into the stash.

use {
    super::ok_if_already_exists,
    os_ext::{RENAME_NOREPLACE, renameat2},
    std::{io, path::Path},
};

/// Move `scratch_output_path` to `dest`, a content-addressed stash
/// path. If `dest` already exists, the rename is discarded in favor of
/// the existing entry: by the engine's invariant that a build hash
/// always produces content-identical output, whatever is already
/// there is exactly what we would have written.
pub fn promote(scratch_output_path: &Path, dest: &Path) -> io::Result<()>
{
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }

    renameat2(None, scratch_output_path, None, dest, RENAME_NOREPLACE)
        .or_else(ok_if_already_exists)
}
