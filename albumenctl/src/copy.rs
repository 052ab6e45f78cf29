use std::{fs, path::Path};

use tracing::trace;
use walkdir::WalkDir;

use crate::error::{BuildError, Result};

/// Recursively copy the contents of `src` into `dest`, returning the number
/// of files copied. Existing files in `dest` are overwritten.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<usize> {
    if !src.is_dir() {
        return Err(BuildError::BuildOutputMissing(src.to_path_buf()));
    }

    fs::create_dir_all(dest)
        .map_err(|e| BuildError::io(format!("failed to create {}", dest.display()), e))?;

    let mut copied = 0;
    for entry in WalkDir::new(src).min_depth(1).follow_links(true) {
        let entry = entry
            .map_err(|e| BuildError::io(format!("failed to read {}", src.display()), e.into()))?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| BuildError::io(format!("failed to create {}", target.display()), e))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                BuildError::io(format!("failed to create {}", parent.display()), e)
            })?;
        }
        fs::copy(entry.path(), &target).map_err(|e| {
            BuildError::io(
                format!(
                    "failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                ),
                e,
            )
        })?;
        trace!("Copied {}", relative.display());
        copied += 1;
    }

    Ok(copied)
}
