//! Sequential traversal of the regular files under a path.

use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};

use blocktype_core::ClassifyError;

/// Call `visit` for every regular file at or below `root`.
///
/// A root that is itself a file is visited directly. Directories are walked
/// serially in sorted order, following symbolic links. The first traversal
/// error or error returned by `visit` stops the walk.
pub fn for_each_regular_file<F>(root: &Path, mut visit: F) -> Result<(), ClassifyError>
where
    F: FnMut(PathBuf) -> Result<(), ClassifyError>,
{
    let metadata = std::fs::metadata(root).map_err(|e| ClassifyError::open(root, e))?;
    if !metadata.is_dir() {
        if metadata.is_file() {
            visit(root.to_path_buf())?;
        }
        return Ok(());
    }

    let walker = WalkDir::new(root)
        .parallelism(Parallelism::Serial)
        .sort(true)
        .skip_hidden(false)
        .follow_links(true);

    for entry_result in walker {
        let entry = entry_result.map_err(|err| ClassifyError::Walk {
            path: err.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf()),
            message: err.to_string(),
        })?;

        if entry.file_type().is_file() {
            visit(entry.path())?;
        }
    }

    Ok(())
}
