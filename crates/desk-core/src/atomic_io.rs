//! Crash-safe text file replacement.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};

/// Replaces `path` with `content` via a sibling temp file and a rename.
///
/// The rename is atomic on POSIX filesystems, so a reader sees either the
/// previous document or the new one in full, and a crash mid-write leaves
/// the original untouched. Missing parent directories are created.
pub fn write_text_atomic(path: &Path, content: &str) -> Result<()> {
    let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
        bail!("'{}' has no usable file name", path.display());
    };
    if path.is_dir() {
        bail!("'{}' is a directory", path.display());
    }

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory {}", dir.display()))?;

    // Pid-scoped name: concurrent processes stage to distinct files, and a
    // leftover from a crashed run is overwritten by the next write.
    let staged = dir.join(format!(".{file_name}.{}.part", std::process::id()));
    let mut file = std::fs::File::create(&staged)
        .with_context(|| format!("failed to stage {}", staged.display()))?;
    file.write_all(content.as_bytes())
        .and_then(|_| file.sync_all())
        .with_context(|| format!("failed to write {}", staged.display()))?;
    drop(file);

    std::fs::rename(&staged, path)
        .with_context(|| format!("failed to move staged write into {}", path.display()))
}
