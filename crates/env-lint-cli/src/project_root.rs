//! Package root discovery.

use std::path::{Component, Path, PathBuf};

const MANIFEST: &str = "package.json";

/// Returns the nearest ancestor of `start` (inclusive) containing a
/// `package.json`, or `None` if there is none.
///
/// Relative paths are taken from the process working directory, so `.`
/// inside `src/` still reaches the package above it.
#[must_use]
pub fn find_package_root(start: &Path) -> Option<PathBuf> {
    let base = std::env::current_dir().ok()?;
    find_package_root_from(start, &base)
}

/// Resolution with the base directory given; keeps tests independent of the
/// process working directory.
fn find_package_root_from(start: &Path, base: &Path) -> Option<PathBuf> {
    let joined = base.join(start);
    let dir = if joined.is_file() {
        joined.parent()?
    } else {
        joined.as_path()
    };

    dir.ancestors()
        .find(|dir| dir.join(MANIFEST).is_file())
        .map(normalize)
}

/// Drops `.` components left over from joining relative paths.
fn normalize(dir: &Path) -> PathBuf {
    dir.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
