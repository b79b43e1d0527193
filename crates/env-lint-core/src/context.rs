//! Context types for rule execution.

use std::path::{Path, PathBuf};

use crate::syntax::Span;
use crate::types::Location;

/// Context provided to per-file rules.
///
/// Carries the file being analyzed and the working directory of the
/// analysis run, which rules use to resolve project-relative resources.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Path relative to the analysis root.
    pub relative_path: PathBuf,
    /// Working directory of the analysis run.
    pub cwd: &'a Path,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path, cwd: &'a Path) -> Self {
        let relative_path = match path.strip_prefix(root) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
            _ => path.to_path_buf(),
        };

        Self {
            path,
            content,
            relative_path,
            cwd,
        }
    }

    /// Builds a violation location for a node of this file.
    #[must_use]
    pub fn location(&self, span: Span) -> Location {
        Location::from_span(self.relative_path.clone(), span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_strips_root() {
        let ctx = FileContext::new(
            Path::new("/work/app/src/server.ts"),
            "",
            Path::new("/work/app"),
            Path::new("/work/app"),
        );
        assert_eq!(ctx.relative_path, PathBuf::from("src/server.ts"));
    }

    #[test]
    fn relative_path_falls_back_to_full_path() {
        let ctx = FileContext::new(
            Path::new("/elsewhere/index.js"),
            "",
            Path::new("/work/app"),
            Path::new("/work/app"),
        );
        assert_eq!(ctx.relative_path, PathBuf::from("/elsewhere/index.js"));
    }

    #[test]
    fn single_file_root_keeps_full_path() {
        let ctx = FileContext::new(
            Path::new("/work/app/index.js"),
            "",
            Path::new("/work/app/index.js"),
            Path::new("/work/app"),
        );
        assert_eq!(ctx.relative_path, PathBuf::from("/work/app/index.js"));
    }

    #[test]
    fn location_uses_relative_path() {
        let ctx = FileContext::new(
            Path::new("/work/app/src/index.js"),
            "",
            Path::new("/work/app"),
            Path::new("/work/app"),
        );
        let loc = ctx.location(Span {
            line: 4,
            column: 9,
            offset: 50,
            length: 20,
        });
        assert_eq!(loc.file, PathBuf::from("src/index.js"));
        assert_eq!((loc.line, loc.column, loc.offset), (4, 9, 50));
    }
}
