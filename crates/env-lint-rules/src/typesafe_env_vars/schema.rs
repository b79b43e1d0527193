//! Locating and reading the environment schema.
//!
//! The schema is a module exporting object literals whose properties build a
//! validator per variable, as in a t3-style `src/env/schema.mjs`:
//!
//! ```js
//! export const serverSchema = z.object({
//!   DATABASE_URL: z.string().url(),
//!   NODE_ENV: z.enum(["development", "test", "production"]),
//! });
//! ```
//!
//! A property declares a variable when its key is a plain identifier and its
//! value is a call whose callee is a member expression. Nothing else about
//! the validator is inspected.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use env_lint_core::{Dialect, SourceTree, Syntax, SyntaxError, SyntaxNode};

/// Schema location relative to the working directory when none is configured.
pub const CONVENTIONAL_SCHEMA_PATH: &str = "src/env/schema.mjs";

/// Where the schema was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaLocation {
    /// Path given by the `schema-path` option; not checked for existence.
    Configured(PathBuf),
    /// Existing file at [`CONVENTIONAL_SCHEMA_PATH`].
    Conventional(PathBuf),
}

impl SchemaLocation {
    /// Returns the resolved path.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Configured(p) | Self::Conventional(p) => p,
        }
    }
}

/// Failures while resolving or reading the schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// No schema configured and none at the conventional path.
    #[error("no environment schema found at {path}")]
    Missing {
        /// Conventional path that was probed.
        path: PathBuf,
    },

    /// The schema path could not be read.
    #[error("failed to read environment schema {path}: {source}")]
    Unreadable {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The schema is not valid source.
    #[error("environment schema {path} does not parse: {source}")]
    Invalid {
        /// Schema path.
        path: PathBuf,
        /// Parser error.
        source: SyntaxError,
    },
}

/// Resolves the schema path for an analysis run.
///
/// A configured path wins and is used as given (relative paths are taken
/// from `cwd`). Otherwise the conventional path must exist.
///
/// # Errors
///
/// Returns [`SchemaError::Missing`] when nothing is configured and the
/// conventional file does not exist.
pub fn resolve(configured: Option<&Path>, cwd: &Path) -> Result<SchemaLocation, SchemaError> {
    if let Some(path) = configured {
        return Ok(SchemaLocation::Configured(cwd.join(path)));
    }

    let path = cwd.join(CONVENTIONAL_SCHEMA_PATH);
    if path.exists() {
        Ok(SchemaLocation::Conventional(path))
    } else {
        Err(SchemaError::Missing { path })
    }
}

/// Variable names a schema declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDeclaration {
    names: BTreeSet<String>,
}

impl SchemaDeclaration {
    /// Reads and parses the schema file at `path`.
    ///
    /// The dialect follows the file extension, defaulting to JavaScript.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Unreadable`] if the file cannot be read and
    /// [`SchemaError::Invalid`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let source = std::fs::read_to_string(path).map_err(|source| SchemaError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let dialect = Dialect::from_path(path).unwrap_or(Dialect::JavaScript);

        let declaration = Self::parse(source, dialect).map_err(|source| SchemaError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            "Loaded {} declared variables from {}",
            declaration.len(),
            path.display()
        );
        Ok(declaration)
    }

    /// Parses schema source text.
    ///
    /// # Errors
    ///
    /// Returns the parser error if the source is not valid.
    pub fn parse(source: impl Into<String>, dialect: Dialect) -> Result<Self, SyntaxError> {
        let tree = SourceTree::parse(source, dialect)?;
        let mut names = BTreeSet::new();
        tree.walk(|node| {
            if let Some(name) = declared_name(node) {
                names.insert(name.to_owned());
            }
        });
        Ok(Self { names })
    }

    /// Whether `name` is declared.
    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Declared names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of declared names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// `NAME: builder.method(...)` yields `NAME`; every other shape is skipped.
fn declared_name(node: SyntaxNode<'_>) -> Option<&str> {
    let Syntax::Pair(pair) = node.syntax() else {
        return None;
    };
    let Syntax::PropertyIdentifier(name) = pair.key.syntax() else {
        return None;
    };
    let Syntax::Call(call) = pair.value.unparenthesized().syntax() else {
        return None;
    };
    matches!(call.callee.unparenthesized().syntax(), Syntax::Member(_)).then_some(name)
}
