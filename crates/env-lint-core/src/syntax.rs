//! Tree-sitter parsing for JavaScript and TypeScript sources.
//!
//! Rules do not inspect raw tree-sitter kind strings. [`SyntaxNode::syntax`]
//! classifies a node into the [`Syntax`] enum so that rules match the shapes
//! they care about with ordinary pattern matching and fall through on
//! everything else.

use std::fmt;
use std::path::Path;
use tree_sitter::{Language, Node, Parser, Tree};

/// Source grammar used to parse a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// JavaScript, including JSX and ES modules.
    JavaScript,
    /// TypeScript without JSX.
    TypeScript,
    /// TypeScript with JSX.
    Tsx,
}

impl Dialect {
    /// File extensions recognized by [`Dialect::from_path`].
    pub const EXTENSIONS: &'static [&'static str] =
        &["js", "mjs", "cjs", "jsx", "ts", "mts", "cts", "tsx"];

    /// Picks the dialect from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "js" | "mjs" | "cjs" | "jsx" => Some(Self::JavaScript),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            _ => None,
        }
    }

    fn language(self) -> Language {
        match self {
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JavaScript => write!(f, "javascript"),
            Self::TypeScript => write!(f, "typescript"),
            Self::Tsx => write!(f, "tsx"),
        }
    }
}

/// Errors produced while parsing source text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    /// The grammar could not be loaded into the parser.
    #[error("failed to load {dialect} grammar: {message}")]
    Language {
        /// Dialect whose grammar was rejected.
        dialect: Dialect,
        /// Loader error detail.
        message: String,
    },

    /// The parser returned no tree.
    #[error("parser returned no syntax tree")]
    NoTree,

    /// The source contains a syntax error.
    #[error("syntax error at {line}:{column}")]
    Invalid {
        /// Line of the first error (1-indexed).
        line: usize,
        /// Column of the first error (1-indexed).
        column: usize,
    },
}

/// Position of a node within its source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, in bytes).
    pub column: usize,
    /// Byte offset of the node start.
    pub offset: usize,
    /// Length of the node in bytes.
    pub length: usize,
}

/// A parsed, error-free source file.
pub struct SourceTree {
    source: String,
    tree: Tree,
    dialect: Dialect,
}

impl fmt::Debug for SourceTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceTree")
            .field("dialect", &self.dialect)
            .field("len", &self.source.len())
            .finish_non_exhaustive()
    }
}

impl SourceTree {
    /// Parses `source` as a module of the given dialect.
    ///
    /// Tree-sitter recovers from errors instead of failing, so any `ERROR` or
    /// missing node in the result is reported as [`SyntaxError::Invalid`].
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be loaded or the source does not
    /// parse cleanly.
    pub fn parse(source: impl Into<String>, dialect: Dialect) -> Result<Self, SyntaxError> {
        let source = source.into();
        let mut parser = Parser::new();
        parser
            .set_language(&dialect.language())
            .map_err(|e| SyntaxError::Language {
                dialect,
                message: e.to_string(),
            })?;

        let tree = parser.parse(&source, None).ok_or(SyntaxError::NoTree)?;
        let root = tree.root_node();
        if root.has_error() {
            let position = first_error(root).start_position();
            return Err(SyntaxError::Invalid {
                line: position.row + 1,
                column: position.column + 1,
            });
        }

        Ok(Self {
            source,
            tree,
            dialect,
        })
    }

    /// Calls `visit` for every named node in document order.
    pub fn walk<'a>(&'a self, mut visit: impl FnMut(SyntaxNode<'a>)) {
        let mut cursor = self.tree.walk();
        loop {
            let node = cursor.node();
            if node.is_named() {
                visit(SyntaxNode {
                    node,
                    source: &self.source,
                });
            }

            if cursor.goto_first_child() {
                continue;
            }
            while !cursor.goto_next_sibling() {
                if !cursor.goto_parent() {
                    return;
                }
            }
        }
    }
}

/// Descends along `has_error` children to the innermost offending node.
fn first_error(node: Node<'_>) -> Node<'_> {
    if node.is_error() || node.is_missing() {
        return node;
    }
    let mut cursor = node.walk();
    let child = node.children(&mut cursor).find(Node::has_error);
    child.map_or(node, first_error)
}

/// A node of a [`SourceTree`] together with its source text.
#[derive(Debug, Clone, Copy)]
pub struct SyntaxNode<'a> {
    node: Node<'a>,
    source: &'a str,
}

impl<'a> SyntaxNode<'a> {
    /// Raw grammar kind, e.g. `member_expression`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.node.kind()
    }

    /// Source text covered by this node.
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    /// Location of this node.
    #[must_use]
    pub fn span(&self) -> Span {
        let start = self.node.start_position();
        Span {
            line: start.row + 1,
            column: start.column + 1,
            offset: self.node.start_byte(),
            length: self.node.end_byte() - self.node.start_byte(),
        }
    }

    /// Strips any number of enclosing parentheses.
    ///
    /// ESTree-style trees have no parenthesis nodes, so `(a).b` and `a.b`
    /// are the same shape there; this gives rules the same view.
    #[must_use]
    pub fn unparenthesized(self) -> Self {
        let mut current = self;
        while let Syntax::Parenthesized(inner) = current.syntax() {
            current = inner;
        }
        current
    }

    /// Classifies this node.
    #[must_use]
    pub fn syntax(&self) -> Syntax<'a> {
        match self.node.kind() {
            "identifier" => Syntax::Identifier(self.text()),
            "property_identifier" => Syntax::PropertyIdentifier(self.text()),
            "member_expression" => match (self.field("object"), self.field("property")) {
                (Some(object), Some(property)) => Syntax::Member(Member {
                    object,
                    property,
                    optional: self.field("optional_chain").is_some(),
                }),
                _ => Syntax::Other(self.kind()),
            },
            "call_expression" => match self.field("function") {
                Some(callee) => Syntax::Call(Call {
                    callee,
                    optional: self.field("optional_chain").is_some(),
                }),
                None => Syntax::Other(self.kind()),
            },
            "pair" => match (self.field("key"), self.field("value")) {
                (Some(key), Some(value)) => Syntax::Pair(Pair { key, value }),
                _ => Syntax::Other(self.kind()),
            },
            "parenthesized_expression" => {
                let mut cursor = self.node.walk();
                let inner = self.node.named_children(&mut cursor).next();
                match inner {
                    Some(inner) => Syntax::Parenthesized(self.wrap(inner)),
                    None => Syntax::Other(self.kind()),
                }
            }
            other => Syntax::Other(other),
        }
    }

    fn field(&self, name: &str) -> Option<SyntaxNode<'a>> {
        self.node
            .child_by_field_name(name)
            .map(|node| self.wrap(node))
    }

    fn wrap(&self, node: Node<'a>) -> SyntaxNode<'a> {
        SyntaxNode {
            node,
            source: self.source,
        }
    }
}

/// Tagged view of the node shapes rules inspect.
#[derive(Debug, Clone, Copy)]
pub enum Syntax<'a> {
    /// A plain identifier in expression position, e.g. `process`.
    Identifier(&'a str),
    /// A non-computed property name, e.g. `env` in `process.env`
    /// or `PORT` in `{ PORT: z.string() }`.
    PropertyIdentifier(&'a str),
    /// `object.property` or `object?.property`.
    Member(Member<'a>),
    /// `callee(...)` or `callee?.(...)`.
    Call(Call<'a>),
    /// `key: value` inside an object literal.
    Pair(Pair<'a>),
    /// `( expression )`.
    Parenthesized(SyntaxNode<'a>),
    /// Any other node, carrying its grammar kind.
    Other(&'static str),
}

/// Non-computed member access.
#[derive(Debug, Clone, Copy)]
pub struct Member<'a> {
    /// Accessed object.
    pub object: SyntaxNode<'a>,
    /// Accessed property name.
    pub property: SyntaxNode<'a>,
    /// Whether the access uses `?.`.
    pub optional: bool,
}

/// Function or method call.
#[derive(Debug, Clone, Copy)]
pub struct Call<'a> {
    /// Called expression.
    pub callee: SyntaxNode<'a>,
    /// Whether the call uses `?.`.
    pub optional: bool,
}

/// Object literal property.
#[derive(Debug, Clone, Copy)]
pub struct Pair<'a> {
    /// Property key.
    pub key: SyntaxNode<'a>,
    /// Property value.
    pub value: SyntaxNode<'a>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<&'static str> {
        let tree = SourceTree::parse(src, Dialect::JavaScript).expect("parse failed");
        let mut kinds = Vec::new();
        tree.walk(|node| kinds.push(node.kind()));
        kinds
    }

    #[test]
    fn dialect_from_extension() {
        assert_eq!(
            Dialect::from_path(Path::new("src/env/schema.mjs")),
            Some(Dialect::JavaScript)
        );
        assert_eq!(
            Dialect::from_path(Path::new("app/page.tsx")),
            Some(Dialect::Tsx)
        );
        assert_eq!(
            Dialect::from_path(Path::new("server.cts")),
            Some(Dialect::TypeScript)
        );
        assert_eq!(Dialect::from_path(Path::new("README.md")), None);
        assert_eq!(Dialect::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn walk_is_preorder() {
        let kinds = kinds("a.b;");
        assert_eq!(
            kinds,
            vec![
                "program",
                "expression_statement",
                "member_expression",
                "identifier",
                "property_identifier",
            ]
        );
    }

    #[test]
    fn syntax_error_is_reported_with_position() {
        let err = SourceTree::parse("const x = {\nfoo: ,\n", Dialect::JavaScript).unwrap_err();
        assert!(matches!(err, SyntaxError::Invalid { line, column } if line >= 1 && column >= 1));
    }

    #[test]
    fn classifies_member_and_call() {
        let tree = SourceTree::parse("z.string();", Dialect::JavaScript).unwrap();
        let mut calls = 0;
        tree.walk(|node| {
            if let Syntax::Call(call) = node.syntax() {
                calls += 1;
                assert!(!call.optional);
                let Syntax::Member(member) = call.callee.syntax() else {
                    panic!("callee should be a member expression");
                };
                assert!(matches!(member.object.syntax(), Syntax::Identifier("z")));
                assert!(matches!(
                    member.property.syntax(),
                    Syntax::PropertyIdentifier("string")
                ));
            }
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn optional_member_is_flagged() {
        let tree = SourceTree::parse("a?.b;", Dialect::JavaScript).unwrap();
        let mut seen = false;
        tree.walk(|node| {
            if let Syntax::Member(member) = node.syntax() {
                seen = true;
                assert!(member.optional);
            }
        });
        assert!(seen);
    }

    #[test]
    fn unparenthesized_strips_nested_parens() {
        let tree = SourceTree::parse("((a)).b;", Dialect::JavaScript).unwrap();
        let mut object = None;
        tree.walk(|node| {
            if let Syntax::Member(member) = node.syntax() {
                object = Some(member.object.unparenthesized().kind());
            }
        });
        assert_eq!(object, Some("identifier"));
    }

    #[test]
    fn span_is_one_indexed() {
        let tree = SourceTree::parse("\n  foo.bar;", Dialect::JavaScript).unwrap();
        let mut span = None;
        tree.walk(|node| {
            if matches!(node.syntax(), Syntax::Member(_)) {
                span = Some(node.span());
            }
        });
        let span = span.unwrap();
        assert_eq!((span.line, span.column), (2, 3));
        assert_eq!(span.offset, 3);
        assert_eq!(span.length, "foo.bar".len());
    }

    #[test]
    fn typescript_sources_parse() {
        let tree = SourceTree::parse(
            "const port: number = Number(process.env.PORT);",
            Dialect::TypeScript,
        );
        assert!(tree.is_ok());
    }
}
