//! Traits for knowledge engines and the adapters that read triples back out of them.

use crate::{strip_quotes, Atom};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Variable name (without `$`) -> bound atom.
pub type Bindings = HashMap<String, Atom>;

/// Raw result of running a program.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutput {
    /// One result list per evaluated (`!`) statement.
    Atoms(Vec<Vec<Atom>>),
    /// Engines that only report results as text (e.g. a subprocess).
    Text(String),
}

impl fmt::Display for RunOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutput::Atoms(results) => {
                write!(f, "[")?;
                for (i, result) in results.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "[")?;
                    for (j, atom) in result.iter().enumerate() {
                        if j > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", atom)?;
                    }
                    write!(f, "]")?;
                }
                write!(f, "]")
            }
            RunOutput::Text(text) => write!(f, "{}", text.trim_end()),
        }
    }
}

/// Introspection surface a space exposes. Older engine builds lack some of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpaceCapabilities {
    /// `atoms_by_type` is answered from a head-symbol index.
    pub type_index: bool,
    /// `query` returns structured bindings.
    pub pattern_query: bool,
}

impl Default for SpaceCapabilities {
    fn default() -> Self {
        Self {
            type_index: true,
            pattern_query: true,
        }
    }
}

/// Atom storage behind an interpreter.
#[async_trait]
pub trait AtomSpace: Send + Sync {
    fn capabilities(&self) -> SpaceCapabilities;

    /// Append an atom.
    async fn add(&self, atom: Atom) -> Result<(), SpaceError>;

    /// Every stored atom, in insertion order.
    async fn atoms(&self) -> Result<Vec<Atom>, SpaceError>;

    /// Stored expressions whose head symbol is `kind`.
    async fn atoms_by_type(&self, kind: &str) -> Result<Vec<Atom>, SpaceError>;

    /// One-way match of `pattern` against every stored atom.
    async fn query(&self, pattern: &Atom) -> Result<Vec<Bindings>, SpaceError>;

    async fn len(&self) -> usize;
}

/// A MeTTa-style interpreter: runs program text against its space.
#[async_trait]
pub trait Interpreter: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    async fn run(&self, program: &str) -> Result<RunOutput, InterpreterError>;

    /// Handle to the underlying space, when the backend exposes one.
    fn space(&self) -> Option<Arc<dyn AtomSpace>>;
}

/// Why an atom could not be decomposed into parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotExpression,
    TooFewParts(usize),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotExpression => write!(f, "not an expression"),
            SkipReason::TooFewParts(n) => write!(f, "only {} part(s)", n),
        }
    }
}

/// Outcome of decomposing one relation atom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Displayable parts with one layer of quotes stripped. At least three.
    Extracted(Vec<String>),
    Skipped(SkipReason),
}

/// Stable interface over a space: list relations of a kind, decompose one relation.
#[async_trait]
pub trait SpaceAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    async fn list_relations(&self, kind: &str) -> Result<Vec<Atom>, SpaceError>;

    /// Split a relation atom into its element labels. A leading head symbol is
    /// not an element.
    fn decompose(&self, atom: &Atom) -> Extraction {
        let children = match atom {
            Atom::Expression(children) => children.as_slice(),
            _ => return Extraction::Skipped(SkipReason::NotExpression),
        };
        let elements = match children.first() {
            Some(Atom::Symbol(_)) => &children[1..],
            _ => children,
        };
        if elements.len() < 3 {
            return Extraction::Skipped(SkipReason::TooFewParts(elements.len()));
        }
        Extraction::Extracted(
            elements
                .iter()
                .map(|e| strip_quotes(&e.display_name()).to_string())
                .collect(),
        )
    }
}

/// One item of a pattern-match result.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryRow {
    Sequence(Vec<Atom>),
    Bindings(Bindings),
}

/// Pattern-match result: structured rows, or text when the result can't be iterated.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    Rows(Vec<QueryRow>),
    Text(String),
}

/// Stable interface for the pattern-match fallback.
#[async_trait]
pub trait QueryAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Match `(kind $s $r $o)` against the store.
    async fn query_relations(&self, kind: &str) -> Result<QueryOutput, InterpreterError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SpaceError {
    #[error("unsupported space operation: {0}")]
    Unsupported(&'static str),
    #[error("space error: {0}")]
    Other(String),
}

#[derive(Debug, thiserror::Error)]
pub enum InterpreterError {
    #[error("parse error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },
    #[error("interpreter unavailable: {0}")]
    Unavailable(String),
    #[error("script failed: {0}")]
    Script(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("space: {0}")]
    Space(#[from] SpaceError),
}
