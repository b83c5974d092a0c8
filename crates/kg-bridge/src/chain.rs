//! Triple recovery chain: structured space access, then pattern match, then the
//! local source list. The first strategy producing a triple wins.

use crate::adapters::{select_query_adapter, select_space_adapter};
use crate::legacy::LegacyTextParser;
use kg_types::{
    Atom, Bindings, Extraction, Interpreter, QueryAdapter, QueryOutput, QueryRow, SpaceAdapter,
    Triple, ORDERED_LINK,
};
use std::fmt;
use std::sync::Arc;

/// Which strategy produced the recovered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    SpaceAccess,
    PatternMatch,
    LocalFallback,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::SpaceAccess => write!(f, "space access"),
            Strategy::PatternMatch => write!(f, "pattern match"),
            Strategy::LocalFallback => write!(f, "local triple list"),
        }
    }
}

/// The recovered triple set and how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Recovered {
    pub triples: Vec<Triple>,
    pub strategy: Strategy,
    /// Relation atoms listed by the space adapter; `None` when it was not consulted
    /// or the listing failed.
    pub listed: Option<usize>,
    /// Malformed atoms or rows skipped by the winning strategy.
    pub skipped: usize,
}

#[derive(Debug, Default)]
struct Attempt {
    triples: Vec<Triple>,
    listed: Option<usize>,
    skipped: usize,
}

pub struct RecoveryChain {
    space: Option<Box<dyn SpaceAdapter>>,
    query: Box<dyn QueryAdapter>,
    legacy: LegacyTextParser,
}

impl RecoveryChain {
    pub fn new(space: Option<Box<dyn SpaceAdapter>>, query: Box<dyn QueryAdapter>) -> Self {
        Self {
            space,
            query,
            legacy: LegacyTextParser::new(),
        }
    }

    /// Chain with adapters picked from what `interpreter` exposes.
    pub fn for_interpreter(interpreter: Arc<dyn Interpreter>) -> Self {
        let space = select_space_adapter(interpreter.as_ref());
        let query = select_query_adapter(interpreter);
        Self::new(space, query)
    }

    pub fn space_adapter(&self) -> Option<&str> {
        self.space.as_ref().map(|a| a.name())
    }

    pub fn query_adapter(&self) -> &str {
        self.query.name()
    }

    /// Run the chain. Never fails: the last resort is a copy of `source`.
    pub async fn recover(&self, source: &[Triple]) -> Recovered {
        let attempt = self.from_space().await;
        if !attempt.triples.is_empty() {
            return Self::finish(attempt, Strategy::SpaceAccess);
        }
        let listed = attempt.listed;

        let attempt = self.from_query().await;
        if !attempt.triples.is_empty() {
            return Self::finish(Attempt { listed, ..attempt }, Strategy::PatternMatch);
        }

        tracing::info!("no triples recovered from the store; using the local triple list");
        Recovered {
            triples: source.to_vec(),
            strategy: Strategy::LocalFallback,
            listed,
            skipped: 0,
        }
    }

    fn finish(attempt: Attempt, strategy: Strategy) -> Recovered {
        tracing::info!(
            strategy = %strategy,
            triples = attempt.triples.len(),
            skipped = attempt.skipped,
            "recovered triples"
        );
        Recovered {
            triples: attempt.triples,
            strategy,
            listed: attempt.listed,
            skipped: attempt.skipped,
        }
    }

    async fn from_space(&self) -> Attempt {
        let adapter = match &self.space {
            Some(a) => a,
            None => {
                tracing::info!("interpreter exposes no space handle");
                return Attempt::default();
            }
        };
        let atoms = match adapter.list_relations(ORDERED_LINK).await {
            Ok(atoms) => atoms,
            Err(e) => {
                tracing::warn!(adapter = adapter.name(), error = %e, "listing relations failed");
                return Attempt::default();
            }
        };
        tracing::info!(adapter = adapter.name(), found = atoms.len(), "listed relation atoms");

        let mut attempt = Attempt {
            listed: Some(atoms.len()),
            ..Attempt::default()
        };
        for atom in &atoms {
            match adapter.decompose(atom) {
                Extraction::Extracted(parts) => {
                    attempt
                        .triples
                        .push(Triple::new(&parts[0], &parts[1], &parts[2]));
                }
                Extraction::Skipped(reason) => {
                    tracing::debug!(atom = %atom, reason = %reason, "skipping relation atom");
                    attempt.skipped += 1;
                }
            }
        }
        if attempt.skipped > 0 {
            tracing::warn!(skipped = attempt.skipped, "skipped malformed relation atoms");
        }
        attempt
    }

    async fn from_query(&self) -> Attempt {
        match self.query.query_relations(ORDERED_LINK).await {
            Ok(output) => self.triples_from_output(output),
            Err(e) => {
                tracing::warn!(adapter = self.query.name(), error = %e, "pattern match failed");
                Attempt::default()
            }
        }
    }

    fn triples_from_output(&self, output: QueryOutput) -> Attempt {
        let mut attempt = Attempt::default();
        match output {
            QueryOutput::Rows(rows) => {
                for row in &rows {
                    match triple_from_row(row) {
                        Some(t) => attempt.triples.push(t),
                        None => attempt.skipped += 1,
                    }
                }
                if attempt.skipped > 0 {
                    tracing::warn!(skipped = attempt.skipped, "skipped malformed match rows");
                }
            }
            QueryOutput::Text(text) => {
                tracing::info!("match result is text; parsing the legacy format");
                attempt.triples = self.legacy.parse(&text);
            }
        }
        attempt
    }
}

fn label(atom: &Atom) -> String {
    atom.display_name()
}

fn lookup<'a>(bindings: &'a Bindings, name: &str) -> Option<&'a Atom> {
    bindings
        .get(&format!("${}", name))
        .or_else(|| bindings.get(name))
}

fn triple_from_row(row: &QueryRow) -> Option<Triple> {
    match row {
        QueryRow::Sequence(items) if items.len() >= 3 => Some(Triple::from_labels(
            &label(&items[0]),
            &label(&items[1]),
            &label(&items[2]),
        )),
        QueryRow::Sequence(_) => None,
        QueryRow::Bindings(bindings) => {
            let s = lookup(bindings, "s")?;
            let r = lookup(bindings, "r")?;
            let o = lookup(bindings, "o")?;
            Some(Triple::from_labels(&label(s), &label(r), &label(o)))
        }
    }
}
