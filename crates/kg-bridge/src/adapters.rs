//! Adapters over the engine's introspection surface.
//!
//! One implementation per surface an engine build may expose; the pair used for
//! a run is picked once from the interpreter's reported capabilities.

use async_trait::async_trait;
use kg_types::{
    Atom, AtomSpace, Interpreter, InterpreterError, QueryAdapter, QueryOutput, QueryRow,
    RunOutput, SpaceAdapter, SpaceError,
};
use std::sync::Arc;

/// Lists relations through the space's head-symbol index.
pub struct TypeIndexAdapter {
    space: Arc<dyn AtomSpace>,
}

impl TypeIndexAdapter {
    pub fn new(space: Arc<dyn AtomSpace>) -> Self {
        Self { space }
    }
}

#[async_trait]
impl SpaceAdapter for TypeIndexAdapter {
    fn name(&self) -> &'static str {
        "type-index"
    }

    async fn list_relations(&self, kind: &str) -> Result<Vec<Atom>, SpaceError> {
        self.space.atoms_by_type(kind).await
    }
}

/// Lists every atom and keeps those headed by the requested kind.
pub struct ScanAdapter {
    space: Arc<dyn AtomSpace>,
}

impl ScanAdapter {
    pub fn new(space: Arc<dyn AtomSpace>) -> Self {
        Self { space }
    }
}

#[async_trait]
impl SpaceAdapter for ScanAdapter {
    fn name(&self) -> &'static str {
        "scan"
    }

    async fn list_relations(&self, kind: &str) -> Result<Vec<Atom>, SpaceError> {
        let atoms = self.space.atoms().await?;
        Ok(atoms
            .into_iter()
            .filter(|a| a.head() == Some(kind))
            .collect())
    }
}

/// Submits a `match` program through the interpreter. The template keeps the
/// relation head so textual results stay in the `OrderedLink (..) (..) (..)` shape.
pub struct ScriptQueryAdapter {
    interpreter: Arc<dyn Interpreter>,
}

impl ScriptQueryAdapter {
    pub fn new(interpreter: Arc<dyn Interpreter>) -> Self {
        Self { interpreter }
    }

    pub fn program(kind: &str) -> String {
        format!("!(match &self ({kind} $s $r $o) ({kind} $s $r $o))")
    }
}

#[async_trait]
impl QueryAdapter for ScriptQueryAdapter {
    fn name(&self) -> &'static str {
        "script"
    }

    async fn query_relations(&self, kind: &str) -> Result<QueryOutput, InterpreterError> {
        let output = self.interpreter.run(&Self::program(kind)).await?;
        tracing::info!(raw = %output, "pattern match result");
        Ok(match output {
            RunOutput::Atoms(results) => QueryOutput::Rows(
                results
                    .into_iter()
                    .flatten()
                    .map(|atom| match atom {
                        Atom::Expression(items) => QueryRow::Sequence(without_head(items)),
                        other => QueryRow::Sequence(vec![other]),
                    })
                    .collect(),
            ),
            RunOutput::Text(text) => QueryOutput::Text(text),
        })
    }
}

fn without_head(mut items: Vec<Atom>) -> Vec<Atom> {
    if matches!(items.first(), Some(Atom::Symbol(_))) {
        items.remove(0);
    }
    items
}

/// Asks the space for variable bindings directly.
pub struct BindingsQueryAdapter {
    space: Arc<dyn AtomSpace>,
}

impl BindingsQueryAdapter {
    pub fn new(space: Arc<dyn AtomSpace>) -> Self {
        Self { space }
    }
}

#[async_trait]
impl QueryAdapter for BindingsQueryAdapter {
    fn name(&self) -> &'static str {
        "bindings"
    }

    async fn query_relations(&self, kind: &str) -> Result<QueryOutput, InterpreterError> {
        let pattern = Atom::expr([Atom::sym(kind), Atom::var("s"), Atom::var("r"), Atom::var("o")]);
        let rows = self.space.query(&pattern).await?;
        tracing::info!(rows = rows.len(), "pattern query result");
        Ok(QueryOutput::Rows(
            rows.into_iter().map(QueryRow::Bindings).collect(),
        ))
    }
}

/// Space adapter for the interpreter, or `None` when it exposes no space.
pub fn select_space_adapter(interpreter: &dyn Interpreter) -> Option<Box<dyn SpaceAdapter>> {
    let space = interpreter.space()?;
    if space.capabilities().type_index {
        Some(Box::new(TypeIndexAdapter::new(space)))
    } else {
        Some(Box::new(ScanAdapter::new(space)))
    }
}

/// Bindings queries when the space answers them, otherwise a `match` program.
pub fn select_query_adapter(interpreter: Arc<dyn Interpreter>) -> Box<dyn QueryAdapter> {
    match interpreter.space() {
        Some(space) if space.capabilities().pattern_query => {
            Box::new(BindingsQueryAdapter::new(space))
        }
        _ => Box::new(ScriptQueryAdapter::new(interpreter)),
    }
}
