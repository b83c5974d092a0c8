//! In-process interpreter for the MeTTa subset the demo emits.
//!
//! Plain statements are added to the space. `!` statements are evaluated:
//! `add-atom`, `match`, `find` and `get-atoms` are understood; anything else
//! evaluates to itself.

use crate::parser::parse_program;
use crate::space::{match_atom, InMemoryAtomSpace};
use kg_types::{Atom, AtomSpace, Bindings, Interpreter, InterpreterError, RunOutput};
use std::sync::Arc;

const SELF_SPACE: &str = "&self";

pub struct MettaInterpreter {
    space: Arc<InMemoryAtomSpace>,
    /// Whether `Interpreter::space` hands out the space handle.
    expose_space: bool,
}

impl MettaInterpreter {
    pub fn new() -> Self {
        Self::with_space(InMemoryAtomSpace::new())
    }

    pub fn with_space(space: InMemoryAtomSpace) -> Self {
        Self {
            space: Arc::new(space),
            expose_space: true,
        }
    }

    /// Stop exposing the space handle; callers only get `run`.
    pub fn without_space_access(mut self) -> Self {
        self.expose_space = false;
        self
    }

    async fn eval(&self, atom: &Atom) -> Result<Vec<Atom>, InterpreterError> {
        let children = atom.children();
        match atom.head() {
            Some("add-atom") => {
                let [_, space, target] = children else {
                    return Err(arity_error(atom, 2));
                };
                Self::check_space(space)?;
                self.space.add(target.clone()).await?;
                Ok(vec![Atom::unit()])
            }
            Some("match") => {
                let [_, space, pattern, template] = children else {
                    return Err(arity_error(atom, 3));
                };
                Self::check_space(space)?;
                self.instantiate_matches(pattern, template).await
            }
            Some("find") => {
                let [_, pattern] = children else {
                    return Err(arity_error(atom, 1));
                };
                self.instantiate_matches(pattern, pattern).await
            }
            Some("get-atoms") => {
                let [_, space] = children else {
                    return Err(arity_error(atom, 1));
                };
                Self::check_space(space)?;
                Ok(self.space.atoms().await?)
            }
            _ => Ok(vec![atom.clone()]),
        }
    }

    async fn instantiate_matches(
        &self,
        pattern: &Atom,
        template: &Atom,
    ) -> Result<Vec<Atom>, InterpreterError> {
        let atoms = self.space.atoms().await?;
        let mut results = Vec::new();
        for atom in &atoms {
            let mut bindings = Bindings::new();
            if match_atom(pattern, atom, &mut bindings) {
                results.push(substitute(template, &bindings));
            }
        }
        Ok(results)
    }

    fn check_space(space: &Atom) -> Result<(), InterpreterError> {
        match space {
            Atom::Symbol(name) if name == SELF_SPACE => Ok(()),
            other => Err(InterpreterError::Script(format!("unknown space: {}", other))),
        }
    }
}

impl Default for MettaInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn arity_error(atom: &Atom, expected: usize) -> InterpreterError {
    InterpreterError::Script(format!(
        "{} expects {} argument(s): {}",
        atom.head().unwrap_or("?"),
        expected,
        atom
    ))
}

fn substitute(template: &Atom, bindings: &Bindings) -> Atom {
    match template {
        Atom::Variable(name) => bindings
            .get(name)
            .cloned()
            .unwrap_or_else(|| template.clone()),
        Atom::Expression(children) => {
            Atom::Expression(children.iter().map(|c| substitute(c, bindings)).collect())
        }
        other => other.clone(),
    }
}

#[async_trait::async_trait]
impl Interpreter for MettaInterpreter {
    fn name(&self) -> &str {
        "in-memory"
    }

    async fn run(&self, program: &str) -> Result<RunOutput, InterpreterError> {
        let statements = parse_program(program)?;
        tracing::debug!(statements = statements.len(), "running program");
        let mut results = Vec::new();
        for statement in statements {
            if statement.eval {
                results.push(self.eval(&statement.atom).await?);
            } else {
                self.space.add(statement.atom).await?;
            }
        }
        Ok(RunOutput::Atoms(results))
    }

    fn space(&self) -> Option<Arc<dyn AtomSpace>> {
        if self.expose_space {
            let space: Arc<dyn AtomSpace> = self.space.clone();
            Some(space)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kg_types::ORDERED_LINK;

    const INSERT: &str = r#"
!(add-atom &self (Node "Alice"))
!(add-atom &self (OrderedLink (Node "Alice") (Node "knows") (Node "Bob")))
!(add-atom &self (OrderedLink (Node "Bob") (Node "knows") (Node "Charlie")))
"#;

    #[tokio::test]
    async fn add_atom_returns_unit_per_statement() {
        let metta = MettaInterpreter::new();
        let out = metta.run(INSERT).await.unwrap();
        assert_eq!(
            out,
            RunOutput::Atoms(vec![vec![Atom::unit()], vec![Atom::unit()], vec![Atom::unit()]])
        );
        let space = metta.space().unwrap();
        assert_eq!(space.len().await, 3);
        assert_eq!(space.atoms_by_type(ORDERED_LINK).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn match_instantiates_template() {
        let metta = MettaInterpreter::new();
        metta.run(INSERT).await.unwrap();
        let out = metta
            .run("!(match &self (OrderedLink $s $r $o) ($s $r $o))")
            .await
            .unwrap();
        let RunOutput::Atoms(results) = out else {
            panic!("expected atoms");
        };
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0][0],
            Atom::expr([Atom::node("Alice"), Atom::node("knows"), Atom::node("Bob")])
        );
        assert_eq!(results[0].len(), 2);
    }

    #[tokio::test]
    async fn find_returns_matching_atoms() {
        let metta = MettaInterpreter::new();
        metta.run(INSERT).await.unwrap();
        let out = metta.run("!(find (OrderedLink $s $r $o))").await.unwrap();
        assert_eq!(
            out,
            RunOutput::Atoms(vec![vec![
                Atom::ordered_link("Alice", "knows", "Bob"),
                Atom::ordered_link("Bob", "knows", "Charlie"),
            ]])
        );
    }

    #[tokio::test]
    async fn plain_statements_are_added_and_unknown_forms_evaluate_to_themselves() {
        let metta = MettaInterpreter::new();
        let out = metta.run("(Node \"x\")\n!(frobnicate 1)").await.unwrap();
        assert_eq!(
            out,
            RunOutput::Atoms(vec![vec![Atom::expr([
                Atom::sym("frobnicate"),
                Atom::sym("1")
            ])]])
        );
        assert_eq!(
            metta.run("!(get-atoms &self)").await.unwrap(),
            RunOutput::Atoms(vec![vec![Atom::node("x")]])
        );
    }

    #[tokio::test]
    async fn errors_on_bad_space_and_arity() {
        let metta = MettaInterpreter::new();
        assert!(matches!(
            metta.run("!(add-atom &other (Node \"x\"))").await,
            Err(InterpreterError::Script(_))
        ));
        assert!(matches!(
            metta.run("!(add-atom &self)").await,
            Err(InterpreterError::Script(_))
        ));
        assert!(matches!(
            metta.run("!(add-atom &self (Node \"x\")").await,
            Err(InterpreterError::Parse { .. })
        ));
    }

    #[test]
    fn space_can_be_hidden() {
        let metta = MettaInterpreter::new().without_space_access();
        assert!(metta.space().is_none());
    }
}
