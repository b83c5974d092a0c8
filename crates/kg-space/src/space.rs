//! In-memory atom space with a head-symbol index and one-way pattern matching.

use kg_types::{Atom, AtomSpace, Bindings, SpaceCapabilities, SpaceError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type TypeIndex = HashMap<String, Vec<usize>>;

/// In-memory implementation of AtomSpace.
/// Atoms are kept in insertion order; duplicates are stored as separate entries.
pub struct InMemoryAtomSpace {
    /// Insertion-ordered atoms.
    atoms: Arc<RwLock<Vec<Atom>>>,
    /// head symbol -> positions in `atoms`.
    type_index: Arc<RwLock<TypeIndex>>,
    capabilities: SpaceCapabilities,
}

impl InMemoryAtomSpace {
    pub fn new() -> Self {
        Self::with_capabilities(SpaceCapabilities::default())
    }

    /// Space that only answers the operations `capabilities` allows, to stand in
    /// for engine builds without a type index or structured query results.
    pub fn with_capabilities(capabilities: SpaceCapabilities) -> Self {
        Self {
            atoms: Arc::new(RwLock::new(Vec::new())),
            type_index: Arc::new(RwLock::new(HashMap::new())),
            capabilities,
        }
    }
}

impl Default for InMemoryAtomSpace {
    fn default() -> Self {
        Self::new()
    }
}

/// Match `pattern` against a ground `atom`, extending `bindings`.
/// A variable already bound must bind to an equal atom again.
pub fn match_atom(pattern: &Atom, atom: &Atom, bindings: &mut Bindings) -> bool {
    match (pattern, atom) {
        (Atom::Variable(name), _) => match bindings.get(name) {
            Some(bound) => bound == atom,
            None => {
                bindings.insert(name.clone(), atom.clone());
                true
            }
        },
        (Atom::Expression(ps), Atom::Expression(xs)) => {
            ps.len() == xs.len() && ps.iter().zip(xs).all(|(p, x)| match_atom(p, x, bindings))
        }
        (p, x) => p == x,
    }
}

#[async_trait::async_trait]
impl AtomSpace for InMemoryAtomSpace {
    fn capabilities(&self) -> SpaceCapabilities {
        self.capabilities
    }

    async fn add(&self, atom: Atom) -> Result<(), SpaceError> {
        let mut atoms = self.atoms.write().await;
        if let Some(head) = atom.head() {
            let mut index = self.type_index.write().await;
            index.entry(head.to_string()).or_default().push(atoms.len());
        }
        atoms.push(atom);
        Ok(())
    }

    async fn atoms(&self) -> Result<Vec<Atom>, SpaceError> {
        Ok(self.atoms.read().await.clone())
    }

    async fn atoms_by_type(&self, kind: &str) -> Result<Vec<Atom>, SpaceError> {
        if !self.capabilities.type_index {
            return Err(SpaceError::Unsupported("atoms_by_type"));
        }
        let atoms = self.atoms.read().await;
        let index = self.type_index.read().await;
        let positions = match index.get(kind) {
            Some(p) => p,
            None => return Ok(Vec::new()),
        };
        positions
            .iter()
            .map(|&i| {
                atoms
                    .get(i)
                    .cloned()
                    .ok_or_else(|| SpaceError::Other(format!("stale type index entry: {}", i)))
            })
            .collect()
    }

    async fn query(&self, pattern: &Atom) -> Result<Vec<Bindings>, SpaceError> {
        if !self.capabilities.pattern_query {
            return Err(SpaceError::Unsupported("query"));
        }
        let atoms = self.atoms.read().await;
        let mut results = Vec::new();
        for atom in atoms.iter() {
            let mut bindings = Bindings::new();
            if match_atom(pattern, atom, &mut bindings) {
                results.push(bindings);
            }
        }
        Ok(results)
    }

    async fn len(&self) -> usize {
        self.atoms.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kg_types::ORDERED_LINK;

    fn relation_pattern() -> Atom {
        Atom::expr([
            Atom::sym(ORDERED_LINK),
            Atom::var("s"),
            Atom::var("r"),
            Atom::var("o"),
        ])
    }

    #[tokio::test]
    async fn atoms_by_type_uses_head_symbol() {
        let space = InMemoryAtomSpace::new();
        space.add(Atom::node("Alice")).await.unwrap();
        space
            .add(Atom::ordered_link("Alice", "knows", "Bob"))
            .await
            .unwrap();
        space.add(Atom::sym("loose")).await.unwrap();
        space
            .add(Atom::ordered_link("Bob", "knows", "Charlie"))
            .await
            .unwrap();

        assert_eq!(space.len().await, 4);
        let links = space.atoms_by_type(ORDERED_LINK).await.unwrap();
        assert_eq!(
            links,
            vec![
                Atom::ordered_link("Alice", "knows", "Bob"),
                Atom::ordered_link("Bob", "knows", "Charlie"),
            ]
        );
        assert!(space.atoms_by_type("Missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn query_binds_variables_in_order() {
        let space = InMemoryAtomSpace::new();
        space
            .add(Atom::ordered_link("Alice", "knows", "Bob"))
            .await
            .unwrap();
        space.add(Atom::node("Bob")).await.unwrap();
        space
            .add(Atom::ordered_link("Alice", "knows", "Charlie"))
            .await
            .unwrap();

        let rows = space.query(&relation_pattern()).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["s"], Atom::node("Alice"));
        assert_eq!(rows[0]["o"], Atom::node("Bob"));
        assert_eq!(rows[1]["o"], Atom::node("Charlie"));
    }

    #[test]
    fn repeated_variable_must_agree() {
        let pattern = Atom::expr([Atom::sym("Pair"), Atom::var("x"), Atom::var("x")]);
        let same = Atom::expr([Atom::sym("Pair"), Atom::sym("a"), Atom::sym("a")]);
        let different = Atom::expr([Atom::sym("Pair"), Atom::sym("a"), Atom::sym("b")]);
        assert!(match_atom(&pattern, &same, &mut Bindings::new()));
        assert!(!match_atom(&pattern, &different, &mut Bindings::new()));
    }

    #[tokio::test]
    async fn reduced_capabilities_are_enforced() {
        let space = InMemoryAtomSpace::with_capabilities(SpaceCapabilities {
            type_index: false,
            pattern_query: false,
        });
        space
            .add(Atom::ordered_link("a", "b", "c"))
            .await
            .unwrap();
        assert!(matches!(
            space.atoms_by_type(ORDERED_LINK).await,
            Err(SpaceError::Unsupported("atoms_by_type"))
        ));
        assert!(matches!(
            space.query(&relation_pattern()).await,
            Err(SpaceError::Unsupported("query"))
        ));
        assert_eq!(space.atoms().await.unwrap().len(), 1);
    }
}
