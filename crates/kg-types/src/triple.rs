//! Labeled-edge triples.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A (subject, relation, object) record. Duplicates are legal.
///
/// Serialized as a 3-element array: `["Alice", "knows", "Bob"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: String,
    pub relation: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        relation: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            relation: relation.into(),
            object: object.into(),
        }
    }

    /// Build a triple from recovered label strings, stripping one layer of
    /// surrounding double quotes from each.
    pub fn from_labels(subject: &str, relation: &str, object: &str) -> Self {
        Self::new(
            strip_quotes(subject),
            strip_quotes(relation),
            strip_quotes(object),
        )
    }
}

impl From<(&str, &str, &str)> for Triple {
    fn from((s, r, o): (&str, &str, &str)) -> Self {
        Triple::new(s, r, o)
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?}, {:?})", self.subject, self.relation, self.object)
    }
}

impl Serialize for Triple {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.subject, &self.relation, &self.object).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Triple {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (subject, relation, object) = <(String, String, String)>::deserialize(deserializer)?;
        Ok(Triple {
            subject,
            relation,
            object,
        })
    }
}

/// Remove one leading and one trailing `"` (each independently).
pub fn strip_quotes(s: &str) -> &str {
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s)
}
