//! MeTTa atoms.
//!
//! Only the four atom kinds the demo needs are modelled; grounded values other
//! than strings are out of scope.

use std::fmt;

/// Head symbol of an entity atom: `(Node "Alice")`.
pub const NODE: &str = "Node";

/// Head symbol of an ordered relation atom: `(OrderedLink (Node "a") (Node "b") (Node "c"))`.
pub const ORDERED_LINK: &str = "OrderedLink";

/// A single atom in the knowledge store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Atom {
    /// Bare symbol, e.g. `OrderedLink` or `&self`.
    Symbol(String),
    /// Grounded string literal; displayed with surrounding double quotes.
    Str(String),
    /// Pattern variable; the name is stored without the leading `$`.
    Variable(String),
    /// Parenthesised list of atoms.
    Expression(Vec<Atom>),
}

impl Atom {
    pub fn sym(name: impl Into<String>) -> Self {
        Atom::Symbol(name.into())
    }

    pub fn string(text: impl Into<String>) -> Self {
        Atom::Str(text.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Atom::Variable(name.into())
    }

    pub fn expr(children: impl IntoIterator<Item = Atom>) -> Self {
        Atom::Expression(children.into_iter().collect())
    }

    /// The empty expression `()`, returned by side-effecting statements.
    pub fn unit() -> Self {
        Atom::Expression(Vec::new())
    }

    /// `(Node "name")`.
    pub fn node(name: impl Into<String>) -> Self {
        Atom::expr([Atom::sym(NODE), Atom::string(name)])
    }

    /// `(OrderedLink (Node "s") (Node "r") (Node "o"))`.
    pub fn ordered_link(
        subject: impl Into<String>,
        relation: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Atom::expr([
            Atom::sym(ORDERED_LINK),
            Atom::node(subject),
            Atom::node(relation),
            Atom::node(object),
        ])
    }

    /// Head symbol of an expression (its first child, when that is a symbol).
    pub fn head(&self) -> Option<&str> {
        match self {
            Atom::Expression(children) => match children.first() {
                Some(Atom::Symbol(name)) => Some(name.as_str()),
                _ => None,
            },
            _ => None,
        }
    }

    /// Children of an expression; empty for every other atom.
    pub fn children(&self) -> &[Atom] {
        match self {
            Atom::Expression(children) => children,
            _ => &[],
        }
    }

    /// True when the atom contains no variables.
    pub fn is_ground(&self) -> bool {
        match self {
            Atom::Variable(_) => false,
            Atom::Expression(children) => children.iter().all(Atom::is_ground),
            _ => true,
        }
    }

    /// Human-facing form: the payload of a `(Node X)` wrapper, otherwise the
    /// plain display form. String payloads keep their quotes.
    pub fn display_name(&self) -> String {
        match self {
            Atom::Expression(children) if children.len() == 2 && self.head() == Some(NODE) => {
                children[1].display_name()
            }
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Symbol(name) => write!(f, "{}", name),
            Atom::Str(text) => {
                write!(f, "\"")?;
                for c in text.chars() {
                    match c {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                write!(f, "\"")
            }
            Atom::Variable(name) => write!(f, "${}", name),
            Atom::Expression(children) => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_link_displays_as_metta() {
        let link = Atom::ordered_link("Alice", "knows", "Bob");
        assert_eq!(
            link.to_string(),
            r#"(OrderedLink (Node "Alice") (Node "knows") (Node "Bob"))"#
        );
        assert_eq!(link.head(), Some(ORDERED_LINK));
        assert_eq!(link.children().len(), 4);
    }

    #[test]
    fn display_name_unwraps_node() {
        assert_eq!(Atom::node("Alice").display_name(), "\"Alice\"");
        assert_eq!(Atom::sym("Alice").display_name(), "Alice");
        assert_eq!(
            Atom::expr([Atom::sym("Foo"), Atom::sym("x")]).display_name(),
            "(Foo x)"
        );
    }

    #[test]
    fn string_display_escapes_quotes() {
        assert_eq!(Atom::string(r#"a"b\c"#).to_string(), r#""a\"b\\c""#);
    }

    #[test]
    fn groundness() {
        assert!(Atom::ordered_link("a", "b", "c").is_ground());
        assert!(!Atom::expr([Atom::sym(ORDERED_LINK), Atom::var("s")]).is_ground());
        assert_eq!(Atom::var("s").to_string(), "$s");
        assert_eq!(Atom::unit().to_string(), "()");
    }
}
