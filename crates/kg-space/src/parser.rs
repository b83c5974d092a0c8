//! Parser for the MeTTa subset: atoms, `!` statements, `;` comments.

use kg_types::{Atom, InterpreterError};
use pest::error::InputLocation;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "metta.pest"]
struct MettaParser;

/// One top-level program statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// `!`-prefixed: evaluate instead of adding to the space.
    pub eval: bool,
    pub atom: Atom,
}

/// Parse a whole program into statements.
pub fn parse_program(src: &str) -> Result<Vec<Statement>, InterpreterError> {
    let pairs = MettaParser::parse(Rule::program, src).map_err(parse_error)?;
    pairs
        .filter(|pair| pair.as_rule() == Rule::statement)
        .map(statement)
        .collect()
}

fn parse_error(e: pest::error::Error<Rule>) -> InterpreterError {
    let offset = match e.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    };
    InterpreterError::Parse {
        offset,
        message: e.variant.message().into_owned(),
    }
}

fn statement(pair: Pair<Rule>) -> Result<Statement, InterpreterError> {
    let offset = pair.as_span().start();
    let mut eval = false;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::bang => eval = true,
            _ => {
                return Ok(Statement {
                    eval,
                    atom: atom(inner),
                })
            }
        }
    }
    Err(InterpreterError::Parse {
        offset,
        message: "expected atom".to_string(),
    })
}

fn atom(pair: Pair<Rule>) -> Atom {
    let text = pair.as_str();
    match pair.as_rule() {
        Rule::expression => Atom::Expression(pair.into_inner().map(atom).collect()),
        Rule::string => Atom::Str(unescape(&text[1..text.len() - 1])),
        Rule::variable => Atom::var(&text[1..]),
        _ => Atom::sym(text),
    }
}

fn unescape(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            text.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => text.push('\n'),
            Some('t') => text.push('\t'),
            Some(c @ ('"' | '\\')) => text.push(c),
            Some(c) => {
                text.push('\\');
                text.push(c);
            }
            None => text.push('\\'),
        }
    }
    text
}
