//! Atom space and interpreters for the MeTTa subset the demo speaks.

mod interpreter;
mod parser;
mod process;
mod space;

pub use interpreter::MettaInterpreter;
pub use kg_types::{
    Atom, AtomSpace, Bindings, Interpreter, InterpreterError, RunOutput, SpaceCapabilities,
    SpaceError,
};
pub use parser::{parse_program, Statement};
pub use process::ProcessInterpreter;
pub use space::{match_atom, InMemoryAtomSpace};
