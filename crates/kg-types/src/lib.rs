//! Core types and traits for the AtomSpace graph demo.
//!
//! `Atom` mirrors the MeTTa atom grammar; `Triple` is the labeled edge the demo
//! inserts and recovers.

mod atom;
mod traits;
mod triple;

pub use atom::*;
pub use traits::*;
pub use triple::*;
