//! Bridge between the demo and a knowledge engine: load triples in, read them back out.

mod adapters;
mod chain;
mod legacy;
mod loader;

pub use adapters::{
    select_query_adapter, select_space_adapter, BindingsQueryAdapter, ScanAdapter,
    ScriptQueryAdapter, TypeIndexAdapter,
};
pub use chain::{Recovered, RecoveryChain, Strategy};
pub use legacy::LegacyTextParser;
pub use loader::{insert_triples, insertion_script};
