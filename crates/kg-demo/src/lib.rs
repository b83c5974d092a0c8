//! AtomSpace graph demo: insert a small triple set into a MeTTa engine, read it
//! back, render it with Graphviz, and save the recovered triples as JSON.

pub mod config;
pub mod persist;
pub mod pipeline;

pub use config::{ConfigError, DemoConfig};
pub use persist::{load_triples, save_triples, PersistError};
pub use pipeline::{run, source_triples, DemoError, DemoReport, RenderOutcome, SOURCE_TRIPLES};
