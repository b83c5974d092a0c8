//! Graph view over recovered triples, DOT emission, and Graphviz rendering.

mod graphviz;
mod view;

pub use graphviz::{GraphvizRenderer, OutputFormat, RenderError, Renderer};
pub use view::{GraphView, GRAPH_NAME};
