//! The demo run: insert, recover, render, persist.

use crate::config::DemoConfig;
use crate::persist::{save_triples, PersistError};
use kg_bridge::{insert_triples, Recovered, RecoveryChain, Strategy};
use kg_render::{GraphView, Renderer};
use kg_types::{Interpreter, InterpreterError, Triple};
use std::path::PathBuf;
use std::sync::Arc;

/// The triples the demo inserts: a small `knows` graph.
pub const SOURCE_TRIPLES: [(&str, &str, &str); 3] = [
    ("Alice", "knows", "Bob"),
    ("Bob", "knows", "Charlie"),
    ("Alice", "knows", "Charlie"),
];

pub fn source_triples() -> Vec<Triple> {
    SOURCE_TRIPLES.iter().map(|&t| Triple::from(t)).collect()
}

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("inserting triples failed: {0}")]
    Insert(#[from] InterpreterError),
    #[error("saving triples failed: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    Rendered(PathBuf),
    /// Rendering failed; the DOT source was printed instead.
    Printed { error: String, dot: String },
}

#[derive(Debug)]
pub struct DemoReport {
    pub recovered: Recovered,
    pub view: GraphView,
    pub render: RenderOutcome,
    pub triples_path: PathBuf,
}

/// Run the demo against `interpreter`, inserting `source` and writing outputs
/// where `config` says. Insertion and file-write failures are returned; all
/// other failures fall back.
pub async fn run(
    config: &DemoConfig,
    interpreter: Arc<dyn Interpreter>,
    renderer: &dyn Renderer,
    source: &[Triple],
) -> Result<DemoReport, DemoError> {
    println!("\n--- Running MeTTa code to insert atoms into AtomSpace ---");
    let inserted = insert_triples(interpreter.as_ref(), source).await?;
    println!("MeTTa insert result (raw): {}", inserted);

    let chain = RecoveryChain::for_interpreter(interpreter);
    match chain.space_adapter() {
        Some(name) => println!("Using the `{}` space adapter to access AtomSpace", name),
        None => println!("Interpreter exposes no AtomSpace handle"),
    }
    let recovered = chain.recover(source).await;
    if let Some(listed) = recovered.listed {
        println!("Found {} OrderedLink atoms via space API", listed);
    }
    if recovered.skipped > 0 {
        println!("Skipped {} malformed item(s)", recovered.skipped);
    }
    match recovered.strategy {
        Strategy::SpaceAccess => {}
        Strategy::PatternMatch => println!(
            "Recovered triples with the `{}` pattern match",
            chain.query_adapter()
        ),
        Strategy::LocalFallback => {
            println!("No triples recovered from AtomSpace; falling back to local triple list")
        }
    }

    println!("\nRecovered triples:");
    for t in &recovered.triples {
        println!("{}", t);
    }

    println!(
        "\n--- Building graphviz DOT graph and rendering to {} ---",
        config.output_stem.display()
    );
    let view = GraphView::from_triples(&recovered.triples);
    let dot = view.to_dot();
    let render = match renderer.render(&dot, &config.output_stem).await {
        Ok(path) => {
            println!("Wrote graph to {}", path.display());
            RenderOutcome::Rendered(path)
        }
        Err(e) => {
            tracing::warn!(error = %e, "graphviz render failed");
            println!("Graphviz render failed, printing DOT source instead:\n{}", e);
            println!("\nDOT source:\n\n{}", dot);
            RenderOutcome::Printed {
                error: e.to_string(),
                dot,
            }
        }
    };

    save_triples(&config.triples_path, &recovered.triples).await?;

    println!("\nDone. Files produced:");
    match &render {
        RenderOutcome::Rendered(path) => println!("- {}", path.display()),
        RenderOutcome::Printed { .. } => println!("- (no image; DOT source printed above)"),
    }
    println!("- {} (recovered triples)", config.triples_path.display());

    Ok(DemoReport {
        recovered,
        view,
        render,
        triples_path: config.triples_path.clone(),
    })
}
