//! AtomSpace graph demo binary. Takes no arguments; see `DemoConfig` for settings.

use kg_demo::{pipeline, DemoConfig};
use kg_render::GraphvizRenderer;
use kg_types::Interpreter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = DemoConfig::from_env();

    let interpreter = match config.build_interpreter() {
        Ok(interpreter) => interpreter,
        Err(e) => {
            eprintln!(
                "ERROR: failed to set up the `{}` knowledge engine backend: {}",
                config.backend, e
            );
            std::process::exit(1);
        }
    };

    let renderer = match GraphvizRenderer::new(config.dot_bin.clone(), &config.format) {
        Ok(renderer) => renderer,
        Err(e) => {
            eprintln!("ERROR: failed to set up the Graphviz renderer: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        backend = interpreter.name(),
        format = %renderer.format(),
        "starting AtomSpace graph demo"
    );
    pipeline::run(&config, interpreter, &renderer, &pipeline::source_triples()).await?;
    Ok(())
}
