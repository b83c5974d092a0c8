//! Integration tests: load the demo triples into the in-memory engine, recover them back.

use async_trait::async_trait;
use kg_bridge::{insert_triples, RecoveryChain, Strategy};
use kg_space::{
    AtomSpace, InMemoryAtomSpace, Interpreter, InterpreterError, MettaInterpreter, RunOutput,
    SpaceCapabilities,
};
use kg_types::Triple;
use std::sync::Arc;

/// Engine that only prints its results, like an external `metta` process.
struct TextOnlyEngine(MettaInterpreter);

#[async_trait]
impl Interpreter for TextOnlyEngine {
    fn name(&self) -> &str {
        "text-only"
    }

    async fn run(&self, program: &str) -> Result<RunOutput, InterpreterError> {
        let output = self.0.run(program).await?;
        Ok(RunOutput::Text(output.to_string()))
    }

    fn space(&self) -> Option<Arc<dyn AtomSpace>> {
        None
    }
}

fn source() -> Vec<Triple> {
    vec![
        Triple::new("Alice", "knows", "Bob"),
        Triple::new("Bob", "knows", "Charlie"),
        Triple::new("Alice", "knows", "Charlie"),
    ]
}

async fn recover_with(metta: MettaInterpreter) -> (RecoveryChain, kg_bridge::Recovered) {
    let interpreter: Arc<dyn Interpreter> = Arc::new(metta);
    insert_triples(interpreter.as_ref(), &source()).await.unwrap();
    let chain = RecoveryChain::for_interpreter(interpreter);
    let recovered = chain.recover(&source()).await;
    (chain, recovered)
}

#[tokio::test]
async fn type_index_space_recovers_everything() {
    let (chain, recovered) = recover_with(MettaInterpreter::new()).await;
    assert_eq!(chain.space_adapter(), Some("type-index"));
    assert_eq!(recovered.strategy, Strategy::SpaceAccess);
    assert_eq!(recovered.listed, Some(3));
    assert_eq!(recovered.skipped, 0);
    assert_eq!(recovered.triples, source());
}

#[tokio::test]
async fn scan_only_space_recovers_everything() {
    let space = InMemoryAtomSpace::with_capabilities(SpaceCapabilities {
        type_index: false,
        pattern_query: true,
    });
    let (chain, recovered) = recover_with(MettaInterpreter::with_space(space)).await;
    assert_eq!(chain.space_adapter(), Some("scan"));
    assert_eq!(recovered.strategy, Strategy::SpaceAccess);
    assert_eq!(recovered.triples, source());
}

#[tokio::test]
async fn hidden_space_falls_back_to_match_program() {
    let (chain, recovered) =
        recover_with(MettaInterpreter::new().without_space_access()).await;
    assert_eq!(chain.space_adapter(), None);
    assert_eq!(chain.query_adapter(), "script");
    assert_eq!(recovered.strategy, Strategy::PatternMatch);
    assert_eq!(recovered.listed, None);
    assert_eq!(recovered.triples, source());
}

#[tokio::test]
async fn empty_store_falls_back_to_source() {
    let interpreter: Arc<dyn Interpreter> = Arc::new(MettaInterpreter::new());
    let chain = RecoveryChain::for_interpreter(interpreter);
    let recovered = chain.recover(&source()).await;
    assert_eq!(chain.query_adapter(), "bindings");
    assert_eq!(recovered.strategy, Strategy::LocalFallback);
    assert_eq!(recovered.listed, Some(0));
    assert_eq!(recovered.triples, source());
}

#[tokio::test]
async fn text_only_engine_recovers_through_legacy_parser() {
    let engine: Arc<dyn Interpreter> = Arc::new(TextOnlyEngine(MettaInterpreter::new()));
    insert_triples(engine.as_ref(), &source()).await.unwrap();
    let chain = RecoveryChain::for_interpreter(engine);
    let recovered = chain.recover(&[]).await;
    assert_eq!(chain.query_adapter(), "script");
    assert_eq!(recovered.strategy, Strategy::PatternMatch);
    assert_eq!(recovered.triples, source());
}
