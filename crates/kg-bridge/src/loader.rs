//! Graph loader: triples -> `add-atom` statements, submitted as one batch.

use kg_types::{Interpreter, InterpreterError, RunOutput, Triple};

/// Four statements per triple: three entities, then the ordered relation.
/// Labels are interpolated verbatim.
pub fn insertion_script(triples: &[Triple]) -> String {
    triples
        .iter()
        .map(|t| {
            let (s, r, o) = (&t.subject, &t.relation, &t.object);
            format!(
                "!(add-atom &self (Node \"{s}\"))\n\
                 !(add-atom &self (Node \"{r}\"))\n\
                 !(add-atom &self (Node \"{o}\"))\n\
                 !(add-atom &self (OrderedLink (Node \"{s}\") (Node \"{r}\") (Node \"{o}\")))\n"
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Submit the insertion script for `triples` in a single `run` call.
pub async fn insert_triples(
    interpreter: &dyn Interpreter,
    triples: &[Triple],
) -> Result<RunOutput, InterpreterError> {
    let script = insertion_script(triples);
    tracing::info!(
        backend = interpreter.name(),
        triples = triples.len(),
        "submitting insertion batch"
    );
    let output = interpreter.run(&script).await?;
    tracing::debug!(result = %output, "insertion batch finished");
    Ok(output)
}
