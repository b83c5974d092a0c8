//! Interpreter backed by an installed `metta` executable.
//!
//! Each `run` is a fresh process, so statements that change the space are kept
//! and replayed ahead of the next program. Results come back as text only and no
//! space handle is exposed.

use crate::parser::{parse_program, Statement};
use kg_types::{AtomSpace, Interpreter, InterpreterError, RunOutput};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::process::Command;
use tokio::sync::Mutex;

pub struct ProcessInterpreter {
    program: PathBuf,
    /// Statements replayed ahead of every program.
    history: Mutex<Vec<Statement>>,
}

impl ProcessInterpreter {
    /// Resolve `name` (a path, or a bare name searched on `PATH`).
    pub fn locate(name: &str) -> Result<Self, InterpreterError> {
        let program = find_executable(name).ok_or_else(|| {
            InterpreterError::Unavailable(format!("`{}` not found on PATH", name))
        })?;
        Ok(Self {
            program,
            history: Mutex::new(Vec::new()),
        })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

fn find_executable(name: &str) -> Option<PathBuf> {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|p| p.is_file())
}

fn mutates_space(statement: &Statement) -> bool {
    !statement.eval || statement.atom.head() == Some("add-atom")
}

#[async_trait::async_trait]
impl Interpreter for ProcessInterpreter {
    fn name(&self) -> &str {
        "process"
    }

    async fn run(&self, program: &str) -> Result<RunOutput, InterpreterError> {
        let statements = parse_program(program)?;
        let mut history = self.history.lock().await;
        let replayed_results = history.iter().filter(|s| s.eval).count();

        let mut file = tempfile::Builder::new().suffix(".metta").tempfile()?;
        for statement in history.iter() {
            let bang = if statement.eval { "!" } else { "" };
            writeln!(file, "{}{}", bang, statement.atom)?;
        }
        writeln!(file, "{}", program)?;
        file.flush()?;

        tracing::debug!(
            program = %self.program.display(),
            replayed = history.len(),
            "running metta process"
        );
        let output = Command::new(&self.program)
            .arg(file.path())
            .output()
            .await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InterpreterError::Script(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        // One output line per evaluated statement; drop the replayed ones.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let text = stdout
            .lines()
            .skip(replayed_results)
            .collect::<Vec<_>>()
            .join("\n");

        history.extend(statements.into_iter().filter(mutates_space));
        Ok(RunOutput::Text(text))
    }

    fn space(&self) -> Option<Arc<dyn AtomSpace>> {
        None
    }
}
