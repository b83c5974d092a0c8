//! Rendering through the Graphviz `dot` program.

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::str::FromStr;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Image formats accepted for `-T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Svg,
    Pdf,
    Jpg,
    Gif,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Gif => "gif",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "svg" => Ok(OutputFormat::Svg),
            "pdf" => Ok(OutputFormat::Pdf),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpg),
            "gif" => Ok(OutputFormat::Gif),
            _ => Err(RenderError::UnsupportedFormat(s.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns DOT source into an image file.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Render `dot` next to `stem`; returns the written path.
    async fn render(&self, dot: &str, stem: &Path) -> Result<PathBuf, RenderError>;
}

/// Pipes DOT source to a Graphviz layout program.
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    program: String,
    format: OutputFormat,
}

impl GraphvizRenderer {
    pub fn new(program: impl Into<String>, format: &str) -> Result<Self, RenderError> {
        Ok(Self {
            program: program.into(),
            format: format.parse()?,
        })
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// `stem` with the format's extension appended (`graph` -> `graph.png`).
    pub fn output_path(&self, stem: &Path) -> PathBuf {
        let mut path = stem.as_os_str().to_os_string();
        path.push(".");
        path.push(self.format.extension());
        PathBuf::from(path)
    }
}

#[async_trait]
impl Renderer for GraphvizRenderer {
    async fn render(&self, dot: &str, stem: &Path) -> Result<PathBuf, RenderError> {
        let out = self.output_path(stem);
        let mut child = Command::new(&self.program)
            .arg(format!("-T{}", self.format))
            .arg("-o")
            .arg(&out)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RenderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(dot.as_bytes()).await?;
        }
        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(RenderError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        tracing::info!(path = %out.display(), "rendered graph");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_formats() {
        assert_eq!("png".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert_eq!(" JPEG ".parse::<OutputFormat>().unwrap(), OutputFormat::Jpg);
        assert!(matches!(
            "bmpx".parse::<OutputFormat>(),
            Err(RenderError::UnsupportedFormat(f)) if f == "bmpx"
        ));
        assert!(GraphvizRenderer::new("dot", "tiff").is_err());
    }

    #[test]
    fn output_path_appends_extension() {
        let renderer = GraphvizRenderer::new("dot", "svg").unwrap();
        assert_eq!(
            renderer.output_path(Path::new("out/graph")),
            PathBuf::from("out/graph.svg")
        );
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let renderer = GraphvizRenderer::new("/nonexistent/graphviz/dot", "png").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let err = renderer
            .render("digraph {}", &dir.path().join("graph"))
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::Spawn { .. }));
    }

    #[cfg(unix)]
    fn script(dir: &Path, name: &str, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn pipes_source_to_program() {
        let dir = tempfile::tempdir().unwrap();
        // Stand-in for dot: copies stdin to the -o path.
        let program = script(
            dir.path(),
            "fake-dot",
            "#!/bin/sh\nout=\"\"\nwhile [ $# -gt 0 ]; do\n  if [ \"$1\" = \"-o\" ]; then out=\"$2\"; shift; fi\n  shift\ndone\ncat > \"$out\"\n",
        );
        let renderer = GraphvizRenderer::new(program, "png").unwrap();
        let written = renderer
            .render("digraph { a -> b }", &dir.path().join("graph"))
            .await
            .unwrap();
        assert_eq!(written, dir.path().join("graph.png"));
        assert_eq!(std::fs::read_to_string(written).unwrap(), "digraph { a -> b }");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_carries_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(
            dir.path(),
            "broken-dot",
            "#!/bin/sh\ncat > /dev/null\necho 'syntax error' >&2\nexit 3\n",
        );
        let renderer = GraphvizRenderer::new(program, "png").unwrap();
        match renderer.render("digraph {", &dir.path().join("g")).await {
            Err(RenderError::Failed { stderr, .. }) => assert_eq!(stderr, "syntax error"),
            other => panic!("expected failure, got {:?}", other),
        }
    }
}
