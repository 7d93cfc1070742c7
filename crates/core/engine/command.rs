use super::{EngineError, EngineOutput, QueryEngine};
use crate::config::EngineConfig;
use crate::request::NormalizedRequest;
use serde::Deserialize;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Runs an external executable once per query.
///
/// The normalized request is written to the child's stdin as JSON. The child
/// answers on stdout with either `{"return": .., "kernels": ..}` or
/// `{"error": ".."}`. A non-zero exit status is an engine error carrying the
/// child's stderr.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: PathBuf,
    args: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Reply {
    Failure { error: String },
    Success(EngineOutput),
}

impl CommandEngine {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Returns `None` when no program is configured.
    pub fn from_config(config: &EngineConfig) -> Option<Self> {
        config
            .program
            .as_ref()
            .map(|program| Self::new(program.clone()).with_args(config.args.iter().cloned()))
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }
}

impl QueryEngine for CommandEngine {
    fn query(&self, request: &NormalizedRequest) -> Result<EngineOutput, EngineError> {
        let payload = serde_json::to_vec(request)
            .map_err(|e| EngineError(format!("failed to encode engine request: {}", e)))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                EngineError(format!(
                    "failed to start engine {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        // Feed stdin from a separate thread so a chatty child cannot deadlock us.
        let writer = child.stdin.take().map(|mut stdin| {
            std::thread::spawn(move || stdin.write_all(&payload))
        });

        let output = child
            .wait_with_output()
            .map_err(|e| EngineError(format!("engine did not complete: {}", e)))?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                // A child that exits without reading its input is judged by its reply.
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => {
                    return Err(EngineError(format!("failed to send engine request: {}", e)));
                }
                Err(_) => return Err(EngineError("engine request writer panicked".to_string())),
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            return Err(EngineError(if stderr.is_empty() {
                format!("engine exited with {}", output.status)
            } else {
                stderr.to_string()
            }));
        }

        match serde_json::from_slice::<Reply>(&output.stdout) {
            Ok(Reply::Success(output)) => Ok(output),
            Ok(Reply::Failure { error }) => Err(EngineError(error)),
            Err(e) => Err(EngineError(format!("malformed engine reply: {}", e))),
        }
    }
}
