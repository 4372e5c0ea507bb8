// src/responder/command.rs — External-command responder

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::Responder;
use crate::infra::errors::TillerError;

/// Runs an external program once per request: input on stdin, reply on
/// stdout. This is how capabilities that live outside the process plug in,
/// like a chart generator that writes image files and prints their paths.
pub struct CommandResponder {
    name: String,
    program: String,
    args: Vec<String>,
}

impl CommandResponder {
    pub fn new(name: impl Into<String>, program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args,
        }
    }

    fn fail(&self, message: String) -> TillerError {
        TillerError::Responder {
            responder: self.name.clone(),
            message,
        }
    }
}

#[async_trait]
impl Responder for CommandResponder {
    fn name(&self) -> &str {
        &self.name
    }

    async fn respond(&self, input: &str) -> Result<String, TillerError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.fail(format!("failed to start '{}': {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input.as_bytes())
                .await
                .map_err(|e| self.fail(format!("write to '{}' failed: {}", self.program, e)))?;
            // Dropping closes the pipe so the child sees EOF.
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| self.fail(format!("'{}' did not finish: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(self.fail(format!("'{}' exited with {}", self.program, output.status)));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echoes_through_cat() {
        let responder = CommandResponder::new("chart_maker", "cat", vec![]);
        let out = responder.respond("saved plots/fares.png").await.unwrap();
        assert_eq!(out, "saved plots/fares.png");
    }

    #[tokio::test]
    async fn test_missing_program_is_responder_error() {
        let responder = CommandResponder::new("chart_maker", "no-such-binary-xyz", vec![]);
        let err = responder.respond("anything").await.unwrap_err();
        assert!(matches!(err, TillerError::Responder { .. }));
        assert!(err.to_string().contains("chart_maker"));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_responder_error() {
        let responder = CommandResponder::new("flaky", "false", vec![]);
        let err = responder.respond("anything").await.unwrap_err();
        assert!(err.to_string().contains("exited with"));
    }
}
