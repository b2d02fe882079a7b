//! Process invocation seam for the CA toolchain.
//!
//! [`CommandRunner`] abstracts how toolchain commands are executed.
//! [`DockerRunner`] is the production implementation: each command runs in a
//! fresh `--rm` container with the PKI directory bind-mounted, matching how
//! the kylemanna/openvpn image is operated. [`ScriptedRunner`] replays canned
//! output for tests.

use std::collections::VecDeque;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::Mutex;

use crate::error::CaError;

/// Captured output of a finished toolchain command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code, `-1` if the process was killed by a signal.
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the command exited zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// Case-insensitive substring check across both output streams.
    ///
    /// easy-rsa reports conditions like "already revoked" on whichever stream
    /// its prompts happen to land on, so callers check both.
    #[must_use]
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.stdout.to_lowercase().contains(&needle)
            || self.stderr.to_lowercase().contains(&needle)
    }

    /// The most useful error text: stderr if present, stdout otherwise.
    #[must_use]
    pub fn detail(&self) -> String {
        let err = self.stderr.trim();
        if err.is_empty() {
            self.stdout.trim().to_owned()
        } else {
            err.to_owned()
        }
    }
}

/// Executes commands against the CA toolchain.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync + 'static {
    /// Run a toolchain command in a fresh container.
    ///
    /// `stdin` is piped to the process when given (the CA passphrase,
    /// interactive confirmations) and the pipe is closed afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`CaError::Spawn`] if the process cannot be started or its
    /// pipes fail. A non-zero exit is *not* an error at this layer — callers
    /// inspect [`CommandOutput::status`].
    async fn run(&self, args: &[String], stdin: Option<&str>) -> Result<CommandOutput, CaError>;

    /// Run a shell snippet inside the long-running VPN container.
    ///
    /// Used to publish the regenerated CRL where the OpenVPN daemon reads it.
    ///
    /// # Errors
    ///
    /// Returns [`CaError::Spawn`] if the process cannot be started.
    async fn exec_in_container(&self, script: &str) -> Result<CommandOutput, CaError>;
}

/// Production runner: `docker run`/`docker exec` against the VPN image.
#[derive(Debug, Clone)]
pub struct DockerRunner {
    /// Host directory bind-mounted at `/etc/openvpn` inside the container.
    pub vpn_data: String,
    /// Image carrying easy-rsa and the ovpn helper scripts.
    pub image: String,
    /// Name of the long-running VPN container (for `docker exec`).
    pub container: String,
    /// Prefix invocations with `sudo`.
    pub use_sudo: bool,
}

impl DockerRunner {
    /// Leading argv for every docker invocation.
    fn docker_argv(&self) -> Vec<String> {
        if self.use_sudo {
            vec!["sudo".to_owned(), "docker".to_owned()]
        } else {
            vec!["docker".to_owned()]
        }
    }

    async fn invoke(argv: Vec<String>, stdin: Option<&str>) -> Result<CommandOutput, CaError> {
        tracing::debug!(command = %argv.join(" "), piped_stdin = stdin.is_some(), "invoking toolchain");

        let mut parts = argv.into_iter();
        let program = parts.next().unwrap_or_else(|| "docker".to_owned());
        let mut command = Command::new(program);
        command
            .args(parts)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });

        let mut child = command.spawn()?;
        if let Some(input) = stdin {
            if let Some(mut pipe) = child.stdin.take() {
                pipe.write_all(input.as_bytes()).await?;
                // Dropping the pipe sends EOF so easy-rsa stops prompting.
            }
        }

        let output = child.wait_with_output().await?;
        Ok(CommandOutput {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[async_trait::async_trait]
impl CommandRunner for DockerRunner {
    async fn run(&self, args: &[String], stdin: Option<&str>) -> Result<CommandOutput, CaError> {
        let mut argv = self.docker_argv();
        argv.push("run".to_owned());
        argv.push("-v".to_owned());
        argv.push(format!("{}:/etc/openvpn", self.vpn_data));
        argv.push("--rm".to_owned());
        if stdin.is_some() {
            argv.push("-i".to_owned());
        }
        argv.push(self.image.clone());
        argv.extend_from_slice(args);

        Self::invoke(argv, stdin).await
    }

    async fn exec_in_container(&self, script: &str) -> Result<CommandOutput, CaError> {
        let mut argv = self.docker_argv();
        argv.push("exec".to_owned());
        argv.push(self.container.clone());
        argv.push("sh".to_owned());
        argv.push("-c".to_owned());
        argv.push(script.to_owned());

        Self::invoke(argv, None).await
    }
}

/// A recorded invocation made through a [`ScriptedRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Arguments passed to [`CommandRunner::run`], or `["exec", script]` for
    /// [`CommandRunner::exec_in_container`].
    pub args: Vec<String>,
    pub stdin: Option<String>,
}

/// Replays canned responses in order — for testing only.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: Mutex<VecDeque<CommandOutput>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedRunner {
    /// Create a runner that will return the given outputs in order.
    #[must_use]
    pub fn new(responses: Vec<CommandOutput>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue one more response.
    pub async fn push_response(&self, output: CommandOutput) {
        self.responses.lock().await.push_back(output);
    }

    /// Every invocation made so far, in order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    async fn next_response(&self) -> Result<CommandOutput, CaError> {
        self.responses.lock().await.pop_front().ok_or_else(|| {
            CaError::Spawn(std::io::Error::other("scripted runner exhausted"))
        })
    }
}

#[async_trait::async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, args: &[String], stdin: Option<&str>) -> Result<CommandOutput, CaError> {
        self.calls.lock().await.push(RecordedCall {
            args: args.to_vec(),
            stdin: stdin.map(str::to_owned),
        });
        self.next_response().await
    }

    async fn exec_in_container(&self, script: &str) -> Result<CommandOutput, CaError> {
        self.calls.lock().await.push(RecordedCall {
            args: vec!["exec".to_owned(), script.to_owned()],
            stdin: None,
        });
        self.next_response().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn out(status: i32, stdout: &str, stderr: &str) -> CommandOutput {
        CommandOutput {
            status,
            stdout: stdout.to_owned(),
            stderr: stderr.to_owned(),
        }
    }

    #[test]
    fn mentions_checks_both_streams_case_insensitively() {
        let o = out(1, "", "Certificate was Already REVOKED");
        assert!(o.mentions("already revoked"));

        let o = out(0, "already revoked\n", "");
        assert!(o.mentions("Already Revoked"));

        let o = out(0, "revoked", "");
        assert!(!o.mentions("already revoked"));
    }

    #[test]
    fn detail_prefers_stderr() {
        assert_eq!(out(1, "ignored", "  boom \n").detail(), "boom");
        assert_eq!(out(1, " fallback ", "").detail(), "fallback");
    }

    #[tokio::test]
    async fn scripted_runner_replays_in_order_and_records_calls() {
        let runner = ScriptedRunner::new(vec![out(0, "first", ""), out(1, "second", "")]);

        let a = runner
            .run(&["easyrsa".to_owned()], Some("pw\n"))
            .await
            .unwrap();
        assert_eq!(a.stdout, "first");

        let b = runner.exec_in_container("true").await.unwrap();
        assert_eq!(b.stdout, "second");

        let calls = runner.calls().await;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].stdin.as_deref(), Some("pw\n"));
        assert_eq!(calls[1].args, vec!["exec".to_owned(), "true".to_owned()]);
    }

    #[tokio::test]
    async fn scripted_runner_errors_when_exhausted() {
        let runner = ScriptedRunner::default();
        let err = runner.run(&[], None).await.unwrap_err();
        assert!(matches!(err, CaError::Spawn(_)));
    }
}
