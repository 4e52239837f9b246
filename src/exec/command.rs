// src/exec/command.rs

use std::process::Stdio;

use anyhow::Context;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::PublishSettings;
use crate::errors::{Result, SharepushError};
use crate::exec::backend::{PublishBackend, PublishFuture};

const REDACTED: &str = "******";

/// Runs the external publish CLI (`dacli` by default).
///
/// Upload:
/// `putObject -p <endpoint> -t <tenant> -u <user> -P <password> -c <container>
///  -f <file> -o <file> --xdata <metadata>`
///
/// Synchronize:
/// `sync -p <endpoint> -t <tenant> -u <user> -P <password> -c <container> --sync`
///
/// Only the exit status matters; stdout is logged, never parsed.
#[derive(Debug, Clone)]
pub struct CommandPublisher {
    settings: PublishSettings,
}

impl CommandPublisher {
    pub fn new(settings: PublishSettings) -> Self {
        Self { settings }
    }

    /// Arguments for uploading `file` into `container`.
    pub fn upload_args(&self, file: &str, container: &str) -> Vec<String> {
        let mut args = vec!["putObject".to_string()];
        args.extend(self.common_args(container));
        args.extend(
            [
                "-f",
                file,
                "-o",
                file,
                "--xdata",
                self.settings.metadata.as_str(),
            ]
            .map(String::from),
        );
        args
    }

    /// Arguments for synchronizing `container`.
    pub fn sync_args(&self, container: &str) -> Vec<String> {
        let mut args = vec!["sync".to_string()];
        args.extend(self.common_args(container));
        args.push("--sync".to_string());
        args
    }

    fn common_args(&self, container: &str) -> Vec<String> {
        let s = &self.settings;
        [
            "-p",
            s.endpoint.as_str(),
            "-t",
            s.tenant.as_str(),
            "-u",
            s.user.as_str(),
            "-P",
            s.password.as_str(),
            "-c",
            container,
        ]
        .map(String::from)
        .to_vec()
    }

    /// Copy of `args` safe to log.
    fn redacted(&self, args: &[String]) -> Vec<String> {
        let mut out = args.to_vec();
        for i in 1..out.len() {
            if out[i - 1] == "-P" {
                out[i] = REDACTED.to_string();
            }
        }
        out
    }

    async fn run(&self, args: Vec<String>) -> Result<()> {
        let program = self.settings.program.as_str();
        info!(cmd = %program, args = ?self.redacted(&args), "running publish command");

        let mut cmd = Command::new(program);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .with_context(|| format!("spawning publish command '{program}'"))?;

        // On timeout the child is dropped, which kills it.
        let output = match timeout(self.settings.timeout, child.wait_with_output()).await {
            Ok(res) => res.with_context(|| format!("waiting for publish command '{program}'"))?,
            Err(_) => {
                return Err(SharepushError::CommandTimedOut {
                    program: program.to_string(),
                    timeout: self.settings.timeout,
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            info!(cmd = %program, "result: {}", stdout.trim_end());
        }
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            debug!(cmd = %program, "stderr: {}", line);
        }

        if output.status.success() {
            Ok(())
        } else {
            let code = output.status.code().unwrap_or(-1);
            warn!(cmd = %program, exit_code = code, "publish command failed");
            Err(SharepushError::CommandFailed {
                program: program.to_string(),
                code,
            })
        }
    }
}

impl PublishBackend for CommandPublisher {
    fn upload<'a>(&'a self, file: &'a str, destination: &'a str) -> PublishFuture<'a> {
        Box::pin(async move {
            info!(file = %file, destination = %destination, "uploading file");
            self.run(self.upload_args(file, destination)).await
        })
    }

    fn synchronize<'a>(&'a self, destination: &'a str) -> PublishFuture<'a> {
        Box::pin(async move {
            info!(destination = %destination, "synchronizing container");
            self.run(self.sync_args(destination)).await
        })
    }
}
