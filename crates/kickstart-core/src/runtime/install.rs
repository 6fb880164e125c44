//! Dependency installation for generated projects
//!
//! Runs `npm install` in the project directory and streams its output.

use super::check::npm_binary;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// Timeout for `npm install` (5 minutes)
const INSTALL_TIMEOUT: Duration = Duration::from_secs(300);

/// The command line shown to the user
pub fn install_command() -> String {
    format!("{} install", npm_binary())
}

/// Install the project's npm dependencies, streaming output
pub async fn install_dependencies(project_dir: &Path) -> Result<()> {
    let cmd = install_command();
    println!();
    println!("{} {}", "Running:".dimmed(), cmd.yellow());
    println!();

    let mut child = TokioCommand::new(npm_binary())
        .arg("install")
        .current_dir(project_dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to start `{}`", cmd))?;

    let stdout = child
        .stdout
        .take()
        .context("Failed to capture npm stdout")?;
    let stderr = child
        .stderr
        .take()
        .context("Failed to capture npm stderr")?;

    let mut stdout_reader = BufReader::new(stdout).lines();
    let mut stderr_reader = BufReader::new(stderr).lines();

    let output_task = async {
        let mut stderr_open = true;
        loop {
            tokio::select! {
                line = stdout_reader.next_line() => {
                    match line {
                        Ok(Some(line)) => println!("  {}", line),
                        Ok(None) => break,
                        Err(e) => {
                            eprintln!("{} {}", "Error reading stdout:".red(), e);
                            break;
                        }
                    }
                }
                line = stderr_reader.next_line(), if stderr_open => {
                    match line {
                        Ok(Some(line)) => eprintln!("  {}", line.yellow()),
                        Ok(None) => stderr_open = false,
                        Err(e) => {
                            eprintln!("{} {}", "Error reading stderr:".red(), e);
                            stderr_open = false;
                        }
                    }
                }
            }
        }
    };

    if timeout(INSTALL_TIMEOUT, output_task).await.is_err() {
        let _ = child.kill().await;
        println!();
        anyhow::bail!(
            "`{}` timed out after {} seconds. Run it manually in {}",
            cmd,
            INSTALL_TIMEOUT.as_secs(),
            project_dir.display()
        );
    }

    match timeout(Duration::from_secs(10), child.wait()).await {
        Ok(Ok(status)) => {
            println!();
            if status.success() {
                Ok(())
            } else {
                anyhow::bail!(
                    "`{}` failed with exit code: {}",
                    cmd,
                    status.code().unwrap_or(-1)
                );
            }
        }
        Ok(Err(e)) => anyhow::bail!("Failed to wait for npm: {}", e),
        Err(_) => {
            let _ = child.kill().await;
            anyhow::bail!("`{}` hung. Run it manually in {}", cmd, project_dir.display());
        }
    }
}
