//! SSH/SCP backend
//!
//! Shells out to the system `ssh` and `scp` clients, so keys, agents and
//! `~/.ssh/config` host aliases work as they do interactively.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::error::GetError;
use crate::target::Target;

/// Run `command` on the target host and return its stdout
pub fn run_remote_command(target: &Target, command: &str) -> Result<String, GetError> {
    let mut cmd = Command::new("ssh");
    if let Some(port) = target.port() {
        cmd.args(["-p", port]);
    }
    cmd.arg(target.login()).arg(command);

    let output = run(cmd, "ssh")?;

    String::from_utf8(output.stdout)
        .map_err(|_| GetError::invalid_utf8(format!("ssh output from {}", target)))
}

/// Copy the target's path into `dest`, creating a temporary directory when
/// `dest` is `None`. Returns the directory the file was copied into.
///
/// A directory created here is not removed; the caller owns it.
pub fn copy_remote(target: &Target, dest: Option<&Path>) -> Result<PathBuf, GetError> {
    let path = target
        .path()
        .ok_or_else(|| GetError::invalid_target(target.to_string(), "no remote path"))?;

    let dest = match dest {
        Some(dir) => dir.to_path_buf(),
        None => tempfile::Builder::new()
            .prefix("refget-")
            .tempdir()
            .map_err(|e| GetError::file(std::env::temp_dir(), e))?
            .keep(),
    };

    run(scp_command(target, path, &dest), "scp")?;
    Ok(dest)
}

/// `scp -q -s [-P port] <login>:<path> <dest>`
///
/// `-s` selects the SFTP protocol, so the remote path is never handed to a
/// remote shell and must not be shell-quoted.
fn scp_command(target: &Target, path: &str, dest: &Path) -> Command {
    let mut cmd = Command::new("scp");
    cmd.args(["-q", "-s"]);
    if let Some(port) = target.port() {
        cmd.args(["-P", port]);
    }
    cmd.arg(format!("{}:{}", target.login(), path)).arg(dest);
    cmd
}

fn run(mut cmd: Command, tool: &str) -> Result<Output, GetError> {
    let args: Vec<_> = cmd.get_args().collect();
    tracing::debug!(tool, ?args, "Running external command");

    let output = cmd.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            GetError::ToolNotFound {
                tool: tool.to_string(),
            }
        } else {
            GetError::RemoteCommand {
                tool: tool.to_string(),
                status: "failed to start".to_string(),
                stderr: e.to_string(),
            }
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GetError::RemoteCommand {
            tool: tool.to_string(),
            status: output.status.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(output)
}
