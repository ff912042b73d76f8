//! External tools invoked while scaffolding a project.
//! Cloning goes through libgit2; dependency installation spawns the
//! configured installer command.

use crate::error::{Error, Result};
use log::{debug, info};
use std::cell::Cell;
use std::path::Path;
use std::process::Command;

/// Trait for the external collaborators a project needs.
///
/// Each call blocks until the tool finishes and reports only success or
/// failure; no retries are attempted.
pub trait Toolchain {
    /// Clones `url` into `dest`.
    ///
    /// # Errors
    /// * `Error::Git2Error` if the clone fails
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()>;

    /// Installs project dependencies inside `project_root`.
    ///
    /// # Errors
    /// * `Error::CommandFailed` on spawn failure or non-zero exit, carrying
    ///   the captured stderr
    fn install_dependencies(&self, project_root: &Path) -> Result<()>;
}

/// Toolchain backed by libgit2 and the system installer command.
#[derive(Debug, Clone)]
pub struct SystemToolchain {
    install_command: String,
}

impl SystemToolchain {
    /// Creates a new SystemToolchain instance.
    ///
    /// # Arguments
    /// * `install_command` - Installer command line, e.g. `composer install`
    pub fn new<S: Into<String>>(install_command: S) -> Self {
        Self { install_command: install_command.into() }
    }
}

impl Toolchain for SystemToolchain {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        debug!("Cloning '{}' to '{}'.", url, dest.display());

        // libgit2 keeps asking while credentials are rejected, so only hand
        // out each kind once.
        let attempts = Cell::new(0u8);
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            let user = username_from_url.unwrap_or("git");
            let attempt = attempts.get();
            attempts.set(attempt + 1);

            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                match attempt {
                    0 => git2::Cred::ssh_key_from_agent(user),
                    1 => {
                        let home = std::env::var("HOME").unwrap_or_default();
                        let key = Path::new(&home).join(".ssh").join("id_rsa");
                        git2::Cred::ssh_key(user, None, &key, None)
                    }
                    _ => Err(git2::Error::from_str("ssh authentication failed")),
                }
            } else if attempt == 0 {
                git2::Cred::default()
            } else {
                Err(git2::Error::from_str("authentication failed"))
            }
        });

        let mut fetch_opts = git2::FetchOptions::new();
        fetch_opts.remote_callbacks(callbacks);

        let mut builder = git2::build::RepoBuilder::new();
        builder.fetch_options(fetch_opts);
        builder.clone(url, dest).map_err(Error::Git2Error)?;
        Ok(())
    }

    fn install_dependencies(&self, project_root: &Path) -> Result<()> {
        run_command(&self.install_command, project_root)
    }
}

/// Runs a whitespace-separated command line inside `cwd`.
///
/// Stdout is logged on success; stderr is returned in the error otherwise.
pub fn run_command(command_line: &str, cwd: &Path) -> Result<()> {
    let mut parts = command_line.split_whitespace();
    let program = parts.next().ok_or_else(|| Error::CommandFailed {
        command: command_line.to_string(),
        stderr: "empty command".to_string(),
    })?;

    debug!("Running '{}' in {}", command_line, cwd.display());
    let output = Command::new(program)
        .args(parts)
        .current_dir(cwd)
        .output()
        .map_err(|e| Error::CommandFailed {
            command: command_line.to_string(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(Error::CommandFailed {
            command: command_line.to_string(),
            stderr: if stderr.is_empty() { output.status.to_string() } else { stderr },
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        info!("{}", stdout.trim_end());
    }
    Ok(())
}
