//! Error handling for the Catalyst WP application.
//! Defines custom error types and results used throughout the application.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for Catalyst WP operations.
///
/// Validation and precondition variants are raised before anything touches
/// the disk. External tool variants are raised mid-pipeline and trigger a
/// rollback of the steps that already ran.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    #[error("Invalid project name '{name}': use lowercase letters, digits and single hyphens.")]
    InvalidProjectName { name: String },

    #[error("Invalid upstream repository '{url}': please enter a valid git repo url.")]
    InvalidUpstream { url: String },

    #[error("Invalid host name '{host}'.")]
    InvalidHostname { host: String },

    #[error("Invalid class name '{name}': {reason}.")]
    InvalidClassName { name: String, reason: String },

    /// Raised before cloning into a directory that already has content
    #[error("Directory is not empty, cannot git clone ({dir}).")]
    DirectoryNotEmpty { dir: String },

    #[error("Please run command in a Catalyst WP project directory.")]
    NotInProject,

    #[error("Please run command in a Catalyst WP project directory or specify a project name with -p.")]
    MissingProjectName,

    #[error("Site '{site}' is not registered in {config}.")]
    SiteNotFound { site: String, config: String },

    /// External command exited with a non-zero status or could not be spawned
    #[error("Command '{command}' failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Git error: {0}.")]
    Git2Error(#[from] git2::Error),

    #[error("Template '{}' could not be read: {source}.", .path.display())]
    TemplateReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Template error: {0}.")]
    MinijinjaError(#[from] minijinja::Error),

    #[error("Configuration error: {0}.")]
    ConfigError(String),

    #[error("YAML error: {0}.")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON error: {0}.")]
    JsonError(#[from] serde_json::Error),

    /// Represents failures while reading answers from the terminal
    #[error("Prompt error: {0}.")]
    PromptError(#[from] dialoguer::Error),
}

/// Convenience type alias for Results with Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}
