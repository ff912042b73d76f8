//! Configuration handling for Catalyst WP.
//! Covers the process settings read from the environment, the marker file
//! that identifies a project root, and the lookup that finds that root.

use crate::constants::{
    DEFAULT_BOILERPLATE_REPO, DEFAULT_INSTALL_COMMAND, DEFAULT_THEME_DIR, DEFAULT_THEME_REPO,
    MARKER_FILE,
};
use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable names understood by [`Settings::from_env`].
pub mod vars {
    pub const VAGRANT_DIR: &str = "CATALYST_VAGRANT_DIR";
    pub const TEMPLATES_DIR: &str = "CATALYST_TEMPLATES_DIR";
    pub const BOILERPLATE: &str = "CATALYST_BOILERPLATE";
    pub const THEME_REPO: &str = "CATALYST_THEME_REPO";
    pub const INSTALL_CMD: &str = "CATALYST_INSTALL_CMD";
}

/// Process-wide settings, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Root of the VVV checkout (contains `www/` and `config/config.yml`)
    pub vagrant_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub boilerplate_repo: String,
    pub theme_repo: String,
    /// Dependency installer, split on whitespace before spawning
    pub install_command: String,
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    /// * `Error::ConfigError` if neither `CATALYST_VAGRANT_DIR` nor `HOME` is set
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vagrant_dir = match lookup(vars::VAGRANT_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => {
                let home = lookup("HOME").ok_or_else(|| {
                    Error::ConfigError(format!(
                        "HOME is not set; set {} to your VVV directory",
                        vars::VAGRANT_DIR
                    ))
                })?;
                PathBuf::from(home).join("vagrants")
            }
        };

        let templates_dir = lookup(vars::TEMPLATES_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("templates"));

        Ok(Self {
            vagrant_dir,
            templates_dir,
            boilerplate_repo: lookup(vars::BOILERPLATE)
                .unwrap_or_else(|| DEFAULT_BOILERPLATE_REPO.to_string()),
            theme_repo: lookup(vars::THEME_REPO).unwrap_or_else(|| DEFAULT_THEME_REPO.to_string()),
            install_command: lookup(vars::INSTALL_CMD)
                .unwrap_or_else(|| DEFAULT_INSTALL_COMMAND.to_string()),
        })
    }
}

/// Project-level settings stored in the marker file.
///
/// Every field has a default so that an empty `{}` marker still marks a
/// project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub project_name: String,
    pub ssl: bool,
    pub multisite: bool,
    pub upstream: String,
    /// Child theme directory relative to the project root
    pub theme: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            ssl: true,
            multisite: false,
            upstream: DEFAULT_BOILERPLATE_REPO.to_string(),
            theme: DEFAULT_THEME_DIR.to_string(),
        }
    }
}

impl ProjectConfig {
    /// Reads the marker file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(Error::IoError)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

/// A located Catalyst WP project: the directory holding the marker file and
/// the settings read from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRoot {
    pub path: PathBuf,
    pub config: ProjectConfig,
}

impl ProjectRoot {
    pub fn marker_path(&self) -> PathBuf {
        self.path.join(MARKER_FILE)
    }

    pub fn theme_dir(&self) -> PathBuf {
        self.path.join(&self.config.theme)
    }
}

/// Walks from `start` up through its ancestors until a directory holding the
/// marker file is found.
///
/// # Returns
/// * `Result<Option<ProjectRoot>>` - `None` when no ancestor is a project
///
/// # Errors
/// * `Error::JsonError` if the marker file exists but is malformed
pub fn find_project_root<P: AsRef<Path>>(start: P) -> Result<Option<ProjectRoot>> {
    for dir in start.as_ref().ancestors() {
        let marker = dir.join(MARKER_FILE);
        if marker.is_file() {
            debug!("Found project marker at {}", marker.display());
            let config = ProjectConfig::load(&marker)?;
            return Ok(Some(ProjectRoot { path: dir.to_path_buf(), config }));
        }
    }
    debug!("No {} found above {}", MARKER_FILE, start.as_ref().display());
    Ok(None)
}
