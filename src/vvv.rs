//! VVV (Varying Vagrant Vagrants) backend.
//! Projects live under `<vagrant_dir>/www/<name>` and are registered in the
//! shared `<vagrant_dir>/config/config.yml`.
//!
//! The YAML file is read whole, edited in memory and written back without
//! locking, so two concurrent invocations can lose one another's update.

use crate::constants::templates;
use crate::error::{Error, Result};
use crate::guard::{self, WriteOutcome};
use crate::project::{ProjectAnswers, ProjectBackend, ProjectLayout};
use crate::renderer::TemplateStore;
use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One entry of the `sites` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub hosts: Vec<String>,
    /// Keys this tool does not manage (`repo`, `custom`, ...)
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

/// The VVV environment configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VvvConfig {
    #[serde(default)]
    pub sites: IndexMap<String, SiteConfig>,
    /// Every other top-level section, preserved as-is
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

impl VvvConfig {
    /// Loads the config file.
    ///
    /// # Errors
    /// * `Error::ConfigError` if the file does not exist
    /// * `Error::YamlError` if it cannot be parsed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                Error::ConfigError(format!("VVV config not found at {}", path.display()))
            }
            _ => Error::IoError(e),
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path.as_ref(), content).map_err(Error::IoError)
    }

    /// Registers `name` with the given hosts unless it is already present.
    ///
    /// # Returns
    /// * `bool` - `true` if the site was added
    pub fn add_site(&mut self, name: &str, hosts: Vec<String>) -> bool {
        if self.sites.contains_key(name) {
            return false;
        }
        self.sites.insert(name.to_string(), SiteConfig { hosts, ..Default::default() });
        true
    }

    /// Removes `name`, keeping the order of the remaining sites.
    pub fn remove_site(&mut self, name: &str) -> Option<SiteConfig> {
        self.sites.shift_remove(name)
    }

    /// Appends `host` to the hosts of `name`.
    ///
    /// # Returns
    /// * `Ok(true)` - Host appended
    /// * `Ok(false)` - Host was already listed
    /// * `Err(Error::SiteNotFound)` - No such site; nothing is created
    pub fn add_host(&mut self, name: &str, host: &str, config_path: &Path) -> Result<bool> {
        let site = self.sites.get_mut(name).ok_or_else(|| Error::SiteNotFound {
            site: name.to_string(),
            config: config_path.display().to_string(),
        })?;
        if site.hosts.iter().any(|h| h == host) {
            return Ok(false);
        }
        site.hosts.push(host.to_string());
        Ok(true)
    }
}

/// Project backend for a VVV checkout.
#[derive(Debug, Clone)]
pub struct VvvBackend {
    vagrant_dir: PathBuf,
}

impl VvvBackend {
    pub fn new<P: AsRef<Path>>(vagrant_dir: P) -> Self {
        Self { vagrant_dir: vagrant_dir.as_ref().to_path_buf() }
    }

    pub fn config_path(&self) -> PathBuf {
        self.vagrant_dir.join("config").join("config.yml")
    }

    fn project_dir(&self, project_name: &str) -> PathBuf {
        self.vagrant_dir.join("www").join(project_name)
    }

    fn update_config<F, T>(&self, edit: F) -> Result<T>
    where
        F: FnOnce(&mut VvvConfig, &Path) -> Result<(T, bool)>,
    {
        let path = self.config_path();
        let mut config = VvvConfig::load(&path)?;
        let (value, changed) = edit(&mut config, &path)?;
        if changed {
            debug!("Saving {}", path.display());
            config.save(&path)?;
        }
        Ok(value)
    }
}

impl ProjectBackend for VvvBackend {
    fn layout(&self, project_name: &str) -> ProjectLayout {
        let project_dir = self.project_dir(project_name);
        ProjectLayout {
            htdocs: project_dir.join("htdocs"),
            provision: project_dir.join("provision"),
            project_dir,
        }
    }

    fn write_configs(
        &self,
        answers: &ProjectAnswers,
        templates: &TemplateStore,
        written: &mut Vec<PathBuf>,
    ) -> Result<()> {
        let layout = self.layout(&answers.project_name);
        let context = answers.template_context();
        let targets = [
            ("virtualhost", templates::NGINX_CONF, layout.provision.join("vvv-nginx.conf")),
            ("initialize", templates::INIT_SCRIPT, layout.provision.join("vvv-init.sh")),
        ];

        for (label, template, target) in targets {
            if target.exists() {
                warn!("Skipping: {} template already exists.", label);
                continue;
            }
            let content = templates.render(template, &context)?;
            if guard::write_if_absent(label, &target, &content)? == WriteOutcome::Written {
                written.push(target);
            }
        }
        Ok(())
    }

    fn register(&self, answers: &ProjectAnswers) -> Result<bool> {
        let added = self.update_config(|config, _| {
            let added = config.add_site(&answers.project_name, vec![answers.domain()]);
            Ok((added, added))
        })?;
        if added {
            info!("Enabled install: {}", answers.domain());
        } else {
            warn!("Skipping: site '{}' is already registered.", answers.project_name);
        }
        Ok(added)
    }

    fn unregister(&self, project_name: &str) -> Result<bool> {
        self.update_config(|config, _| {
            let removed = config.remove_site(project_name).is_some();
            Ok((removed, removed))
        })
    }

    fn delete(&self, project_name: &str) -> Result<()> {
        if !self.unregister(project_name)? {
            warn!("Skipping: site '{}' is not registered.", project_name);
        }

        // Only directories carrying the marker file were created by this tool.
        let layout = self.layout(project_name);
        if !layout.project_dir.exists() {
            warn!("Skipping: {} does not exist.", layout.project_dir.display());
        } else if !layout.marker_path().exists() {
            warn!(
                "Keeping {}: not a Catalyst WP project, remove it by hand if needed.",
                layout.project_dir.display()
            );
        } else {
            info!("Removing {}", layout.project_dir.display());
            guard::remove_path(&layout.project_dir)?;
        }
        Ok(())
    }

    fn add_domain(&self, project_name: &str, host: &str) -> Result<()> {
        let added = self.update_config(|config, path| {
            let added = config.add_host(project_name, host, path)?;
            Ok((added, added))
        })?;
        if added {
            info!("Added {} to {}", host, project_name);
        } else {
            warn!("Skipping: {} is already a host of {}.", host, project_name);
        }
        Ok(())
    }
}
