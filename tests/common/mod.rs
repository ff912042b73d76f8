#![allow(dead_code)]

use catalyst_wp::config::Settings;
use catalyst_wp::constants::{DEFAULT_BOILERPLATE_REPO, DEFAULT_THEME_REPO};
use catalyst_wp::error::{Error, Result};
use catalyst_wp::prompt::Prompter;
use catalyst_wp::renderer::{MiniJinjaRenderer, TemplateStore};
use catalyst_wp::toolchain::Toolchain;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

pub const VVV_CONFIG: &str = r#"sites:
  wordpress-one:
    repo: https://github.com/Varying-Vagrant-Vagrants/custom-site-template.git
    hosts:
      - one.wordpress.test
utilities:
  core:
    - tls-ca
vm_config:
  memory: 2048
"#;

pub fn templates_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("templates")
}

pub fn template_store() -> TemplateStore {
    TemplateStore::new(templates_dir(), Box::new(MiniJinjaRenderer::new()))
}

/// Creates `www/` and `config/config.yml` under `vagrant_dir`.
pub fn vvv_env(vagrant_dir: &Path) {
    fs::create_dir_all(vagrant_dir.join("www")).unwrap();
    fs::create_dir_all(vagrant_dir.join("config")).unwrap();
    fs::write(vagrant_dir.join("config").join("config.yml"), VVV_CONFIG).unwrap();
}

pub fn settings(vagrant_dir: &Path) -> Settings {
    Settings {
        vagrant_dir: vagrant_dir.to_path_buf(),
        templates_dir: templates_dir(),
        boilerplate_repo: DEFAULT_BOILERPLATE_REPO.to_string(),
        theme_repo: DEFAULT_THEME_REPO.to_string(),
        install_command: "composer install".to_string(),
    }
}

/// Prompter replaying queued answers, falling back to each question's default.
#[derive(Default)]
pub struct ScriptedPrompter {
    confirms: RefCell<VecDeque<bool>>,
    inputs: RefCell<VecDeque<String>>,
    pub asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confirm_with(self, answer: bool) -> Self {
        self.confirms.borrow_mut().push_back(answer);
        self
    }

    pub fn input_with(self, answer: &str) -> Self {
        self.inputs.borrow_mut().push_back(answer.to_string());
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        self.asked.borrow_mut().push(prompt.to_string());
        Ok(self.confirms.borrow_mut().pop_front().unwrap_or(default))
    }

    fn input(&self, prompt: &str, default: &str) -> Result<String> {
        self.asked.borrow_mut().push(prompt.to_string());
        Ok(self.inputs.borrow_mut().pop_front().unwrap_or_else(|| default.to_string()))
    }
}

/// Toolchain that fakes clones by writing a few files.
#[derive(Default)]
pub struct FakeToolchain {
    pub fail_install: bool,
    pub clones: RefCell<Vec<(String, PathBuf)>>,
    pub installs: RefCell<Vec<PathBuf>>,
}

impl FakeToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_install() -> Self {
        Self { fail_install: true, ..Self::default() }
    }
}

impl Toolchain for FakeToolchain {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        self.clones.borrow_mut().push((url.to_string(), dest.to_path_buf()));
        fs::create_dir_all(dest.join(".git"))?;
        fs::write(dest.join(".git").join("HEAD"), "ref: refs/heads/master\n")?;
        if url == DEFAULT_THEME_REPO {
            fs::write(dest.join("style.css"), "/* Theme Name: Atom Child */\n")?;
        } else {
            fs::write(dest.join("index.php"), "<?php\n")?;
            fs::write(dest.join("composer.json"), "{}\n")?;
            fs::create_dir_all(dest.join("wp-content").join("themes"))?;
        }
        Ok(())
    }

    fn install_dependencies(&self, project_root: &Path) -> Result<()> {
        self.installs.borrow_mut().push(project_root.to_path_buf());
        if self.fail_install {
            return Err(Error::CommandFailed {
                command: "composer install".to_string(),
                stderr: "Your requirements could not be resolved".to_string(),
            });
        }
        fs::create_dir_all(project_root.join("vendor"))?;
        fs::write(project_root.join("vendor").join("autoload.php"), "<?php\n")?;
        Ok(())
    }
}
