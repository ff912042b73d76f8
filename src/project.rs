//! Project lifecycle orchestration.
//! Creates, deletes and extends local WordPress projects. Environment
//! specifics (directory layout, virtual hosts, site registry) live behind
//! the [`ProjectBackend`] trait.

use crate::config::{ProjectConfig, Settings};
use crate::constants::{templates, DEFAULT_THEME_DIR, LOCAL_TLD, MARKER_FILE};
use crate::error::{Error, Result};
use crate::guard::{self, WriteOutcome};
use crate::pipeline::{Pipeline, Step};
use crate::prompt::Prompter;
use crate::renderer::TemplateStore;
use crate::toolchain::Toolchain;
use log::{debug, error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};

static PROJECT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("project name pattern is valid"));

static GIT_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(git|ssh|https?)|(git@[\w.]+))(:(//)?)([\w.@:/\-~]+)(\.git)(/)?$")
        .expect("git url pattern is valid")
});

static HOSTNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)*$")
        .expect("hostname pattern is valid")
});

/// Returns true for lowercase alphanumeric names with single inner hyphens.
pub fn is_valid_project_name(name: &str) -> bool {
    PROJECT_NAME.is_match(name)
}

/// Returns true when the whole of `url` is a git repository URL.
pub fn is_valid_git_url(url: &str) -> bool {
    GIT_URL.is_match(url)
}

pub fn is_valid_hostname(host: &str) -> bool {
    host.len() <= 253 && HOSTNAME.is_match(host)
}

/// Fails with `Error::InvalidProjectName` unless `name` is a valid project name.
pub fn validate_project_name(name: &str) -> Result<()> {
    if is_valid_project_name(name) {
        Ok(())
    } else {
        Err(Error::InvalidProjectName { name: name.to_string() })
    }
}

/// Answers collected when a project is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectAnswers {
    pub project_name: String,
    pub ssl: bool,
    pub multisite: bool,
    pub upstream: String,
}

impl ProjectAnswers {
    /// Primary local host name, e.g. `my-site.test`
    pub fn domain(&self) -> String {
        format!("{}.{}", self.project_name, LOCAL_TLD)
    }

    pub fn db_name(&self) -> String {
        self.project_name.replace('-', "_")
    }

    /// Context handed to every project template.
    pub fn template_context(&self) -> serde_json::Value {
        serde_json::json!({
            "project_name": self.project_name,
            "ssl": self.ssl,
            "multisite": self.multisite,
            "upstream": self.upstream,
            "domain": self.domain(),
            "db_name": self.db_name(),
            "scheme": if self.ssl { "https" } else { "http" },
        })
    }
}

impl From<&ProjectAnswers> for ProjectConfig {
    fn from(answers: &ProjectAnswers) -> Self {
        Self {
            project_name: answers.project_name.clone(),
            ssl: answers.ssl,
            multisite: answers.multisite,
            upstream: answers.upstream.clone(),
            theme: DEFAULT_THEME_DIR.to_string(),
        }
    }
}

/// Asks the create-time questions for `project_name`.
///
/// # Errors
/// * `Error::InvalidUpstream` if the upstream answer is not a git URL
pub fn ask_project_answers(
    prompt: &dyn Prompter,
    project_name: &str,
    default_upstream: &str,
) -> Result<ProjectAnswers> {
    let ssl = prompt.confirm("SSL", true)?;
    let multisite = prompt.confirm("Multisite", false)?;
    let upstream = prompt.input("Upstream git repo?", default_upstream)?.trim().to_string();

    if !is_valid_git_url(&upstream) {
        return Err(Error::InvalidUpstream { url: upstream });
    }

    Ok(ProjectAnswers { project_name: project_name.to_string(), ssl, multisite, upstream })
}

/// Directories a backend assigns to a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub project_dir: PathBuf,
    /// Web root; this is the project root holding the marker file
    pub htdocs: PathBuf,
    pub provision: PathBuf,
}

impl ProjectLayout {
    /// Directories in creation order, each with a label for log output.
    pub fn dirs(&self) -> [(&'static str, &Path); 3] {
        [
            ("project", self.project_dir.as_path()),
            ("htdocs", self.htdocs.as_path()),
            ("provision", self.provision.as_path()),
        ]
    }

    pub fn theme_dir(&self) -> PathBuf {
        self.htdocs.join(DEFAULT_THEME_DIR)
    }

    pub fn marker_path(&self) -> PathBuf {
        self.htdocs.join(MARKER_FILE)
    }
}

/// Environment-specific hooks used by the orchestrator.
pub trait ProjectBackend {
    fn layout(&self, project_name: &str) -> ProjectLayout;

    /// Writes environment configs (virtual host, provisioning script).
    ///
    /// # Arguments
    /// * `written` - Receives each file as soon as it is written, so a later
    ///   failure still leaves the list complete; skipped files are not listed
    fn write_configs(
        &self,
        answers: &ProjectAnswers,
        templates: &TemplateStore,
        written: &mut Vec<PathBuf>,
    ) -> Result<()>;

    /// Registers the site with the environment.
    ///
    /// # Returns
    /// * `Result<bool>` - `true` if this call added the registration
    fn register(&self, answers: &ProjectAnswers) -> Result<bool>;

    /// Removes the site registration, returning whether one existed.
    fn unregister(&self, project_name: &str) -> Result<bool>;

    /// Removes the registration and the project's files. Directories this
    /// tool did not create are left in place.
    fn delete(&self, project_name: &str) -> Result<()>;

    /// Adds another host name to a registered site.
    fn add_domain(&self, project_name: &str, host: &str) -> Result<()>;
}

/// Stages of project creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateStage {
    Validating,
    Prompting,
    ScaffoldingDirs,
    CloningBoilerplate,
    CloningTheme,
    InstallingDeps,
    WritingConfigs,
    RegisteringSite,
    Done,
    RollingBack,
    Aborted,
}

impl CreateStage {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CreateStage::Validating => "validating",
            CreateStage::Prompting => "prompting",
            CreateStage::ScaffoldingDirs => "scaffolding_dirs",
            CreateStage::CloningBoilerplate => "cloning_boilerplate",
            CreateStage::CloningTheme => "cloning_theme",
            CreateStage::InstallingDeps => "installing_deps",
            CreateStage::WritingConfigs => "writing_configs",
            CreateStage::RegisteringSite => "registering_site",
            CreateStage::Done => "done",
            CreateStage::RollingBack => "rolling_back",
            CreateStage::Aborted => "aborted",
        }
    }
}

impl fmt::Display for CreateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State shared by the create steps.
pub struct CreateContext<'a> {
    pub answers: ProjectAnswers,
    pub layout: ProjectLayout,
    settings: &'a Settings,
    toolchain: &'a dyn Toolchain,
    backend: &'a dyn ProjectBackend,
    templates: &'a TemplateStore,
    created_dirs: Vec<PathBuf>,
    written_files: Vec<PathBuf>,
    theme_cloned: bool,
    registered: bool,
    marker_written: bool,
}

struct ScaffoldDirs;
struct CloneBoilerplate;
struct CloneTheme;
struct InstallDeps;
struct WriteConfigs;
struct RegisterSite;

impl<'a> Step<CreateContext<'a>> for ScaffoldDirs {
    fn name(&self) -> &'static str {
        CreateStage::ScaffoldingDirs.as_str()
    }

    fn run(&self, ctx: &mut CreateContext<'a>) -> Result<()> {
        info!("Setting up project directories...");
        let layout = ctx.layout.clone();
        for (label, dir) in layout.dirs() {
            if guard::create_dir_if_absent(label, dir)? {
                ctx.created_dirs.push(dir.to_path_buf());
            }
        }
        Ok(())
    }

    fn compensate(&self, ctx: &mut CreateContext<'a>) -> Result<()> {
        while let Some(dir) = ctx.created_dirs.pop() {
            guard::remove_path(&dir)?;
        }
        Ok(())
    }
}

impl<'a> Step<CreateContext<'a>> for CloneBoilerplate {
    fn name(&self) -> &'static str {
        CreateStage::CloningBoilerplate.as_str()
    }

    fn run(&self, ctx: &mut CreateContext<'a>) -> Result<()> {
        guard::ensure_empty_dir(&ctx.layout.htdocs)?;
        info!("Cloning Catalyst WP...");
        ctx.toolchain.clone_repo(&ctx.settings.boilerplate_repo, &ctx.layout.htdocs)
    }

    fn compensate(&self, ctx: &mut CreateContext<'a>) -> Result<()> {
        // The web root was verified empty before cloning.
        guard::clear_dir(&ctx.layout.htdocs)
    }
}

impl<'a> Step<CreateContext<'a>> for CloneTheme {
    fn name(&self) -> &'static str {
        CreateStage::CloningTheme.as_str()
    }

    fn run(&self, ctx: &mut CreateContext<'a>) -> Result<()> {
        let theme_dir = ctx.layout.theme_dir();
        if !guard::is_empty_dir(&theme_dir)? {
            warn!("Skipping: child theme directory is not empty ({}).", theme_dir.display());
            return Ok(());
        }

        info!("Setting up child theme...");
        ctx.theme_cloned = true;
        ctx.toolchain.clone_repo(&ctx.settings.theme_repo, &theme_dir)?;
        guard::remove_path(theme_dir.join(".git"))
    }

    fn compensate(&self, ctx: &mut CreateContext<'a>) -> Result<()> {
        if ctx.theme_cloned {
            guard::remove_path(ctx.layout.theme_dir())?;
            ctx.theme_cloned = false;
        }
        Ok(())
    }
}

impl<'a> Step<CreateContext<'a>> for InstallDeps {
    fn name(&self) -> &'static str {
        CreateStage::InstallingDeps.as_str()
    }

    fn run(&self, ctx: &mut CreateContext<'a>) -> Result<()> {
        info!("Installing composer dependencies...");
        ctx.toolchain.install_dependencies(&ctx.layout.htdocs)
    }
}

impl<'a> Step<CreateContext<'a>> for WriteConfigs {
    fn name(&self) -> &'static str {
        CreateStage::WritingConfigs.as_str()
    }

    fn run(&self, ctx: &mut CreateContext<'a>) -> Result<()> {
        info!("Creating wp-config.php...");
        let content = ctx.templates.render(templates::WP_CONFIG, &ctx.answers.template_context())?;
        let path = ctx.layout.htdocs.join("wp-config.php");
        if guard::write_if_absent("wp-config.php", &path, &content)? == WriteOutcome::Written {
            ctx.written_files.push(path);
        }

        ctx.backend.write_configs(&ctx.answers, ctx.templates, &mut ctx.written_files)
    }

    fn compensate(&self, ctx: &mut CreateContext<'a>) -> Result<()> {
        while let Some(file) = ctx.written_files.pop() {
            guard::remove_path(&file)?;
        }
        Ok(())
    }
}

impl<'a> Step<CreateContext<'a>> for RegisterSite {
    fn name(&self) -> &'static str {
        CreateStage::RegisteringSite.as_str()
    }

    fn run(&self, ctx: &mut CreateContext<'a>) -> Result<()> {
        ctx.registered = ctx.backend.register(&ctx.answers)?;

        info!("Creating Catalyst config file...");
        let config = ProjectConfig::from(&ctx.answers).to_json()?;
        ctx.marker_written =
            guard::write_if_absent("project configuration", ctx.layout.marker_path(), &config)?
                == WriteOutcome::Written;
        Ok(())
    }

    fn compensate(&self, ctx: &mut CreateContext<'a>) -> Result<()> {
        if ctx.marker_written {
            guard::remove_path(ctx.layout.marker_path())?;
            ctx.marker_written = false;
        }
        if ctx.registered {
            ctx.backend.unregister(&ctx.answers.project_name)?;
            ctx.registered = false;
        }
        Ok(())
    }
}

/// Builds the ordered create pipeline.
pub fn create_pipeline<'a>() -> Pipeline<'a, CreateContext<'a>> {
    Pipeline::new()
        .step(ScaffoldDirs)
        .step(CloneBoilerplate)
        .step(CloneTheme)
        .step(InstallDeps)
        .step(WriteConfigs)
        .step(RegisterSite)
}

/// Project lifecycle orchestrator.
pub struct Project<'a> {
    settings: &'a Settings,
    prompt: &'a dyn Prompter,
    toolchain: &'a dyn Toolchain,
    backend: &'a dyn ProjectBackend,
    templates: &'a TemplateStore,
}

impl<'a> Project<'a> {
    pub fn new(
        settings: &'a Settings,
        prompt: &'a dyn Prompter,
        toolchain: &'a dyn Toolchain,
        backend: &'a dyn ProjectBackend,
        templates: &'a TemplateStore,
    ) -> Self {
        Self { settings, prompt, toolchain, backend, templates }
    }

    /// Creates a new project.
    ///
    /// # Arguments
    /// * `project_name` - Lowercase site name, also used as the local host
    ///
    /// # Returns
    /// * `Result<ProjectLayout>` - Where the project was created
    ///
    /// # Errors
    /// * Validation errors and `Error::DirectoryNotEmpty` before any change
    /// * Any step error after the started steps have been rolled back
    pub fn create(&self, project_name: &str) -> Result<ProjectLayout> {
        debug!("Stage: {}", CreateStage::Validating);
        validate_project_name(project_name)?;
        let layout = self.backend.layout(project_name);
        guard::ensure_empty_dir(&layout.htdocs)?;

        info!("Creating new local install: {}", project_name);
        debug!("Stage: {}", CreateStage::Prompting);
        let answers =
            ask_project_answers(self.prompt, project_name, &self.settings.boilerplate_repo)?;

        let mut ctx = CreateContext {
            answers,
            layout,
            settings: self.settings,
            toolchain: self.toolchain,
            backend: self.backend,
            templates: self.templates,
            created_dirs: Vec::new(),
            written_files: Vec::new(),
            theme_cloned: false,
            registered: false,
            marker_written: false,
        };

        match create_pipeline().run(&mut ctx) {
            Ok(()) => {
                debug!("Stage: {}", CreateStage::Done);
                Ok(ctx.layout)
            }
            Err(failure) => {
                debug!("Stage: {}", CreateStage::RollingBack);
                if !failure.uncompensated.is_empty() {
                    warn!(
                        "Rollback incomplete, check these stages by hand: {}",
                        failure.uncompensated.join(", ")
                    );
                }
                error!("Aborting at stage '{}'.", failure.step);
                debug!("Stage: {}", CreateStage::Aborted);
                Err(failure.error)
            }
        }
    }

    /// Deletes a project after confirmation.
    ///
    /// # Returns
    /// * `Result<bool>` - `false` when the user declined
    pub fn delete(&self, project_name: &str) -> Result<bool> {
        validate_project_name(project_name)?;
        info!("Deleting install: {}", project_name);

        let confirmed = self
            .prompt
            .confirm(&format!("Are you sure you want to delete '{}'?", project_name), true)?;
        if !confirmed {
            println!("Don't worry, nothing was deleted.");
            return Ok(false);
        }

        self.backend.delete(project_name)?;
        Ok(true)
    }

    /// Adds `host` to the registered hosts of `project_name`.
    pub fn add_domain(&self, project_name: &str, host: &str) -> Result<()> {
        validate_project_name(project_name)?;
        if !is_valid_hostname(host) {
            return Err(Error::InvalidHostname { host: host.to_string() });
        }
        self.backend.add_domain(project_name, host)
    }
}
