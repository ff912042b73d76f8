//! Catalyst WP's main application entry point.
//! Parses the command line, resolves settings and the enclosing project,
//! then dispatches to the project orchestrator or the class generator.

use catalyst_wp::{
    cli::{get_args, Action, Args},
    config::{find_project_root, Settings},
    error::{default_error_handler, Error, Result},
    generator::Generator,
    guard::WriteOutcome,
    logger::init_logger,
    project::Project,
    prompt::DialoguerPrompter,
    renderer::{MiniJinjaRenderer, TemplateStore},
    toolchain::SystemToolchain,
    vvv::VvvBackend,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

fn print_banner() {
    println!("  *------------------*  ");
    println!("  ~~~ Catalyst WP ~~~   ");
    println!("  *------------------*  ");
}

/// Main application logic execution.
///
/// # Flow
/// 1. Resolves settings from the environment
/// 2. Runs the requested action; only the in-project actions look up the
///    enclosing project root
fn run(args: Args) -> Result<()> {
    print_banner();

    let action = args.action().ok_or(Error::ConfigError("no command specified".to_string()))?;
    let settings = Settings::from_env()?;

    let templates = TemplateStore::new(&settings.templates_dir, Box::new(MiniJinjaRenderer::new()));
    let prompt = DialoguerPrompter::new();
    let toolchain = SystemToolchain::new(settings.install_command.clone());
    let backend = VvvBackend::new(&settings.vagrant_dir);
    let project = Project::new(&settings, &prompt, &toolchain, &backend, &templates);

    match action {
        Action::Create(name) => {
            let layout = project.create(&name)?;
            println!("Project '{}' created in {}.", name, layout.project_dir.display());
        }
        Action::Delete(name) => {
            if project.delete(&name)? {
                println!("Project '{}' deleted.", name);
            }
        }
        Action::AddDomain { host, project_name } => {
            let name = match project_name {
                Some(name) => name,
                None => find_project_root(std::env::current_dir()?)?
                    .map(|root| root.config.project_name)
                    .filter(|name| !name.is_empty())
                    .ok_or(Error::MissingProjectName)?,
            };
            project.add_domain(&name, &host)?;
        }
        Action::Generate(class_name) => {
            let root = find_project_root(std::env::current_dir()?)?.ok_or(Error::NotInProject)?;
            let generator = Generator::new(&templates, root.theme_dir());
            for file in generator.generate(&class_name)? {
                if file.outcome == WriteOutcome::Written {
                    println!("Created: '{}'", file.path.display());
                }
            }
        }
    }
    Ok(())
}
