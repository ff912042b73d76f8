//! Command-line interface implementation for Catalyst WP.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, ArgGroup, CommandFactory, Parser};

/// Command-line arguments structure for Catalyst WP.
#[derive(Parser, Debug)]
#[command(author, version, about = "Catalyst WP: local WordPress project scaffolding", long_about = None)]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .args(["create", "delete", "domain_name", "generate"])
))]
pub struct Args {
    /// Create new project environment - specify project name
    #[arg(short = 'c', long, value_name = "PROJECT_NAME")]
    pub create: Option<String>,

    /// Delete project environment - specify project name
    #[arg(short = 'D', long, value_name = "PROJECT_NAME")]
    pub delete: Option<String>,

    /// Specifies project name
    #[arg(short = 'p', long = "project_name", value_name = "PROJECT_NAME", requires = "domain_name")]
    pub project_name: Option<String>,

    /// A host name to be added to the project. Must be run in a Catalyst WP
    /// project directory or with a project name
    #[arg(short = 'd', long = "domain_name", value_name = "DOMAIN_NAME")]
    pub domain_name: Option<String>,

    /// Scaffolds new MVC classes for a project. Include the class type in the
    /// name to generate a single class (e.g. CarModel) or just the generic
    /// name to generate all three
    #[arg(short = 'g', long, value_name = "RESOURCE_NAME")]
    pub generate: Option<String>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// The single primary action requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Create(String),
    Delete(String),
    AddDomain { host: String, project_name: Option<String> },
    Generate(String),
}

impl Args {
    /// Returns the requested action. The `action` group guarantees exactly
    /// one of the action flags is present.
    pub fn action(&self) -> Option<Action> {
        if let Some(name) = &self.create {
            Some(Action::Create(name.clone()))
        } else if let Some(name) = &self.delete {
            Some(Action::Delete(name.clone()))
        } else if let Some(host) = &self.domain_name {
            Some(Action::AddDomain { host: host.clone(), project_name: self.project_name.clone() })
        } else {
            self.generate.as_ref().map(|name| Action::Generate(name.clone()))
        }
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Returns
/// * `Args` - Parsed command line arguments
///
/// # Exits
/// * With status code 1 if no action was given
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                eprintln!("No command specified.\n");
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
