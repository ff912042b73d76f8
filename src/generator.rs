//! MVC class skeleton generation.
//! A requested class name is mapped to one class kind (when it ends in
//! `View`, `Controller` or `Model`) or to all three, and each skeleton is
//! rendered into the child theme unless the file already exists.

use crate::constants::{templates, BASE_NAMESPACE, THEME_NAMESPACE};
use crate::error::{Error, Result};
use crate::guard::{self, WriteOutcome};
use crate::renderer::TemplateStore;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static CLASS_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("class name pattern is valid"));

/// Directory names that may not appear in a requested class name.
const RESERVED: [&str; 3] = ["models", "views", "controllers"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Model,
    View,
    Controller,
}

impl ClassKind {
    /// Kinds in the order a full resource is generated.
    pub const ALL: [ClassKind; 3] = [ClassKind::Model, ClassKind::View, ClassKind::Controller];

    /// Suffix recognised on requested names, also the PHP type name.
    pub fn suffix(&self) -> &'static str {
        match self {
            ClassKind::Model => "Model",
            ClassKind::View => "View",
            ClassKind::Controller => "Controller",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClassKind::Model => "model",
            ClassKind::View => "view",
            ClassKind::Controller => "controller",
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            ClassKind::Model => templates::MODEL,
            ClassKind::View => templates::VIEW,
            ClassKind::Controller => templates::CONTROLLER,
        }
    }

    /// Subdirectory of the theme holding this kind, e.g. `models`
    pub fn dir(&self) -> String {
        format!("{}s", self.name())
    }

    /// Models are `<Name>.php`; views and controllers carry their suffix.
    pub fn file_name(&self, class_name: &str) -> String {
        match self {
            ClassKind::Model => format!("{}.php", class_name),
            _ => format!("{}{}.php", class_name, self.suffix()),
        }
    }

    /// Namespace of generated classes, e.g. `CatalystWP\AtomChild\Views`
    pub fn namespace(&self) -> String {
        format!("{}\\{}\\{}s", BASE_NAMESPACE, THEME_NAMESPACE, self.suffix())
    }
}

/// One skeleton to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRequest {
    pub kind: ClassKind,
    /// Base name with its first letter upper-cased
    pub class_name: String,
}

/// Upper-cases the first character of `name`.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn invalid(name: &str, reason: &str) -> Error {
    Error::InvalidClassName { name: name.to_string(), reason: reason.to_string() }
}

/// Works out which skeletons a requested name stands for.
///
/// # Arguments
/// * `requested` - Name given on the command line, e.g. `CarModel` or `Car`
///
/// # Returns
/// * `Result<Vec<ClassRequest>>` - One request for a suffixed name,
///   model/view/controller otherwise
///
/// # Errors
/// * `Error::InvalidClassName` for non-identifiers, reserved directory
///   names, or a bare suffix
pub fn parse_class_request(requested: &str) -> Result<Vec<ClassRequest>> {
    if !CLASS_NAME.is_match(requested) {
        return Err(invalid(requested, "use letters, digits and underscores"));
    }
    if RESERVED.iter().any(|reserved| requested.contains(reserved)) {
        return Err(invalid(requested, "name must not contain models, views or controllers"));
    }

    for kind in [ClassKind::View, ClassKind::Controller, ClassKind::Model] {
        if let Some(base) = requested.strip_suffix(kind.suffix()) {
            if base.is_empty() {
                return Err(invalid(requested, "a base name is required before the suffix"));
            }
            return Ok(vec![ClassRequest { kind, class_name: capitalize(base) }]);
        }
    }

    let class_name = capitalize(requested);
    Ok(ClassKind::ALL
        .iter()
        .map(|&kind| ClassRequest { kind, class_name: class_name.clone() })
        .collect())
}

/// Result of generating one skeleton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub outcome: WriteOutcome,
}

/// Writes class skeletons into a theme directory.
pub struct Generator<'a> {
    templates: &'a TemplateStore,
    theme_dir: PathBuf,
}

impl<'a> Generator<'a> {
    pub fn new<P: AsRef<Path>>(templates: &'a TemplateStore, theme_dir: P) -> Self {
        Self { templates, theme_dir: theme_dir.as_ref().to_path_buf() }
    }

    /// Target path of a skeleton.
    pub fn target_path(&self, request: &ClassRequest) -> PathBuf {
        self.theme_dir.join(request.kind.dir()).join(request.kind.file_name(&request.class_name))
    }

    /// Generates the skeletons for `requested`.
    ///
    /// Existing files are skipped with a warning, never overwritten.
    pub fn generate(&self, requested: &str) -> Result<Vec<GeneratedFile>> {
        parse_class_request(requested)?
            .iter()
            .map(|request| self.generate_class(request))
            .collect()
    }

    fn generate_class(&self, request: &ClassRequest) -> Result<GeneratedFile> {
        let path = self.target_path(request);
        if path.exists() {
            log::warn!("Skipping: file already exists: {}", path.display());
            return Ok(GeneratedFile { path, outcome: WriteOutcome::Skipped });
        }

        let context = serde_json::json!({
            "namespaces": [BASE_NAMESPACE, THEME_NAMESPACE, request.kind.name(), request.class_name],
            "namespace": request.kind.namespace(),
            "class_name": request.class_name,
            "kind": request.kind.suffix(),
        });
        let content = self.templates.render(request.kind.template(), &context)?;

        info!("Writing {} {}", request.kind.name(), path.display());
        let outcome = guard::write_if_absent(request.kind.name(), &path, &content)?;
        Ok(GeneratedFile { path, outcome })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(ClassKind::Model.file_name("Car"), "Car.php");
        assert_eq!(ClassKind::View.file_name("Car"), "CarView.php");
        assert_eq!(ClassKind::Controller.file_name("Car"), "CarController.php");
        assert_eq!(ClassKind::Controller.dir(), "controllers");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("car"), "Car");
        assert_eq!(capitalize("carPart"), "CarPart");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_namespace() {
        assert_eq!(ClassKind::View.namespace(), "CatalystWP\\AtomChild\\Views");
    }
}
