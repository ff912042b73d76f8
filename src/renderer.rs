//! Template rendering for generated project files.
//! Templates live on disk under the templates directory and use
//! `{{ placeholder }}` syntax rendered through MiniJinja.
use crate::error::{Error, Result};
use minijinja::{Environment, UndefinedBehavior};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{-?\s*([^{}]*?)\s*-?\}\}").expect("placeholder pattern is valid")
});

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String>;
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a renderer for file output: undefined variables are errors,
    /// block tags do not leave blank lines, trailing newlines are kept.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    /// Renders a template string using MiniJinja.
    ///
    /// # Errors
    /// * `Error::MinijinjaError` if the template does not parse or refers
    ///   to a variable missing from `context`
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String> {
        self.env.render_str(template, context).map_err(Error::MinijinjaError)
    }
}

/// Reads named templates from a directory and renders them.
pub struct TemplateStore {
    root: PathBuf,
    renderer: Box<dyn TemplateRenderer>,
}

impl TemplateStore {
    pub fn new<P: AsRef<Path>>(root: P, renderer: Box<dyn TemplateRenderer>) -> Self {
        Self { root: root.as_ref().to_path_buf(), renderer }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads the raw source of a template.
    ///
    /// # Errors
    /// * `Error::TemplateReadError` if the file is missing or unreadable
    pub fn source(&self, name: &str) -> Result<String> {
        let path = self.root.join(name);
        fs::read_to_string(&path).map_err(|source| Error::TemplateReadError { path, source })
    }

    /// Renders the template `name` with `context`.
    ///
    /// # Arguments
    /// * `name` - File name relative to the templates directory
    /// * `context` - JSON context for variable interpolation
    ///
    /// # Returns
    /// * `Result<String>` - Rendered file content
    pub fn render(&self, name: &str, context: &serde_json::Value) -> Result<String> {
        let source = self.source(name)?;
        log::debug!("Rendering template '{}'", name);
        self.renderer.render(&source, context)
    }
}

/// Returns every `{{ … }}` expression left in rendered text.
///
/// An empty result means the render resolved all of its placeholders.
pub fn unresolved_placeholders(text: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_placeholders() {
        assert!(unresolved_placeholders("server_name site.test;").is_empty());
        assert!(unresolved_placeholders("root {vvv_path_to_site};").is_empty());
        assert_eq!(
            unresolved_placeholders("a {{ project_name }} b {{-ssl-}}"),
            vec!["project_name".to_string(), "ssl".to_string()]
        );
    }

    #[test]
    fn test_strict_undefined() {
        let renderer = MiniJinjaRenderer::new();
        let result = renderer.render("{{ missing }}", &serde_json::json!({}));
        assert!(matches!(result, Err(Error::MinijinjaError(_))));
    }
}
