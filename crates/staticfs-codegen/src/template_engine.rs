//! Template engine for module generation using Handlebars.
//!
//! Provides a wrapper around Handlebars with the built-in templates for the
//! generated Rust module. Output is Rust source, so HTML escaping is turned
//! off and strings that become literals go through the `quote` helper.
//!
//! # Examples
//!
//! ```
//! use staticfs_codegen::template_engine::TemplateEngine;
//! use serde_json::json;
//!
//! let mut engine = TemplateEngine::new().unwrap();
//! engine.register_template_string("path", "let p = {{quote path}};").unwrap();
//! let line = engine.render("path", &json!({"path": "/a \"b\".txt"})).unwrap();
//! assert_eq!(line, r#"let p = "/a \"b\".txt";"#);
//! ```

use handlebars::Handlebars;
use helpers::quote;
use serde::Serialize;
use staticfs_core::{Error, Result};

/// Name of the template that renders a whole generated module.
pub const ARTIFACT_TEMPLATE: &str = "staticfs/artifact";

mod helpers {
    #![allow(missing_docs)]

    use handlebars::handlebars_helper;

    // renders a Rust string literal
    handlebars_helper!(quote: |value: str| format!("{value:?}"));
}

/// Handlebars registry holding the module templates.
///
/// One engine is built per generation run; nothing is shared between runs.
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl TemplateEngine<'_> {
    /// Builds an engine with the module template and its partials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if a built-in template fails to parse.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // missing context fields are errors
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.register_helper("quote", Box::new(quote));

        handlebars
            .register_partial(
                "constructors",
                include_str!("../templates/constructors.rs.hbs"),
            )
            .map_err(|e| Error::Template {
                message: format!("Failed to register constructors partial: {e}"),
            })?;

        handlebars
            .register_template_string(
                ARTIFACT_TEMPLATE,
                include_str!("../templates/artifact.rs.hbs"),
            )
            .map_err(|e| Error::Template {
                message: format!("Failed to register artifact template: {e}"),
            })?;

        Ok(Self { handlebars })
    }

    /// Renders `template_name` against `context`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if the template is unknown, the context
    /// does not serialize, or a variable it uses is missing.
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(template_name, context)
            .map_err(|e| Error::Template {
                message: format!("Template rendering failed: {e}"),
            })
    }

    /// Adds a template under `name`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if `template` does not parse.
    pub fn register_template_string(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| Error::Template {
                message: format!("Failed to register template '{name}': {e}"),
            })
    }

    /// Checks whether a template is registered.
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }
}
