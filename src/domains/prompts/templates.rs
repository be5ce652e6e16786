//! Prompt templates module.
//!
//! Templates use a small handlebars-like syntax:
//! - `{{variable}}` is replaced with the argument value, or nothing
//! - `{{#if variable}}content{{/if}}` keeps content only when the argument is non-empty
//! - `{{#if variable}}content{{else}}fallback{{/if}}` picks one of two branches
//!
//! Blocks do not nest.

use rmcp::model::PromptArgument;
use std::collections::HashMap;

use super::error::PromptError;

const IF_OPEN: &str = "{{#if ";
const ELSE: &str = "{{else}}";
const END_IF: &str = "{{/if}}";

/// A prompt template that can be instantiated with arguments.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The unique name of the prompt.
    pub name: String,

    /// Human-readable title.
    pub title: Option<String>,

    /// A description of what the prompt does.
    pub description: Option<String>,

    /// The arguments that this prompt accepts.
    pub arguments: Vec<PromptArgument>,

    /// The template text.
    pub template: String,
}

fn is_set(arguments: &HashMap<String, String>, name: &str) -> bool {
    arguments.get(name).is_some_and(|v| !v.trim().is_empty())
}

impl PromptTemplate {
    /// Create a new prompt template.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        arguments: Vec<PromptArgument>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: None,
            description,
            arguments,
            template: template.into(),
        }
    }

    /// Names of required arguments that are missing or blank.
    pub fn missing_arguments(&self, arguments: &HashMap<String, String>) -> Vec<&str> {
        self.arguments
            .iter()
            .filter(|arg| arg.required.unwrap_or(false) && !is_set(arguments, &arg.name))
            .map(|arg| arg.name.as_str())
            .collect()
    }

    /// Render the template with the given arguments.
    pub fn render(&self, arguments: &HashMap<String, String>) -> Result<String, PromptError> {
        let resolved = Self::resolve_conditionals(&self.template, arguments)?;
        Ok(Self::substitute(&resolved, arguments))
    }

    fn resolve_conditionals(
        template: &str,
        arguments: &HashMap<String, String>,
    ) -> Result<String, PromptError> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find(IF_OPEN) {
            out.push_str(&rest[..start]);
            let after_open = &rest[start + IF_OPEN.len()..];

            let name_end = after_open
                .find("}}")
                .ok_or_else(|| PromptError::template("Unclosed {{#if}} tag"))?;
            let name = after_open[..name_end].trim();
            let body = &after_open[name_end + 2..];

            let end = body
                .find(END_IF)
                .ok_or_else(|| PromptError::template("Missing {{/if}} tag"))?;
            let block = &body[..end];

            let (when_set, otherwise) = block.split_once(ELSE).unwrap_or((block, ""));
            out.push_str(if is_set(arguments, name) {
                when_set
            } else {
                otherwise
            });

            rest = &body[end + END_IF.len()..];
        }

        out.push_str(rest);
        Ok(out)
    }

    /// Replace `{{name}}` placeholders in a single pass, so substituted
    /// values are never themselves expanded.
    fn substitute(template: &str, arguments: &HashMap<String, String>) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) => {
                    let key = after[..end].trim();
                    if let Some(value) = arguments.get(key) {
                        out.push_str(value);
                    }
                    rest = &after[end + 2..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }

        out.push_str(rest);
        out
    }
}
