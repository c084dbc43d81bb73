//! Template engine for the HTML pages.
//!
//! A small Handlebars-style engine.
//!
//! # Features
//!
//! - Variable expansion: `{{variable}}` (HTML-escaped)
//! - Raw expansion: `{{{variable}}}` (inserted as-is)
//! - Conditionals: `{{#if condition}}...{{else}}...{{/if}}`
//! - Loops: `{{#each items}}...{{/each}}`
//! - Escaping: `\{{` to output literal `{{`
//!
//! # Example
//!
//! ```
//! use dropbox_web::template::{TemplateContext, TemplateEngine, Value};
//!
//! let mut engine = TemplateEngine::new();
//! engine.load("greeting", "Hello, {{name}}!").unwrap();
//!
//! let mut context = TemplateContext::new();
//! context.set("name", Value::from("<World>"));
//!
//! let result = engine.render("greeting", &context).unwrap();
//! assert_eq!(result, "Hello, &lt;World&gt;!");
//! ```

mod loader;
mod parser;
mod renderer;

use std::collections::HashMap;

use thiserror::Error;

pub use loader::TemplateLoader;
pub use parser::{Node, Parser};
pub use renderer::Renderer;

/// Escape text for use inside HTML content and quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Template-related errors.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Template not found.
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Render error.
    #[error("Render error: {0}")]
    Render(String),
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// A value that can be used in templates.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string value.
    String(String),
    /// A numeric value.
    Number(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// A list of values.
    List(Vec<Value>),
    /// An object (key-value pairs).
    Object(HashMap<String, Value>),
    /// A null/empty value.
    Null,
}

impl Value {
    /// Convert the value to a string for display.
    ///
    /// Floats are shown with at most two decimals.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Bool(b) => b.to_string(),
            Value::List(_) => "[list]".to_string(),
            Value::Object(_) => "[object]".to_string(),
            Value::Null => "".to_string(),
        }
    }

    /// Check if the value is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::String(s) => !s.is_empty(),
            Value::Number(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Bool(b) => *b,
            Value::List(l) => !l.is_empty(),
            Value::Object(o) => !o.is_empty(),
            Value::Null => false,
        }
    }

    /// Get a nested value by dot-separated path.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut current = self;

        for part in path.split('.') {
            match current {
                Value::Object(map) => {
                    current = map.get(part)?;
                }
                Value::List(list) => {
                    let index: usize = part.parse().ok()?;
                    current = list.get(index)?;
                }
                _ => return None,
            }
        }

        Some(current)
    }

    /// Create an object Value from key-value pairs.
    pub fn object<K, I>(items: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(items.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

fn format_float(f: f64) -> String {
    let s = format!("{f:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

/// Context for template rendering.
///
/// A child context borrows its parent and holds only its own variables.
/// Lookups try the local scope first, then the parent chain.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext<'p> {
    variables: HashMap<String, Value>,
    parent: Option<&'p TemplateContext<'p>>,
}

impl<'p> TemplateContext<'p> {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable in the context.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Get a variable from the context.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.get_local(name)
            .or_else(|| self.parent.and_then(|parent| parent.get(name)))
    }

    fn get_local(&self, name: &str) -> Option<&Value> {
        if let Some(value) = self.variables.get(name) {
            return Some(value);
        }

        let (root, rest) = name.split_once('.')?;
        self.variables.get(root)?.get_path(rest)
    }

    /// Create an empty child scope over this context.
    pub fn child(&self) -> TemplateContext<'_> {
        TemplateContext {
            variables: HashMap::new(),
            parent: Some(self),
        }
    }
}

/// Template engine holding parsed templates by name.
#[derive(Debug, Default)]
pub struct TemplateEngine {
    templates: HashMap<String, Vec<Node>>,
}

impl TemplateEngine {
    /// Create a new template engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a template from a string.
    pub fn load(&mut self, name: impl Into<String>, content: &str) -> Result<()> {
        let nodes = Parser::new(content).parse()?;
        self.templates.insert(name.into(), nodes);
        Ok(())
    }

    /// Render a loaded template.
    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        let nodes = self
            .templates
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;

        Renderer::new(context).render(nodes)
    }

    /// Render a template string directly without loading.
    pub fn render_string(content: &str, context: &TemplateContext) -> Result<String> {
        let nodes = Parser::new(content).parse()?;
        Renderer::new(context).render(&nodes)
    }

    /// Check if a template is loaded.
    pub fn has_template(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }
}
