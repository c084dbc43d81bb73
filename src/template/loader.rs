//! Template loader module.
//!
//! Pages are read from `<base_path>/<name>.html`. When a file is absent the
//! copy compiled into the binary is used, so the server renders pages even
//! without a template directory.

use std::fs;
use std::path::{Path, PathBuf};

use super::{Result, TemplateContext, TemplateEngine, TemplateError, Value};

/// Name of the template every page is wrapped in.
pub const LAYOUT: &str = "layout";

/// Templates shipped with the binary.
const BUILTIN: &[(&str, &str)] = &[
    ("layout", include_str!("../../templates/layout.html")),
    ("dashboard", include_str!("../../templates/dashboard.html")),
    ("folder", include_str!("../../templates/folder.html")),
    ("upload", include_str!("../../templates/upload.html")),
    ("shared_links", include_str!("../../templates/shared_links.html")),
    ("search", include_str!("../../templates/search.html")),
    ("error", include_str!("../../templates/error.html")),
];

fn builtin(name: &str) -> Option<&'static str> {
    BUILTIN
        .iter()
        .find(|(builtin_name, _)| *builtin_name == name)
        .map(|(_, content)| *content)
}

/// Template loader with a built-in fallback.
#[derive(Debug, Clone)]
pub struct TemplateLoader {
    base_path: PathBuf,
}

impl TemplateLoader {
    /// Create a new template loader.
    ///
    /// # Arguments
    ///
    /// * `base_path` - Directory containing `*.html` templates.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn template_path(&self, name: &str) -> PathBuf {
        self.base_path.join(format!("{name}.html"))
    }

    /// Load the source of a template.
    ///
    /// A file in the template directory takes precedence over the built-in
    /// copy of the same name.
    pub fn load(&self, name: &str) -> Result<String> {
        let path = self.template_path(name);

        if path.exists() {
            return fs::read_to_string(&path).map_err(|e| {
                TemplateError::Render(format!("Failed to read template '{name}': {e}"))
            });
        }

        builtin(name)
            .map(str::to_string)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))
    }

    /// Render a template without the layout.
    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        let content = self.load(name)?;
        TemplateEngine::render_string(&content, context)
    }

    /// Render a page and wrap it in the layout.
    ///
    /// The layout sees every page variable plus `title` and the rendered
    /// page as `content`.
    pub fn render_page(&self, name: &str, title: &str, context: &TemplateContext) -> Result<String> {
        let body = self.render(name, context)?;

        let mut layout_context = context.child();
        layout_context.set("title", title);
        layout_context.set("content", Value::String(body));
        self.render(LAYOUT, &layout_context)
    }

    /// Check if a template exists on disk or built in.
    pub fn has_template(&self, name: &str) -> bool {
        self.template_path(name).exists() || builtin(name).is_some()
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}
