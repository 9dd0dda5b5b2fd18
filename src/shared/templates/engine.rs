//! Template engine for site pages and sitemap documents using Jinja2 syntax.
//!
//! Templates live under `templates/` at the crate root and are embedded into
//! the binary at compile time, so the server does not depend on its working
//! directory. Auto-escaping follows the template extension (`.html`, `.xml`).

use std::fmt::Write;

use minijinja::{
    escape_formatter, AutoEscape, Environment, Error as JinjaError, ErrorKind, Output, State, Value,
};
use serde::Serialize;
use thiserror::Error;

use crate::shared::slug::to_slug;

/// Embedded templates, keyed by their path relative to `templates/`
const TEMPLATES: &[(&str, &str)] = &[
    ("pages/base.html", include_str!("../../../templates/pages/base.html")),
    ("pages/home.html", include_str!("../../../templates/pages/home.html")),
    (
        "pages/provinsi_index.html",
        include_str!("../../../templates/pages/provinsi_index.html"),
    ),
    (
        "pages/provinsi.html",
        include_str!("../../../templates/pages/provinsi.html"),
    ),
    (
        "pages/kabupaten.html",
        include_str!("../../../templates/pages/kabupaten.html"),
    ),
    (
        "pages/kecamatan.html",
        include_str!("../../../templates/pages/kecamatan.html"),
    ),
    (
        "pages/kelurahan.html",
        include_str!("../../../templates/pages/kelurahan.html"),
    ),
    (
        "pages/kodepos.html",
        include_str!("../../../templates/pages/kodepos.html"),
    ),
    ("pages/cari.html", include_str!("../../../templates/pages/cari.html")),
    (
        "pages/not_found.html",
        include_str!("../../../templates/pages/not_found.html"),
    ),
    (
        "sitemap/urlset.xml",
        include_str!("../../../templates/sitemap/urlset.xml"),
    ),
    (
        "sitemap/index.xml",
        include_str!("../../../templates/sitemap/index.xml"),
    ),
];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

/// Escape text for HTML and XML output (`&`, `<`, `>`, `"`, `'`).
///
/// Slashes are left alone so URLs stay readable in `href` and `<loc>`.
pub fn escape_markup(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

fn markup_formatter(
    out: &mut Output<'_>,
    state: &State<'_, '_>,
    value: &Value,
) -> Result<(), JinjaError> {
    if matches!(state.auto_escape(), AutoEscape::Html) && !value.is_safe() {
        if let Some(text) = value.as_str() {
            return out
                .write_str(&escape_markup(text))
                .map_err(|_| JinjaError::new(ErrorKind::WriteFailure, "failed to write output"));
        }
    }
    escape_formatter(out, state, value)
}

/// Compiled template set, built once at startup and shared behind an `Arc`
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    pub fn new() -> Result<Self, TemplateError> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_formatter(markup_formatter);
        env.add_filter("slug", |name: String| to_slug(&name));

        for (name, source) in TEMPLATES {
            env.add_template(name, source)
                .map_err(|e| TemplateError::RenderError(format!("{}: {}", name, e)))?;
            tracing::debug!("Loaded template: {}", name);
        }

        Ok(Self { env })
    }

    /// Render a template with any serializable context
    pub fn render<S: Serialize>(
        &self,
        template_name: &str,
        ctx: S,
    ) -> Result<String, TemplateError> {
        let template = self
            .env
            .get_template(template_name)
            .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

        template
            .render(ctx)
            .map_err(|e| TemplateError::RenderError(e.to_string()))
    }

    /// List all available templates
    pub fn list_templates(&self) -> Vec<String> {
        self.env
            .templates()
            .map(|(name, _)| name.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_all_templates_compile() {
        let renderer = TemplateRenderer::new().unwrap();
        assert_eq!(renderer.list_templates().len(), TEMPLATES.len());
        assert!(renderer
            .list_templates()
            .contains(&"pages/kelurahan.html".to_string()));
    }

    #[test]
    fn test_missing_template() {
        let renderer = TemplateRenderer::new().unwrap();
        let result = renderer.render("definitely_not_a_real_template.html", context! {});
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
    }

    #[test]
    fn test_slug_filter_uses_codec() {
        let renderer = TemplateRenderer::new().unwrap();
        let out = renderer
            .env
            .render_str("{{ name|slug }}", context! { name => "Yogyakarta (DIY)" })
            .unwrap();
        assert_eq!(out, "yogyakarta-diy");
    }

    #[test]
    fn test_xml_templates_escape_text() {
        let renderer = TemplateRenderer::new().unwrap();
        let xml = renderer
            .render(
                "sitemap/index.xml",
                context! { sitemaps => vec![context! { loc => "https://x.test/?a=1&b=2", lastmod => "2025-11-26" }] },
            )
            .unwrap();
        assert!(xml.contains("https://x.test/?a=1&amp;b=2"));
    }

    #[test]
    fn test_escape_markup() {
        assert_eq!(escape_markup("/provinsi/aceh"), "/provinsi/aceh");
        assert_eq!(
            escape_markup(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }
}
