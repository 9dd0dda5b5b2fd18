use serde::Serialize;

/// Site-wide settings shared by every page
#[derive(Debug, Clone)]
pub struct SiteInfo {
    /// Public origin, without trailing slash
    pub base_url: String,
}

impl SiteInfo {
    pub const NAME: &'static str = "Kode Pos Indonesia";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Absolute URL for a site path (`"/provinsi"` → `"https://…/provinsi"`)
    pub fn absolute(&self, path: &str) -> String {
        if path == "/" {
            self.base_url.clone()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }
}

/// Head metadata of a rendered page
#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    /// Absolute canonical URL
    pub canonical: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

/// One step of the breadcrumb trail
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Breadcrumb {
    pub label: String,
    pub href: String,
}

impl Breadcrumb {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

/// Everything a page template receives: head metadata, breadcrumbs,
/// structured data and the page-specific payload under `data`.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub site_name: &'static str,
    pub meta: PageMeta,
    pub breadcrumbs: Vec<Breadcrumb>,
    /// Pre-serialized JSON-LD blocks, safe to embed in `<script>`
    pub json_ld: Vec<String>,
    pub data: T,
}

impl<T> Page<T> {
    pub fn new(meta: PageMeta, breadcrumbs: Vec<Breadcrumb>, data: T) -> Self {
        Self {
            site_name: SiteInfo::NAME,
            meta,
            breadcrumbs,
            json_ld: Vec::new(),
            data,
        }
    }

    pub fn with_json_ld(mut self, value: &serde_json::Value) -> Self {
        self.json_ld.push(embed_json_ld(value));
        self
    }
}

/// Serialize a JSON-LD value for inline `<script type="application/ld+json">`.
///
/// `<`, `>` and `&` are written as unicode escapes so names can never close
/// the script element.
pub fn embed_json_ld(value: &serde_json::Value) -> String {
    value
        .to_string()
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}
