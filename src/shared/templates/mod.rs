//! Page and sitemap templates.

pub mod engine;

pub use engine::{escape_markup, TemplateError, TemplateRenderer};
