pub mod kodepos;
pub mod sitemap;
