mod sitemap_service;

pub use sitemap_service::SitemapService;
