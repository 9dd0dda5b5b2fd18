//! XML sitemaps and `robots.txt`.
//!
//! `/sitemap.xml` is an index of `/sitemap/{i}.xml` chunks, each holding up to
//! 10,000 village URLs. Chunk 0 also lists the home page and every province,
//! regency and district. The same builders back the offline
//! `generate-sitemap` command.

pub mod handlers;
pub mod routes;
pub mod services;

pub use services::SitemapService;
