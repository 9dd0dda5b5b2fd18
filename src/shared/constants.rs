/// Maximum rows per kind (villages, districts) on the search page
pub const SEARCH_LIMIT: i64 = 50;

/// Other villages in the same district listed on a village page
pub const SIBLING_VILLAGE_LIMIT: usize = 24;

/// Villages sharing a postal code listed on a village page
pub const SHARED_KODEPOS_LIMIT: i64 = 24;

/// Sibling regencies/districts shown on regency and district pages
pub const SIBLING_DISPLAY_LIMIT: usize = 12;

// =============================================================================
// SITEMAP
// =============================================================================

/// Village URLs per sitemap document
pub const SITEMAP_PAGE_SIZE: i64 = 10_000;

/// `Cache-Control` max-age for sitemap chunks, in seconds
pub const SITEMAP_MAX_AGE_SECS: u32 = 86_400;

/// `Cache-Control` max-age for the sitemap index, in seconds
pub const SITEMAP_INDEX_MAX_AGE_SECS: u32 = 3_600;
