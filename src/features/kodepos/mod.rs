//! Postal code lookup pages.
//!
//! Browses `tbl_kodepos` by administrative hierarchy and answers postal code
//! and name searches. Every URL segment is a slug of a stored name; segments
//! that only match in a non-canonical or legacy form are permanently
//! redirected to the canonical path.
//!
//! ## Hierarchy
//!
//! - Level 1: Provinsi (province)
//! - Level 2: Kabupaten/Kota (regency or city)
//! - Level 3: Kecamatan (district)
//! - Level 4: Kelurahan/Desa (village), one postal code each
//!
//! ## Pages
//!
//! | Path | Description |
//! |------|-------------|
//! | `/` | Home with search forms |
//! | `/provinsi` | List all provinces |
//! | `/provinsi/{p}` | Regencies of a province |
//! | `/provinsi/{p}/kabupaten/{k}` | Districts of a regency |
//! | `/provinsi/{p}/kabupaten/{k}/kecamatan/{kec}` | Villages and postal codes of a district |
//! | `/provinsi/{p}/kabupaten/{k}/kecamatan/{kec}/kelurahan/{kel}` | Village detail |
//! | `/kodepos/{code}` | Villages using a postal code |
//! | `/cari?q=` | Prefix search over village and district names |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod paths;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod views;

pub use handlers::KodeposState;
pub use repositories::{KodeposRepository, PgKodeposRepository};
pub use services::LocationService;
