mod kodepos_repository;
mod pg_kodepos_repository;

pub use kodepos_repository::KodeposRepository;
pub use pg_kodepos_repository::PgKodeposRepository;
