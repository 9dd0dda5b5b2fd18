mod record;
mod refs;

pub use record::KodeposRecord;
pub use refs::{DistrictRef, RegencyRef, VillageEntry, VillageRef};
