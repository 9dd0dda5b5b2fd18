mod location_service;

pub use location_service::{
    DistrictDetail, KodeposDetail, LocationService, Lookup, ProvinceDetail, RegencyDetail,
    SearchResults, VillageDetail,
};
