pub mod constants;
pub mod slug;
pub mod templates;
pub mod test_helpers;
pub mod types;
pub mod validation;
