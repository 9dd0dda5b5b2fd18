use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Canonical URL segment produced by the slug codec
    /// - Valid: "jakarta-selatan", "koto-xi-tarusan", "aceh"
    /// - Invalid: "-aceh", "aceh-", "kota--depok", "Aceh", "kota_depok"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();

    /// Indonesian postal code: exactly five ASCII digits
    pub static ref KODEPOS_REGEX: Regex = Regex::new(r"^[0-9]{5}$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_regex_valid() {
        assert!(SLUG_REGEX.is_match("jakarta-selatan"));
        assert!(SLUG_REGEX.is_match("aceh"));
        assert!(SLUG_REGEX.is_match("desa-2-ilir"));
    }

    #[test]
    fn test_slug_regex_invalid() {
        assert!(!SLUG_REGEX.is_match("-aceh"));
        assert!(!SLUG_REGEX.is_match("aceh-"));
        assert!(!SLUG_REGEX.is_match("kota--depok"));
        assert!(!SLUG_REGEX.is_match("Aceh"));
        assert!(!SLUG_REGEX.is_match(""));
        assert!(!SLUG_REGEX.is_match("kota depok"));
    }

    #[test]
    fn test_kodepos_regex() {
        assert!(KODEPOS_REGEX.is_match("23895"));
        assert!(KODEPOS_REGEX.is_match("10110"));
        assert!(!KODEPOS_REGEX.is_match("2389"));
        assert!(!KODEPOS_REGEX.is_match("238950"));
        assert!(!KODEPOS_REGEX.is_match("2389a"));
        assert!(!KODEPOS_REGEX.is_match("２３８９５")); // full-width digits
    }
}
