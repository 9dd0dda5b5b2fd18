//! Slug codec for administrative names.
//!
//! Every URL segment on the site is produced by [`to_slug`], and every inbound
//! segment is matched against stored names with the same function, so a link
//! the site emits always resolves back to the row it was built from (unless
//! two names at the same level collapse to the same slug, see
//! [`resolve_segment`]).
//!
//! The previous site matched inbound segments with a different normalization
//! (no diacritic stripping, no hyphen collapsing). [`legacy_slug`] reproduces
//! that form so URLs that used to resolve keep resolving; callers redirect
//! them to the canonical path.

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Normalize an administrative name into its canonical URL segment.
///
/// Lowercases, strips diacritics (NFKD, combining marks dropped), removes
/// everything except `[a-z0-9]`, whitespace and `-`, then turns every run of
/// whitespace/hyphens into a single `-`. Separators at either end are dropped.
///
/// The result matches `[a-z0-9]+(-[a-z0-9]+)*`, or is empty when the input
/// has nothing retainable. Total over all inputs.
///
/// ```ignore
/// assert_eq!(to_slug("Yogyakarta (DIY)"), "yogyakarta-diy");
/// ```
pub fn to_slug(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_separator = false;

    for c in lowered.nfkd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_separator = true;
        }
    }

    slug
}

/// The normalization the previous site applied to stored names at query time:
/// lowercase, drop everything outside `[a-z0-9 ]`, then each space becomes `-`.
///
/// Diacritics are dropped rather than stripped to their base letter, and
/// hyphens or repeated spaces are not collapsed.
pub fn legacy_slug(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}

/// How a stored name matched an inbound segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugMatch {
    /// The segment is (or canonicalizes to) `to_slug(name)`
    Canonical,
    /// The segment only equals the legacy form of the name
    Legacy,
}

/// Match a stored name against an inbound URL segment.
///
/// Empty segments never match, whatever the name normalizes to.
pub fn match_segment(name: &str, segment: &str) -> Option<SlugMatch> {
    let wanted = to_slug(segment);
    if !wanted.is_empty() && to_slug(name) == wanted {
        return Some(SlugMatch::Canonical);
    }

    let legacy_segment = segment.to_lowercase();
    if !legacy_segment.is_empty() && legacy_slug(name) == legacy_segment {
        return Some(SlugMatch::Legacy);
    }

    None
}

/// A candidate name chosen for an inbound segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub name: &'a str,
    pub matched: SlugMatch,
}

impl Resolved<'_> {
    /// Whether the inbound segment should be redirected to the canonical slug
    pub fn needs_redirect(&self, segment: &str) -> bool {
        self.matched == SlugMatch::Legacy || segment != to_slug(self.name)
    }
}

/// Pick the stored name an inbound segment refers to.
///
/// `candidates` must be in the store's stable order. The first canonical
/// match wins; failing that, the first legacy match. Later names that
/// collapse to the same slug are unreachable by direct URL.
pub fn resolve_segment<'a, I>(candidates: I, segment: &str) -> Option<Resolved<'a>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut legacy = None;
    for name in candidates {
        match match_segment(name, segment) {
            Some(SlugMatch::Canonical) => {
                return Some(Resolved {
                    name,
                    matched: SlugMatch::Canonical,
                })
            }
            Some(SlugMatch::Legacy) if legacy.is_none() => {
                legacy = Some(Resolved {
                    name,
                    matched: SlugMatch::Legacy,
                });
            }
            _ => {}
        }
    }
    legacy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::validation::SLUG_REGEX;
    use fake::faker::address::en::{CityName, StreetName};
    use fake::faker::lorem::en::Words;
    use fake::Fake;

    #[test]
    fn test_to_slug_examples() {
        assert_eq!(to_slug("Jakarta Selatan"), "jakarta-selatan");
        assert_eq!(to_slug("  Kota   Depok  "), "kota-depok");
        assert_eq!(to_slug("Yogyakarta (DIY)"), "yogyakarta-diy");
        assert_eq!(to_slug("DI Yogyakarta"), "di-yogyakarta");
        assert_eq!(to_slug("Kepulauan Bangka-Belitung"), "kepulauan-bangka-belitung");
    }

    #[test]
    fn test_to_slug_strips_diacritics() {
        assert_eq!(to_slug("Bénoa"), "benoa");
        assert_eq!(to_slug("ÀÉÎÕÜ"), "aeiou");
        assert_eq!(to_slug("Kampung Ñamè"), "kampung-name");
    }

    #[test]
    fn test_to_slug_drops_punctuation_without_separating() {
        assert_eq!(to_slug("Kab. Bandung"), "kab-bandung");
        assert_eq!(to_slug("O'ok"), "ook");
        assert_eq!(to_slug("Tanjung Priok/Koja"), "tanjung-priokkoja");
    }

    #[test]
    fn test_to_slug_collapses_separator_runs() {
        assert_eq!(to_slug("a - b"), "a-b");
        assert_eq!(to_slug("a--b"), "a-b");
        assert_eq!(to_slug("a\t\n b"), "a-b");
        assert_eq!(to_slug("- Foo -"), "foo");
        assert_eq!(to_slug("(Foo) (Bar)"), "foo-bar");
    }

    #[test]
    fn test_to_slug_empty_results() {
        assert_eq!(to_slug(""), "");
        assert_eq!(to_slug("   "), "");
        assert_eq!(to_slug("()-.,"), "");
        assert_eq!(to_slug("\u{0301}\u{0300}"), "");
    }

    #[test]
    fn test_to_slug_keeps_digits() {
        assert_eq!(to_slug("Koto XI Tarusan"), "koto-xi-tarusan");
        assert_eq!(to_slug("Desa 2 Ilir"), "desa-2-ilir");
    }

    #[test]
    fn test_to_slug_properties_on_generated_names() {
        for _ in 0..200 {
            let words: Vec<String> = Words(1..5).fake();
            let city: String = CityName().fake();
            let street: String = StreetName().fake();
            let input = format!("  {} ({})  -- {}.", words.join("   "), city, street);

            let slug = to_slug(&input);
            assert!(
                slug.is_empty() || SLUG_REGEX.is_match(&slug),
                "{:?} -> {:?}",
                input,
                slug
            );
            assert!(!slug.chars().any(|c| c.is_uppercase() || c.is_whitespace()));
            assert!(!slug.starts_with('-') && !slug.ends_with('-'));
            assert_eq!(to_slug(&slug), slug, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_legacy_slug_matches_old_query_normalization() {
        assert_eq!(legacy_slug("Jakarta Selatan"), "jakarta-selatan");
        // Diacritics are removed, not folded
        assert_eq!(legacy_slug("Bénoa"), "bnoa");
        // Repeated spaces are not collapsed
        assert_eq!(legacy_slug("Kota  Depok"), "kota--depok");
        // Hyphens are dropped entirely
        assert_eq!(legacy_slug("Bangka-Belitung"), "bangkabelitung");
    }

    #[test]
    fn test_match_segment() {
        assert_eq!(
            match_segment("Jakarta Selatan", "jakarta-selatan"),
            Some(SlugMatch::Canonical)
        );
        // Inbound segments are canonicalized before comparing
        assert_eq!(
            match_segment("Jakarta Selatan", "Jakarta-Selatan"),
            Some(SlugMatch::Canonical)
        );
        assert_eq!(
            match_segment("Bangka-Belitung", "bangkabelitung"),
            Some(SlugMatch::Legacy)
        );
        assert_eq!(match_segment("Jakarta Selatan", "jakarta-utara"), None);
    }

    #[test]
    fn test_empty_segment_never_matches() {
        assert_eq!(match_segment("()", ""), None);
        assert_eq!(match_segment("", ""), None);
        assert_eq!(match_segment("...", "-"), None);
        assert_eq!(resolve_segment(["()", "Aceh"], ""), None);
    }

    #[test]
    fn test_resolve_segment_prefers_first_canonical() {
        let names = ["Sukamaju", "Suka-Maju", "Suka Maju"];
        let resolved = resolve_segment(names, "suka-maju").unwrap();
        assert_eq!(resolved.name, "Suka-Maju");
        assert_eq!(resolved.matched, SlugMatch::Canonical);
        assert!(!resolved.needs_redirect("suka-maju"));
    }

    #[test]
    fn test_resolve_segment_falls_back_to_legacy() {
        let names = ["Bangka-Belitung", "Bengkulu"];
        let resolved = resolve_segment(names, "bangkabelitung").unwrap();
        assert_eq!(resolved.name, "Bangka-Belitung");
        assert_eq!(resolved.matched, SlugMatch::Legacy);
        assert!(resolved.needs_redirect("bangkabelitung"));
    }

    #[test]
    fn test_resolve_segment_flags_non_canonical_spelling() {
        let resolved = resolve_segment(["Kota Depok"], "KOTA-DEPOK").unwrap();
        assert_eq!(resolved.matched, SlugMatch::Canonical);
        assert!(resolved.needs_redirect("KOTA-DEPOK"));
    }

    #[test]
    fn test_self_lookup_through_own_slug() {
        let names = ["Aceh", "DI Yogyakarta", "Nusa Tenggara Barat (NTB)", "Papua Barat Daya"];
        for name in names {
            let resolved = resolve_segment(names, &to_slug(name)).unwrap();
            assert_eq!(resolved.name, name);
        }
    }
}
