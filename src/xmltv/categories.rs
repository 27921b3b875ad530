//! Provider genre to XMLTV category mapping
//!
//! The provider tags episodes with its own genre/sub-genre vocabulary; guide
//! consumers want the XMLTV category vocabulary. The table is declared as
//! (canonical category, provider strings) entries and construction fails if
//! two categories claim the same provider string, so conflicts surface
//! instead of resolving silently by declaration order. A provider string
//! absent from the table passes through unchanged as its own category.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Entry list for the builtin table: each provider genre string has exactly
/// one canonical home.
const BUILTIN_ENTRIES: &[(&str, &[&str])] = &[
    ("Animated", &["Family Animation", "Cartoons"]),
    (
        "Educational",
        &["Education & Guidance", "Instructional & Educational"],
    ),
    (
        "News",
        &["News and Information", "General News", "News + Opinion"],
    ),
    ("History", &["History & Social Studies"]),
    ("Politics", &["Politics"]),
    (
        "Action",
        &[
            "Action & Adventure",
            "Action Classics",
            "Martial Arts",
            "Family Adventures",
            "Action Sci-Fi & Fantasy",
            "Action Thrillers",
            "African-American Action",
        ],
    ),
    ("Adventure", &["Adventures", "Sci-Fi Adventure"]),
    (
        "Reality",
        &[
            "Reality",
            "Reality Drama",
            "Courtroom Reality",
            "Occupational Reality",
            "Celebrity Reality",
        ],
    ),
    (
        "Documentary",
        &[
            "Documentaries",
            "Social & Cultural Documentaries",
            "Science and Nature Documentaries",
            "Miscellaneous Documentaries",
            "Crime Documentaries",
            "Travel & Adventure Documentaries",
            "Sports Documentaries",
            "Military Documentaries",
            "Political Documentaries",
            "Foreign Documentaries",
            "Religion & Mythology Documentaries",
            "Historical Documentaries",
            "Faith & Spirituality Documentaries",
        ],
    ),
    (
        "Biography",
        &["Biographical Documentaries", "Inspirational Biographies"],
    ),
    ("Science Fiction", &["Sci-Fi Thrillers"]),
    ("Thriller", &["Thrillers", "Crime Thrillers"]),
    ("Talk", &["Talk & Variety", "Talk Show"]),
    ("Variety", &["Sketch Comedies"]),
    (
        "Home Improvement",
        &["Art & Design", "DIY & How To", "Home Improvement"],
    ),
    ("House/garden", &["Home & Garden"]),
    ("Cooking", &["Cooking Instruction", "Food & Wine", "Food Stories"]),
    ("Travel", &["Travel"]),
    ("Western", &["Westerns", "Classic Westerns"]),
    ("LGBTQ", &["Gay & Lesbian", "Gay & Lesbian Dramas", "Gay"]),
    ("Game show", &["Game Show"]),
    ("Military", &["Classic War Stories"]),
    (
        "Comedy",
        &[
            "Cult Comedies",
            "Spoofs and Satire",
            "Slapstick",
            "Classic Comedies",
            "Stand-Up",
            "Sports Comedies",
            "African-American Comedies",
            "Showbiz Comedies",
            "Teen Comedies",
            "Latino Comedies",
            "Family Comedies",
        ],
    ),
    ("Crime", &["Crime Action"]),
    ("Sports", &["Sports", "Sports & Sports Highlights"]),
    ("Poker & Gambling", &["Poker & Gambling"]),
    ("Crime drama", &["Crime Drama"]),
    (
        "Drama",
        &[
            "Classic Dramas",
            "Family Drama",
            "Indie Drama",
            "Romantic Drama",
        ],
    ),
    (
        "Children",
        &[
            "Kids",
            "Children & Family",
            "Kids' TV",
            "Animals",
            "Ages 2-4",
            "Ages 11-12",
        ],
    ),
];

/// Reverse-lookup table from provider genre string to canonical category
#[derive(Debug)]
pub struct CategoryMap {
    by_provider: HashMap<&'static str, &'static str>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct CategoryConflict {
    pub provider: &'static str,
    pub first: &'static str,
    pub second: &'static str,
}

impl std::fmt::Display for CategoryConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "provider genre '{}' claimed by both '{}' and '{}'",
            self.provider, self.first, self.second
        )
    }
}

impl CategoryMap {
    /// Build a map from an entry list, rejecting provider strings claimed by
    /// more than one canonical category
    pub fn from_entries(
        entries: &[(&'static str, &[&'static str])],
    ) -> Result<Self, CategoryConflict> {
        let mut by_provider = HashMap::new();
        for &(canonical, providers) in entries {
            for provider in providers.iter().copied() {
                if let Some(first) = by_provider.insert(provider, canonical) {
                    return Err(CategoryConflict {
                        provider,
                        first,
                        second: canonical,
                    });
                }
            }
        }

        Ok(Self { by_provider })
    }

    /// The builtin table; its consistency is pinned by a unit test
    pub fn builtin() -> &'static CategoryMap {
        static MAP: OnceLock<CategoryMap> = OnceLock::new();
        MAP.get_or_init(|| {
            CategoryMap::from_entries(BUILTIN_ENTRIES)
                .unwrap_or_else(|conflict| panic!("builtin category table: {conflict}"))
        })
    }

    /// Resolve a provider genre string to its canonical category; unknown
    /// strings pass through unchanged
    pub fn resolve<'a>(&self, provider: &'a str) -> &'a str {
        self.by_provider.get(provider).copied().unwrap_or(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_has_no_conflicts() {
        assert!(CategoryMap::from_entries(BUILTIN_ENTRIES).is_ok());
    }

    #[test]
    fn test_conflicting_entries_are_rejected() {
        const CONFLICTING: &[(&str, &[&str])] = &[
            ("Action", &["Martial Arts"]),
            ("Sports", &["Martial Arts"]),
        ];
        let err = CategoryMap::from_entries(CONFLICTING).unwrap_err();
        assert_eq!(err.provider, "Martial Arts");
        assert_eq!(err.first, "Action");
        assert_eq!(err.second, "Sports");
    }

    #[test]
    fn test_resolve_known_provider_genres() {
        let map = CategoryMap::builtin();
        assert_eq!(map.resolve("Cartoons"), "Animated");
        assert_eq!(map.resolve("Sci-Fi Thrillers"), "Science Fiction");
        assert_eq!(map.resolve("Crime Drama"), "Crime drama");
        assert_eq!(map.resolve("General News"), "News");
    }

    #[test]
    fn test_unknown_genre_passes_through() {
        let map = CategoryMap::builtin();
        assert_eq!(map.resolve("Telenovela"), "Telenovela");
    }

    #[test]
    fn test_resolution_is_idempotent_for_canonical_strings() {
        // A canonical category that is not itself a provider genre resolves
        // to itself on a second pass
        let map = CategoryMap::builtin();
        let first = map.resolve("Family Animation");
        assert_eq!(first, "Animated");
        assert_eq!(map.resolve(first), "Animated");
    }
}
