// src/categories.rs
//! Storefront category labels, exactly as the scraper stores them
//! (lowercased genre text). Game sub-genres sit in the same flat namespace,
//! so `"sports"` covers both the app and the game category.

pub const APP_CATEGORIES: &[&str] = &[
    "art & design",
    "augmented reality",
    "auto & vehicles",
    "beauty",
    "books & reference",
    "business",
    "comics",
    "communication",
    "dating",
    "daydream",
    "education",
    "entertainment",
    "events",
    "finance",
    "food & drink",
    "game",
    "health & fitness",
    "house & home",
    "libraries & demo",
    "lifestyle",
    "maps & navigation",
    "medical",
    "music & audio",
    "news & magazines",
    "parenting",
    "personalization",
    "photography",
    "productivity",
    "shopping",
    "social",
    "sports",
    "tools",
    "travel & local",
    "video players & editors",
    "wear os by google",
    "weather",
];

pub const GAME_CATEGORIES: &[&str] = &[
    "action",
    "adventure",
    "arcade",
    "board",
    "card",
    "casino",
    "casual",
    "educational",
    "music",
    "puzzle",
    "racing",
    "role playing",
    "simulation",
    "sports",
    "strategy",
    "trivia",
    "word",
];

pub fn is_known(label: &str) -> bool {
    let label = label.trim().to_lowercase();
    APP_CATEGORIES.contains(&label.as_str()) || GAME_CATEGORIES.contains(&label.as_str())
}

/// Every known label once, sorted.
pub fn all() -> Vec<&'static str> {
    let mut out: Vec<&'static str> = APP_CATEGORIES.iter().chain(GAME_CATEGORIES).copied().collect();
    out.sort_unstable();
    out.dedup();
    out
}

/// Labels from `list` that are not storefront categories.
pub fn unknown<'a>(list: &'a [String]) -> Vec<&'a str> {
    list.iter().map(String::as_str).filter(|c| !is_known(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_are_case_insensitive() {
        assert!(is_known("Art & Design"));
        assert!(is_known("role playing"));
        assert!(!is_known("cooking"));
    }

    #[test]
    fn all_is_sorted_and_unique() {
        let all = all();
        assert!(all.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(all.iter().filter(|c| **c == "sports").count(), 1);
    }
}
