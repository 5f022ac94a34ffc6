//! Fixed enumerations of permitted quote tags and image subcategories.

/// Tags accepted by the quote provider. 'athletics' and 'proverb' are left
/// out because the provider returns empty sets for them.
pub const QUOTE_TAGS: &[&str] = &[
    "business",
    "change",
    "character",
    "competition",
    "conservative",
    "courage",
    "education",
    "faith",
    "family",
    "famous-quotes",
    "film",
    "freedom",
    "friendship",
    "future",
    "happiness",
    "history",
    "honor",
    "humor",
    "humorous",
    "inspirational",
    "leadership",
    "life",
    "literature",
    "love",
    "motivational",
    "nature",
    "pain",
    "philosophy",
    "politics",
    "power-quotes",
    "religion",
    "science",
    "self",
    "self-help",
    "social-justice",
    "spirituality",
    "sports",
    "success",
    "technology",
    "time",
    "truth",
    "virtue",
    "war",
    "wisdom",
];

/// SFW subcategories served by the image provider.
pub const IMAGE_CATEGORIES: &[&str] = &[
    "waifu", "neko", "shinobu", "megumin", "bully", "cuddle", "cry", "hug", "awoo", "kiss", "lick",
    "pat", "smug", "bonk", "yeet", "blush", "smile", "wave", "highfive", "handhold", "nom", "bite",
    "glomp", "slap", "kill", "kick", "happy", "wink", "poke", "dance", "cringe",
];

pub fn is_quote_tag(tag: &str) -> bool {
    QUOTE_TAGS.contains(&tag)
}
