//! Static catalogue of cultures a language can be imported for.

use serde::Serialize;

/// Known culture: tag, English display name and text direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CultureInfo {
    pub culture: &'static str,
    pub name: &'static str,
    pub right_to_left: bool,
}

const fn culture(culture: &'static str, name: &'static str, right_to_left: bool) -> CultureInfo {
    CultureInfo {
        culture,
        name,
        right_to_left,
    }
}

const KNOWN_CULTURES: &[CultureInfo] = &[
    culture("ar-SA", "Arabic (Saudi Arabia)", true),
    culture("bg-BG", "Bulgarian (Bulgaria)", false),
    culture("cs-CZ", "Czech (Czech Republic)", false),
    culture("da-DK", "Danish (Denmark)", false),
    culture("de-DE", "German (Germany)", false),
    culture("el-GR", "Greek (Greece)", false),
    culture("en-AU", "English (Australia)", false),
    culture("en-GB", "English (United Kingdom)", false),
    culture("en-US", "English (United States)", false),
    culture("es-ES", "Spanish (Spain)", false),
    culture("es-MX", "Spanish (Mexico)", false),
    culture("fa-IR", "Persian (Iran)", true),
    culture("fi-FI", "Finnish (Finland)", false),
    culture("fr-FR", "French (France)", false),
    culture("he-IL", "Hebrew (Israel)", true),
    culture("hu-HU", "Hungarian (Hungary)", false),
    culture("it-IT", "Italian (Italy)", false),
    culture("ja-JP", "Japanese (Japan)", false),
    culture("ko-KR", "Korean (Korea)", false),
    culture("nb-NO", "Norwegian Bokmal (Norway)", false),
    culture("nl-NL", "Dutch (Netherlands)", false),
    culture("pl-PL", "Polish (Poland)", false),
    culture("pt-BR", "Portuguese (Brazil)", false),
    culture("pt-PT", "Portuguese (Portugal)", false),
    culture("ro-RO", "Romanian (Romania)", false),
    culture("ru-RU", "Russian (Russia)", false),
    culture("sk-SK", "Slovak (Slovakia)", false),
    culture("sv-SE", "Swedish (Sweden)", false),
    culture("th-TH", "Thai (Thailand)", false),
    culture("tr-TR", "Turkish (Turkey)", false),
    culture("uk-UA", "Ukrainian (Ukraine)", false),
    culture("vi-VN", "Vietnamese (Vietnam)", false),
    culture("zh-CN", "Chinese (Simplified, PRC)", false),
    culture("zh-TW", "Chinese (Traditional, Taiwan)", false),
];

/// All known cultures, sorted by tag.
pub fn all_cultures() -> &'static [CultureInfo] {
    KNOWN_CULTURES
}

/// Looks up a culture tag case-insensitively, ignoring surrounding spaces.
pub fn find_culture(tag: &str) -> Option<&'static CultureInfo> {
    let tag = tag.trim();
    KNOWN_CULTURES
        .iter()
        .find(|info| info.culture.eq_ignore_ascii_case(tag))
}

#[cfg(test)]
mod tests {
    use super::{all_cultures, find_culture};

    #[test]
    fn lookup_is_case_insensitive_and_returns_canonical_tag() {
        let info = find_culture(" EN-gb ").expect("en-GB should be known");
        assert_eq!(info.culture, "en-GB");
        assert!(find_culture("xx-YY").is_none());
        assert!(find_culture("").is_none());
    }

    #[test]
    fn catalogue_is_sorted_and_unique() {
        let tags: Vec<&str> = all_cultures().iter().map(|info| info.culture).collect();
        let mut sorted = tags.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(tags, sorted);
    }
}
