//! Text canonicalization helpers used by the field pipelines.
//!
//! These are the building blocks for turning free-form user input such as
//! `"  garmin   FENIX 7!! "` into the stored form `"Garmin FENIX 7"`.

/// Characters accepted in a manufacturer name.
pub const MANUFACTURER_WHITELIST: &[&str] = &["a-z", "A-Z", "0-9", "-", "(", ")", ".", " "];

/// Characters accepted in a model name. Same as manufacturer plus `+`.
pub const MODEL_WHITELIST: &[&str] = &["a-z", "A-Z", "0-9", "-", "+", "(", ")", ".", " "];

// ---------------------------------------------------------------------------
// Whitelist stripping
// ---------------------------------------------------------------------------

/// A single parsed whitelist entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WhitelistEntry {
    Range(char, char),
    Literal(char),
}

impl WhitelistEntry {
    fn matches(self, c: char) -> bool {
        match self {
            WhitelistEntry::Range(lo, hi) => (lo..=hi).contains(&c),
            WhitelistEntry::Literal(l) => l == c,
        }
    }
}

/// Parse one entry into either a range or a run of literal characters.
///
/// Only `x-y` where both ends are ASCII digits, both lowercase or both
/// uppercase letters (and `x <= y`) counts as a range. Anything else,
/// including a lone `-`, is taken literally character by character.
fn parse_entry(entry: &str, out: &mut Vec<WhitelistEntry>) {
    let chars: Vec<char> = entry.chars().collect();
    if let [lo, '-', hi] = chars[..] {
        let same_class = (lo.is_ascii_lowercase() && hi.is_ascii_lowercase())
            || (lo.is_ascii_uppercase() && hi.is_ascii_uppercase())
            || (lo.is_ascii_digit() && hi.is_ascii_digit());
        if same_class && lo <= hi {
            out.push(WhitelistEntry::Range(lo, hi));
            return;
        }
    }
    out.extend(chars.into_iter().map(WhitelistEntry::Literal));
}

/// Remove every character of `value` that no whitelist entry matches.
///
/// Entries are single characters or the range syntax `a-z`, `A-Z`, `0-9`.
/// The order of entries does not change the result. An empty whitelist
/// removes everything.
///
/// ```
/// use watches_core::text::strip_to_whitelist;
///
/// assert_eq!(strip_to_whitelist("a1-b!2", &["a-z", "0-9", "-"]), "a1-b2");
/// ```
pub fn strip_to_whitelist(value: &str, whitelist: &[&str]) -> String {
    let mut entries = Vec::with_capacity(whitelist.len());
    for entry in whitelist {
        parse_entry(entry, &mut entries);
    }
    value
        .chars()
        .filter(|c| entries.iter().any(|e| e.matches(*c)))
        .collect()
}

// ---------------------------------------------------------------------------
// Casing and spacing
// ---------------------------------------------------------------------------

/// Collapse every run of whitespace into a single space and trim both ends.
pub fn collapse_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Title-case `text`, word by word, splitting on single spaces.
///
/// Each word gets an uppercase first letter and a lowercase remainder. With
/// `preserve_all_uppercase_words`, words that contain no lowercase letter
/// (acronyms like `GPS` or references like `A1000MGA-5EF`) are kept as-is.
/// Word count and order never change.
///
/// Input should already be trimmed and single-spaced (see
/// [`collapse_spaces`]); an empty word is passed through unchanged.
pub fn to_title_case(text: &str, preserve_all_uppercase_words: bool) -> String {
    text.split(' ')
        .map(|word| title_case_word(word, preserve_all_uppercase_words))
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str, preserve_all_uppercase: bool) -> String {
    if preserve_all_uppercase && is_all_uppercase(word) {
        return word.to_string();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}

fn is_all_uppercase(word: &str) -> bool {
    !word.is_empty() && !word.chars().any(char::is_lowercase)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- strip_to_whitelist -------------------------------------------------

    #[test]
    fn strips_characters_outside_ranges_and_literals() {
        assert_eq!(strip_to_whitelist("a1-b!2", &["a-z", "0-9", "-"]), "a1-b2");
    }

    #[test]
    fn entry_order_does_not_matter() {
        let a = strip_to_whitelist("Hello, World-42!", &["a-z", "A-Z", "0-9", "-"]);
        let b = strip_to_whitelist("Hello, World-42!", &["-", "0-9", "A-Z", "a-z"]);
        assert_eq!(a, b);
        assert_eq!(a, "HelloWorld-42");
    }

    #[test]
    fn empty_whitelist_removes_everything() {
        assert_eq!(strip_to_whitelist("anything 123", &[]), "");
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        assert_eq!(strip_to_whitelist("a.b*c(d)", &[".", "(", ")"]), ".()");
        assert_eq!(strip_to_whitelist("^]\\x", &["^", "]", "\\"]), "^]\\");
    }

    #[test]
    fn unrecognized_range_is_taken_literally() {
        // Mixed classes are not a range: only 'a', '-' and 'Z' are allowed.
        assert_eq!(strip_to_whitelist("abZ-m", &["a-Z"]), "aZ-");
    }

    #[test]
    fn partial_ranges_are_supported() {
        assert_eq!(strip_to_whitelist("abcxyz", &["a-c"]), "abc");
    }

    #[test]
    fn manufacturer_whitelist_drops_symbols() {
        assert_eq!(
            strip_to_whitelist("Tag Heuer & Co.!", MANUFACTURER_WHITELIST),
            "Tag Heuer  Co."
        );
    }

    #[test]
    fn model_whitelist_keeps_plus() {
        assert_eq!(strip_to_whitelist("G-Shock+ #1", MODEL_WHITELIST), "G-Shock+ 1");
        assert_eq!(strip_to_whitelist("G-Shock+", MANUFACTURER_WHITELIST), "G-Shock");
    }

    #[test]
    fn non_ascii_letters_are_removed() {
        assert_eq!(strip_to_whitelist("Citizén", MANUFACTURER_WHITELIST), "Citizn");
    }

    // -- collapse_spaces ----------------------------------------------------

    #[test]
    fn collapse_spaces_trims_and_squeezes() {
        assert_eq!(collapse_spaces("  watch   series\t 6  "), "watch series 6");
        assert_eq!(collapse_spaces("   "), "");
    }

    // -- to_title_case ------------------------------------------------------

    #[test]
    fn title_case_preserves_uppercase_words() {
        assert_eq!(to_title_case("GARMIN watch", true), "GARMIN Watch");
    }

    #[test]
    fn title_case_without_preservation() {
        assert_eq!(to_title_case("garmin watch", false), "Garmin Watch");
        assert_eq!(to_title_case("GARMIN watch", false), "Garmin Watch");
    }

    #[test]
    fn title_case_lowers_mixed_case_words() {
        assert_eq!(to_title_case("wAtCh sErIeS 6", true), "Watch Series 6");
    }

    #[test]
    fn title_case_keeps_codes_with_digits() {
        assert_eq!(
            to_title_case("vintage A1000MGA-5EF", true),
            "Vintage A1000MGA-5EF"
        );
        assert_eq!(to_title_case("series 6 (GPS)", true), "Series 6 (GPS)");
    }

    #[test]
    fn title_case_preserves_word_count() {
        let out = to_title_case("a b c d", true);
        assert_eq!(out.split(' ').count(), 4);
        assert_eq!(out, "A B C D");
    }

    #[test]
    fn title_case_tolerates_empty_words() {
        assert_eq!(to_title_case("", true), "");
        assert_eq!(to_title_case("a  b", false), "A  B");
    }
}
