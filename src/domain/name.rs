//! Canonical display names for cookbook entries.
//!
//! Handwritten entry names arrive in all sorts of shapes (`"bEtty_CROCker-pancakes"`,
//! `"24 hour eggs"`). [`normalize`] turns them into space separated words with a
//! leading capital each.

use std::sync::LazyLock;

use regex::Regex;

/// Word separators that are rewritten to a plain space.
static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_-]").expect("separator pattern is valid"));

/// Anything that is neither an ASCII letter nor a space.
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z ]").expect("disallowed pattern is valid"));

/// Errors that can occur while normalizing a name.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// No letters survived normalization.
    #[error("Invalid recipe name '{0}': it must contain at least one letter")]
    NoLetters(String),
}

/// Normalizes a raw entry name into its canonical display form.
///
/// Underscores and hyphens become spaces, every other character that is not an
/// ASCII letter or a space is dropped, and the remaining words are joined by a
/// single space with their first letter upper-cased. The rest of each word keeps
/// its original case.
///
/// # Examples
///
/// ```
/// use cookbook::domain::name::normalize;
///
/// assert_eq!(
///     normalize("bEtty_CROCker-pancakes").unwrap(),
///     "Betty CROCker Pancakes"
/// );
/// assert_eq!(normalize("24 hour eggs").unwrap(), "Hour Eggs");
/// assert!(normalize("___").is_err());
/// ```
///
/// # Errors
///
/// Returns [`Error::NoLetters`] if the input contains no ASCII letters.
pub fn normalize(raw: &str) -> Result<String, Error> {
    let spaced = SEPARATOR.replace_all(raw, " ");
    let letters = DISALLOWED.replace_all(&spaced, "");

    let normalized = letters
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    if normalized.is_empty() {
        return Err(Error::NoLetters(raw.to_string()));
    }

    Ok(normalized)
}

/// Upper-cases the first character of a word, leaving the rest untouched.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_ascii_uppercase().to_string() + chars.as_str()
    })
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("bEtty_CROCker-pancakes", "Betty CROCker Pancakes"; "only leading letters change")]
    #[test_case("24 hour eggs", "Hour Eggs"; "digits are dropped")]
    #[test_case("Riso-Tto", "Riso Tto"; "hyphen splits words")]
    #[test_case("Skibidi spaghetti", "Skibidi Spaghetti"; "plain words")]
    #[test_case("   meatball   sub  ", "Meatball Sub"; "whitespace runs collapse")]
    #[test_case("alpHa-alFRedo", "AlpHa AlFRedo"; "inner case preserved")]
    #[test_case("mac&cheese!", "Maccheese"; "punctuation is deleted not replaced")]
    #[test_case("ABC", "ABC"; "all caps unchanged")]
    #[test_case("__a__", "A"; "single letter")]
    fn normalizes(raw: &str, expected: &str) {
        assert_eq!(normalize(raw).unwrap(), expected);
    }

    #[test_case(""; "empty")]
    #[test_case("___"; "only underscores")]
    #[test_case("-- --"; "only separators")]
    #[test_case("1234 !?"; "no letters")]
    #[test_case("ünïcödé"; "non ascii letters")]
    fn rejects(raw: &str) {
        assert_eq!(normalize(raw), Err(Error::NoLetters(raw.to_string())));
    }

    #[test]
    fn tabs_are_not_separators() {
        // Only a literal space survives the filter, so a tab glues words together.
        assert_eq!(normalize("fried\trice").unwrap(), "Friedrice");
    }

    #[test]
    fn canonical_names_are_stable() {
        let once = normalize("banana_bread").unwrap();
        assert_eq!(normalize(&once).unwrap(), once);
    }

    #[test]
    fn error_display() {
        let error = normalize("42").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid recipe name '42': it must contain at least one letter"
        );
    }
}
