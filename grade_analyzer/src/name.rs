use crate::error::{RosterError, RosterResult};
use regex::Regex;
use std::sync::LazyLock;

/// Letters, spaces, hyphens and apostrophes, with at least one letter.
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L} '\-]*\p{L}[\p{L} '\-]*$").expect("name pattern must compile")
});

/// Trim and title-case a raw student name, then validate it.
///
/// The returned string is the canonical form used both for display and for
/// uniqueness checks, so `"john"`, `"John"` and `" JOHN "` are the same student.
pub fn normalize_name(raw: &str) -> RosterResult<String> {
    let name = title_case(raw.trim());
    if NAME_PATTERN.is_match(&name) {
        Ok(name)
    } else {
        Err(RosterError::InvalidName)
    }
}

/// Uppercase the first letter of every run of letters and lowercase the rest.
///
/// Any non-letter starts a new run, so `o'brien` becomes `O'Brien`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_handles_separators() {
        assert_eq!(title_case("mary-jane o'brien"), "Mary-Jane O'Brien");
        assert_eq!(title_case("JOHN"), "John");
        assert_eq!(title_case("john3smith"), "John3Smith");
        assert_eq!(title_case("élodie"), "Élodie");
    }

    #[test]
    fn test_normalize_accepts_valid_names() {
        assert_eq!(normalize_name("Mary-Jane O'Brien").unwrap(), "Mary-Jane O'Brien");
        assert_eq!(normalize_name("  jean luc  ").unwrap(), "Jean Luc");
    }

    #[test]
    fn test_normalize_collapses_case_variants() {
        let expected = "John".to_string();
        assert_eq!(normalize_name("john"), Ok(expected.clone()));
        assert_eq!(normalize_name("John"), Ok(expected.clone()));
        assert_eq!(normalize_name(" JOHN "), Ok(expected));
    }

    #[test]
    fn test_normalize_rejects_invalid_names() {
        for raw in ["John3", "", "   ", "---", "' -", "Ann_Lee", "Bob!"] {
            assert_eq!(
                normalize_name(raw),
                Err(RosterError::InvalidName),
                "{raw:?} should be rejected"
            );
        }
    }
}
