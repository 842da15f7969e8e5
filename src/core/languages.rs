//! Response languages supported by the service.

/// Language used when the requested one is unsupported.
pub const DEFAULT_LANGUAGE: &str = "en";

static LANGUAGES: &[&str] = &["en", "es"];

/// Supported two-letter language codes.
pub fn languages() -> &'static [&'static str] {
    LANGUAGES
}

/// Check whether `code` is a supported language. Case-insensitive; the
/// code must be exactly two characters.
pub fn is_valid_language(code: &str) -> bool {
    code.len() == 2 && LANGUAGES.contains(&code.to_ascii_lowercase().as_str())
}

/// Normalize a language code, falling back to [`DEFAULT_LANGUAGE`].
pub fn resolve_language(code: &str) -> &'static str {
    let code = code.trim().to_ascii_lowercase();
    LANGUAGES
        .iter()
        .find(|lang| **lang == code)
        .copied()
        .unwrap_or(DEFAULT_LANGUAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_languages() {
        for lang in languages() {
            assert!(is_valid_language(lang));
        }
        assert!(is_valid_language("En"));
    }

    #[test]
    fn unsupported_languages() {
        assert!(!is_valid_language("Swahili"));
        assert!(!is_valid_language("de"));
        assert!(!is_valid_language(""));
        assert!(!is_valid_language("english"));
    }

    #[test]
    fn resolve_falls_back_to_english() {
        assert_eq!(resolve_language("ES"), "es");
        assert_eq!(resolve_language(" en "), "en");
        assert_eq!(resolve_language("fr"), "en");
    }
}
