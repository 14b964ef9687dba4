/// `None` means unknown, which disables whitelisting.
pub trait LanguageDetector: Send + Sync {
    fn detect_language(&self, text: &str) -> Option<String>;
}

/// ISO 639-3 codes (`eng`, `nob`, `dan`, ...).
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect_language(&self, text: &str) -> Option<String> {
        let lang = whatlang::detect_lang(text)?;
        Some(lang.code().to_string())
    }
}

/// Answers with the same code for every text, so tests can pick the
/// whitelist without running real detection.
#[derive(Debug, Clone, Default)]
pub struct FixedLanguage(pub Option<String>);

impl FixedLanguage {
    pub fn new(code: &str) -> Self {
        Self(Some(code.to_string()))
    }

    pub fn unknown() -> Self {
        Self(None)
    }
}

impl LanguageDetector for FixedLanguage {
    fn detect_language(&self, _text: &str) -> Option<String> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whatlang_empty_text_is_unknown() {
        assert_eq!(WhatlangDetector.detect_language(""), None);
    }

    #[test]
    fn test_whatlang_detects_english() {
        let text = "The quick brown fox jumps over the lazy dog while the children are \
                    playing in the garden behind their house on a sunny afternoon.";
        assert_eq!(WhatlangDetector.detect_language(text).as_deref(), Some("eng"));
    }

    #[test]
    fn test_fixed_language() {
        assert_eq!(
            FixedLanguage::new("nob").detect_language("anything").as_deref(),
            Some("nob")
        );
        assert_eq!(FixedLanguage::unknown().detect_language("anything"), None);
    }
}
