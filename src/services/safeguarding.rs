use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use sha2::{Digest, Sha256};

use crate::services::language_detection::{LanguageDetector, WhatlangDetector};
use crate::services::word_lists::{WordList, WhitelistTable};

pub const CENSOR_GLYPH: &str = "🤬";
pub const MAX_TAG_ID_LENGTH: usize = 50;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());

fn word_pattern(words: &WordList) -> Result<Option<Regex>, regex::Error> {
    if words.is_empty() {
        return Ok(None);
    }
    let alternation = alternation(words);
    Regex::new(&format!(r"(?i)\b(?:{alternation})(?:e?s)?\b")).map(Some)
}

fn substring_pattern(words: &WordList) -> Result<Option<Regex>, regex::Error> {
    if words.is_empty() {
        return Ok(None);
    }
    let alternation = alternation(words);
    Regex::new(&format!("(?i)(?:{alternation})")).map(Some)
}

fn alternation(words: &WordList) -> String {
    words
        .words()
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

// digits only, so the censor pass never matches a placeholder
fn placeholder_for(term: &str) -> String {
    let digest = Sha256::digest(term.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes).to_string()
}

pub struct SafeguardingService {
    detector: Arc<dyn LanguageDetector>,
    censor: Option<Regex>,
    tag_filter: Option<Regex>,
    whitelists: HashMap<String, Regex>,
}

impl SafeguardingService {
    pub fn new(
        detector: Arc<dyn LanguageDetector>,
        bad_words: &WordList,
        whitelist: &WhitelistTable,
    ) -> Result<Self, regex::Error> {
        let mut whitelists = HashMap::new();
        for (language, terms) in whitelist.iter() {
            if let Some(pattern) = word_pattern(terms)? {
                whitelists.insert(language.to_string(), pattern);
            }
        }

        Ok(Self {
            detector,
            censor: word_pattern(bad_words)?,
            tag_filter: substring_pattern(bad_words)?,
            whitelists,
        })
    }

    pub fn with_defaults() -> anyhow::Result<Self> {
        let service = Self::new(
            Arc::new(WhatlangDetector),
            &WordList::embedded(),
            &WhitelistTable::embedded()?,
        )?;
        Ok(service)
    }

    pub fn clean(&self, message: &str) -> String {
        let Some(censor) = &self.censor else {
            return message.to_string();
        };

        let whitelist = if self.whitelists.is_empty() {
            None
        } else {
            self.detector
                .detect_language(message)
                .and_then(|language| self.whitelists.get(&language.to_lowercase()))
        };

        let mut protected: HashMap<String, String> = HashMap::new();
        let shielded = match whitelist {
            Some(pattern) => pattern
                .replace_all(message, |caps: &Captures| {
                    let original = &caps[0];
                    let placeholder = placeholder_for(original);
                    protected.insert(placeholder.clone(), original.to_string());
                    placeholder
                })
                .into_owned(),
            None => message.to_string(),
        };

        let censored = censor.replace_all(&shielded, CENSOR_GLYPH);

        if protected.is_empty() {
            return censored.into_owned();
        }

        tracing::debug!("Restoring {} whitelisted terms", protected.len());

        DIGIT_RUN
            .replace_all(&censored, |caps: &Captures| {
                let digits = &caps[0];
                protected
                    .get(digits)
                    .cloned()
                    .unwrap_or_else(|| digits.to_string())
            })
            .into_owned()
    }

    /// `None` when nothing usable is left; callers drop those tags.
    pub fn clean_tag_id(&self, tag_id: &str) -> Option<String> {
        let mut cleaned: String = tag_id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect::<String>()
            .to_ascii_lowercase();

        cleaned.truncate(MAX_TAG_ID_LENGTH);

        if let Some(filter) = &self.tag_filter {
            // removals can join the remaining halves into a new match
            loop {
                let next = filter.replace_all(&cleaned, "").into_owned();
                if next.len() == cleaned.len() {
                    break;
                }
                cleaned = next;
            }
        }

        let cleaned = cleaned.trim_matches(|c: char| c == '-' || c == '_');

        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned.to_string())
        }
    }
}
