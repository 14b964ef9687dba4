use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use anyhow::Context;

const BAD_WORDS: &str = include_str!("../data/bad_words.txt");
const WHITELIST: &str = include_str!("../data/whitelist.json");

/// Sorted longest first so an alternation prefers `cyberfuck` over `fuck`
/// at the same position.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        let mut words: Vec<String> = unique.into_iter().collect();
        words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Self { words }
    }

    /// Parses one term per line. Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        )
    }

    pub fn embedded() -> Self {
        Self::parse(BAD_WORDS)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read word list {}", path.display()))?;
        let list = Self::parse(&text);
        tracing::info!("Loaded {} terms from {}", list.len(), path.display());
        Ok(list)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Keyed by the codes the language detector produces.
#[derive(Debug, Clone, Default)]
pub struct WhitelistTable {
    languages: HashMap<String, WordList>,
}

impl WhitelistTable {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator,
        V::Item: AsRef<str>,
    {
        let languages = entries
            .into_iter()
            .map(|(code, terms)| {
                let code: String = code.into();
                (code.to_lowercase(), WordList::new(terms))
            })
            .filter(|(_, terms)| !terms.is_empty())
            .collect();

        Self { languages }
    }

    pub fn parse(json: &str) -> anyhow::Result<Self> {
        let raw: HashMap<String, Vec<String>> =
            serde_json::from_str(json).context("invalid whitelist table")?;
        Ok(Self::new(raw))
    }

    pub fn embedded() -> anyhow::Result<Self> {
        Self::parse(WHITELIST)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read whitelist table {}", path.display()))?;
        let table = Self::parse(&json)?;
        tracing::info!(
            "Loaded whitelist for {} languages from {}",
            table.languages.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn get(&self, language: &str) -> Option<&WordList> {
        self.languages.get(&language.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WordList)> {
        self.languages.iter().map(|(code, terms)| (code.as_str(), terms))
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}
