use crate::answer::normalize;
use crate::puzzle::GameKind;
use crate::{Error, Result};
use anyhow::Context;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::collections::BTreeMap;
use std::path::Path;

/// Word list for one game. Every word has exactly `word_length` letters.
#[derive(Debug, Clone, Default)]
pub struct WordBank {
    words: Vec<String>,
    word_length: usize,
}

impl WordBank {
    pub fn new(word_length: usize, words: Vec<String>) -> Result<Self> {
        for word in &words {
            check_length(word, word_length)?;
        }
        Ok(WordBank { words, word_length })
    }

    /// Bank for `kind` loaded from `path`
    pub fn for_game(kind: GameKind, path: impl AsRef<Path>) -> Result<Self> {
        Self::load_from_file(path, kind.word_length())
    }

    /// Parse a word list with one word per line.
    ///
    /// Lines are trimmed, so `\n`, `\r\n` and trailing `\r` all work. Blank
    /// lines are skipped. The first word of the wrong length rejects the
    /// whole list.
    pub fn parse(text: &str, word_length: usize) -> Result<Self> {
        let words = text
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self::new(word_length, words)
    }

    /// Load a word list from a file
    pub fn load_from_file(path: impl AsRef<Path>, word_length: usize) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read word list {}", path.display()))?;

        match Self::parse(&content, word_length) {
            Ok(bank) => {
                tracing::info!(path = %path.display(), words = bank.len(), "word list loaded");
                Ok(bank)
            }
            Err(e) => {
                tracing::error!(path = %path.display(), "rejecting word list: {}", e);
                Err(e)
            }
        }
    }

    /// Write the word list, one word per line
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut content = self.words.join("\n");
        content.push('\n');
        std::fs::write(path, content)
            .with_context(|| format!("cannot write word list {}", path.display()))?;
        Ok(())
    }

    /// Pick a random word
    pub fn random_word<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.words.choose(rng).map(String::as_str)
    }

    pub fn word_length(&self) -> usize {
        self.word_length
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

    /// Case- and whitespace-insensitive lookup
    pub fn contains(&self, word: &str) -> bool {
        let wanted = normalize(word);
        self.words.iter().any(|w| normalize(w) == wanted)
    }

    pub fn stats(&self) -> WordBankStats {
        let mut letter_counts = BTreeMap::new();
        for letter in self.words.iter().flat_map(|w| w.chars()) {
            *letter_counts
                .entry(letter.to_lowercase().next().unwrap_or(letter))
                .or_insert(0) += 1;
        }

        let mut normalized: Vec<String> = self.words.iter().map(|w| normalize(w)).collect();
        normalized.sort_unstable();
        normalized.dedup();

        WordBankStats {
            total_words: self.words.len(),
            unique_words: normalized.len(),
            word_length: self.word_length,
            letter_counts,
        }
    }

    /// Duplicates and words with characters other than letters
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut seen = BTreeMap::new();

        for (i, word) in self.words.iter().enumerate() {
            if let Some(first) = seen.insert(normalize(word), i + 1) {
                problems.push(format!(
                    "line {}: '{}' duplicates line {}",
                    i + 1,
                    word,
                    first
                ));
            }
            if !word.chars().all(char::is_alphabetic) {
                problems.push(format!("line {}: '{}' contains non-letters", i + 1, word));
            }
        }

        problems
    }
}

fn check_length(word: &str, expected: usize) -> Result<()> {
    let actual = word.chars().count();
    if actual != expected {
        return Err(Error::WordLength {
            word: word.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct WordBankStats {
    pub total_words: usize,
    pub unique_words: usize,
    pub word_length: usize,
    pub letter_counts: BTreeMap<char, usize>,
}
