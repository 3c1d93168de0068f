//! Pattern-based CNAE extraction from unstructured text.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

/// Which CNAE surface format the extractor recognizes.
///
/// `Strict` requires the fully punctuated subclass form (`DD.DD-D-DD`).
/// `Lenient` additionally accepts loosely punctuated and bare 7-digit runs,
/// which show up in OCR'd municipal documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodePattern {
    Strict,
    Lenient,
}

impl CodePattern {
    pub fn as_regex(&self) -> Regex {
        match self {
            Self::Strict => Regex::new(r"\b\d{2}\.\d{2}-\d-\d{2}\b").unwrap(),
            Self::Lenient => {
                Regex::new(r"\b\d{2}\.?\d{2}[\s./-]?\d[\s./-]?\d{2}\b|\b\d{7}\b").unwrap()
            }
        }
    }
}

/// One extracted code: digits-only join key plus the first surface form
/// it was seen under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedCode {
    pub key: String,
    pub original: String,
}

/// Insertion-ordered mapping of normalized key → first-seen original.
///
/// Invariant: keys are unique; the first occurrence's literal substring
/// wins and later duplicates are dropped silently (deliberate dedup).
#[derive(Debug, Clone, Default)]
pub struct ExtractedCodes {
    entries: Vec<ExtractedCode>,
    seen: HashSet<String>,
}

impl ExtractedCodes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a raw match. Returns true if the normalized key was new.
    pub fn insert(&mut self, original: &str) -> bool {
        let key = normalize(original);
        if key.is_empty() || self.seen.contains(&key) {
            return false;
        }
        self.seen.insert(key.clone());
        self.entries.push(ExtractedCode {
            key,
            original: original.to_string(),
        });
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    pub fn original_for(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.original.as_str())
    }

    /// Entries in extraction-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = &ExtractedCode> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }
}

/// Scan a single text blob. No match → empty mapping, not an error.
pub fn extract(pattern: CodePattern, text: &str) -> ExtractedCodes {
    let mut codes = ExtractedCodes::new();
    scan_into(&pattern.as_regex(), text, &mut codes);
    codes
}

/// Scan an ordered sequence of per-page text blobs, accumulating matches
/// across all pages into one mapping. A code re-appearing on a later page
/// does not overwrite the earlier original.
pub fn extract_pages<'a, I>(pattern: CodePattern, pages: I) -> ExtractedCodes
where
    I: IntoIterator<Item = &'a str>,
{
    let re = pattern.as_regex();
    let mut codes = ExtractedCodes::new();
    for page in pages {
        scan_into(&re, page, &mut codes);
    }
    codes
}

fn scan_into(re: &Regex, text: &str, codes: &mut ExtractedCodes) {
    for m in re.find_iter(text) {
        codes.insert(m.as_str());
    }
}
