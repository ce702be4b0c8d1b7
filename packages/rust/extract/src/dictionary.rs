//! Dictionary matching of known skill terms.

use regex::Regex;
use tracing::warn;

/// A configured skill dictionary with one compiled pattern per entry.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: Vec<DictionaryEntry>,
}

#[derive(Debug, Clone)]
struct DictionaryEntry {
    term: String,
    lowered: String,
    /// `None` when the pattern failed to compile; the entry still whitelists
    /// short terms in the filter but never matches text.
    pattern: Option<Regex>,
}

impl Dictionary {
    /// Compile every entry. Blank entries are dropped.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = terms
            .into_iter()
            .map(|t| -> String { t.into() })
            .filter(|t| !t.trim().is_empty())
            .map(|term| {
                let pattern = match term_pattern(&term) {
                    Ok(re) => Some(re),
                    Err(e) => {
                        warn!(%term, error = %e, "skipping dictionary entry with invalid pattern");
                        None
                    }
                };
                DictionaryEntry {
                    lowered: term.to_lowercase(),
                    term,
                    pattern,
                }
            })
            .collect();

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `candidate` equals an entry, ignoring case.
    pub fn contains_ignore_case(&self, candidate: &str) -> bool {
        let lowered = candidate.to_lowercase();
        self.entries.iter().any(|e| e.lowered == lowered)
    }

    /// Literal entries (not the matched substrings) found in `text`, in
    /// dictionary order.
    pub fn find_in<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries.iter().filter_map(move |e| {
            e.pattern
                .as_ref()
                .filter(|re| re.is_match(text))
                .map(|_| e.term.as_str())
        })
    }
}

/// Build a case-insensitive whole-term pattern for a dictionary entry.
///
/// `\b` only works next to word characters, so entries that start or end with
/// punctuation (`C++`, `C#`, `.NET`) use an explicit "edge of text or
/// non-word character" guard on that side instead.
fn term_pattern(term: &str) -> Result<Regex, regex::Error> {
    let escaped = regex::escape(term);
    let is_word = |c: char| c.is_alphanumeric() || c == '_';

    let left = match term.chars().next() {
        Some(c) if is_word(c) => r"\b",
        _ => r"(?:^|\W)",
    };
    let right = match term.chars().last() {
        Some(c) if is_word(c) => r"\b",
        _ => r"(?:\W|$)",
    };

    Regex::new(&format!("(?i){left}{escaped}{right}"))
}
