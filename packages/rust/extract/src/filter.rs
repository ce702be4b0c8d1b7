//! Noise filtering for extracted candidates.

use crate::dictionary::Dictionary;

/// Capitalized function words that are never skills. Matched exactly.
const STOPWORDS: &[&str] = &[
    "The", "An", "A", "To", "In", "Of", "And", "For", "With", "From", "By",
];

/// Candidates up to this many characters need a dictionary match to survive.
const MIN_LEN_WITHOUT_WHITELIST: usize = 2;

/// Drops short, blocklisted, and function-word candidates.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    blocklist: Vec<String>,
}

impl CandidateFilter {
    /// Blocklist terms are matched case-insensitively as substrings.
    pub fn new<I, S>(blocklist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            blocklist: blocklist
                .into_iter()
                .map(|b| b.as_ref().trim().to_lowercase())
                .filter(|b| !b.is_empty())
                .collect(),
        }
    }

    /// Filter and deduplicate, preserving first-seen order.
    pub fn apply<I, S>(&self, candidates: I, dictionary: &Dictionary) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kept: Vec<String> = Vec::new();

        for candidate in candidates {
            let candidate = candidate.as_ref().trim();
            if !self.keeps(candidate, dictionary) {
                continue;
            }
            if !kept.iter().any(|k| k == candidate) {
                kept.push(candidate.to_string());
            }
        }

        kept
    }

    /// Gate a single trimmed candidate.
    pub fn keeps(&self, candidate: &str, dictionary: &Dictionary) -> bool {
        if candidate.is_empty() {
            return false;
        }

        let long_enough = candidate.chars().count() > MIN_LEN_WITHOUT_WHITELIST;
        if !long_enough && !dictionary.contains_ignore_case(candidate) {
            return false;
        }

        let lowered = candidate.to_lowercase();
        if self.blocklist.iter().any(|b| lowered.contains(b.as_str())) {
            return false;
        }

        !STOPWORDS.contains(&candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_candidates_need_dictionary_entry() {
        let dict = Dictionary::new(["R", "Go", "C#"]);
        let filter = CandidateFilter::new(Vec::<String>::new());

        for short in ["R", "r", "go", "C#", "c#"] {
            assert!(filter.keeps(short, &dict), "{short} should be whitelisted");
        }
        for short in ["Q", "UX", "ab", "C+"] {
            assert!(!filter.keeps(short, &dict), "{short} should be dropped");
        }
        assert!(filter.keeps("SQL", &dict));
    }

    #[test]
    fn blocklist_matches_substrings_ignoring_case() {
        let dict = Dictionary::default();
        let filter = CandidateFilter::new(["Insurance", "LLC"]);
        assert!(!filter.keeps("Health insurance", &dict));
        assert!(!filter.keeps("Acme llc", &dict));
        assert!(filter.keeps("Kafka", &dict));
    }

    #[test]
    fn blocklist_beats_dictionary_whitelist() {
        let dict = Dictionary::new(["Salary Negotiation"]);
        let filter = CandidateFilter::new(["salary"]);
        assert!(!filter.keeps("Salary Negotiation", &dict));
    }

    #[test]
    fn stopwords_are_dropped() {
        let dict = Dictionary::new(["A", "In"]);
        let filter = CandidateFilter::new(Vec::<String>::new());
        assert!(!filter.keeps("The", &dict));
        assert!(!filter.keeps("And", &dict));
        assert!(!filter.keeps("With", &dict));
        // Whitelisted by the dictionary but still a function word
        assert!(!filter.keeps("A", &dict));
    }

    #[test]
    fn stopwords_match_exact_case_only() {
        let dict = Dictionary::default();
        let filter = CandidateFilter::new(Vec::<String>::new());
        assert!(!filter.keeps("From", &dict));
        assert!(filter.keeps("from", &dict));
        assert!(filter.keeps("FROM", &dict));
        assert!(filter.keeps("the", &dict));
    }

    #[test]
    fn apply_trims_and_dedups_in_order() {
        let dict = Dictionary::new(["SQL"]);
        let filter = CandidateFilter::new(["Benefits"]);
        let out = filter.apply(
            [" Python ", "SQL", "Benefits Package", "Python", "", "Kafka", "SQL "],
            &dict,
        );
        assert_eq!(out, vec!["Python", "SQL", "Kafka"]);
    }
}
