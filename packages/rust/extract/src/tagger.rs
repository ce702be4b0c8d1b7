//! Topic tagging for free-form posting text.
//!
//! A [`Tagger`] pulls named topic phrases ("Apache Spark", "PostgreSQL",
//! "CI/CD") out of prose. The built-in [`HeuristicTagger`] first runs a
//! series of strip passes (`&str -> String`, applied in sequence) that remove
//! entities which are never skills, then collects runs of capitalized,
//! acronym, or mixed-case tokens.

use std::sync::LazyLock;

use regex::Regex;
use upskill_shared::Result;

/// Longest phrase (in tokens) a single topic may span.
const MAX_PHRASE_TOKENS: usize = 4;

/// Replacement for stripped spans; a phrase break that is not a sentence end.
const BREAK: &str = " ; ";

/// Characters trimmed from the front of a token.
const LEADING_PUNCT: &[char] = &['(', '[', '{', '"', '\'', '“', '‘', '*', '•', '-', '–'];

/// Characters trimmed from the end of a token.
const TRAILING_PUNCT: &[char] = &[
    '.', ',', ';', ':', '!', '?', ')', ']', '}', '"', '\'', '”', '’', '*',
];

/// Capitalized words that never start or join a topic (compared lowercased).
const CAP_STOPWORDS: &[&str] = &[
    "a", "about", "all", "also", "an", "and", "any", "are", "as", "at", "be", "but", "by", "can",
    "do", "for", "from", "have", "he", "her", "his", "how", "i", "if", "in", "is", "it", "its",
    "may", "must", "no", "not", "of", "on", "or", "our", "ours", "please", "she", "should", "so",
    "that", "the", "their", "them", "these", "they", "this", "those", "to", "us", "we", "what",
    "when", "where", "who", "why", "will", "with", "would", "you", "you'll", "you're", "your",
];

/// Extracts topic phrases from text.
pub trait Tagger: Send + Sync {
    /// Topic phrases in order of first appearance.
    fn topics(&self, text: &str) -> Result<Vec<String>>;

    /// Human-readable tagger name for tracing.
    fn name(&self) -> &str;
}

/// Rule-based tagger: strip passes followed by capitalized-run detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTagger;

impl Tagger for HeuristicTagger {
    fn topics(&self, text: &str) -> Result<Vec<String>> {
        let cleaned = strip_entities(text);
        let mut topics: Vec<String> = Vec::new();

        for line in cleaned.lines() {
            for phrase in line_topics(line) {
                if !topics.contains(&phrase) {
                    topics.push(phrase);
                }
            }
        }

        Ok(topics)
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

// ---------------------------------------------------------------------------
// Strip passes
// ---------------------------------------------------------------------------

/// Remove URLs, e-mails, money, dates, people, organizations, and places.
pub(crate) fn strip_entities(text: &str) -> String {
    let mut result = text.to_string();

    result = strip_urls(&result);
    result = strip_money(&result);
    result = strip_dates(&result);
    result = strip_people(&result);
    result = strip_organizations(&result);
    result = strip_places(&result);

    result
}

fn strip_urls(text: &str) -> String {
    static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)\b(?:https?://|www\.)\S+|[\w.+-]+@[\w-]+\.[\w.-]+").expect("valid regex")
    });

    URL_RE.replace_all(text, BREAK).to_string()
}

fn strip_money(text: &str) -> String {
    static MONEY_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r"(?i)[$€£¥]\s?\d[\d,]*(?:\.\d+)?\s?(?:k|m|million|billion)?\b(?:\s?(?:-|–|to)\s?[$€£¥]?\s?\d[\d,]*(?:\.\d+)?\s?(?:k|m)?\b)?|\b\d[\d,]*(?:\.\d+)?\s?(?:usd|eur|gbp|dollars|euros)\b",
        )
        .expect("valid regex")
    });

    MONEY_RE.replace_all(text, BREAK).to_string()
}

fn strip_dates(text: &str) -> String {
    static MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
        // Month names are matched capitalized only so the modal "may" survives
        Regex::new(
            r"\b(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\b\.?(?:\s+\d{1,2}(?:st|nd|rd|th)?)?(?:,?\s+\d{4})?",
        )
        .expect("valid regex")
    });
    static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\b(?:\d{1,2}/\d{1,2}/\d{2,4}|\d{4}-\d{2}-\d{2})\b").expect("valid regex")
    });
    static WEEKDAY_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\b(?:Mon|Tues|Wednes|Thurs|Fri|Satur|Sun)day\b").expect("valid regex")
    });

    let result = MONTH_RE.replace_all(text, BREAK);
    let result = NUMERIC_RE.replace_all(&result, BREAK);
    WEEKDAY_RE.replace_all(&result, BREAK).to_string()
}

fn strip_people(text: &str) -> String {
    static PERSON_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\b(?:Mr|Mrs|Ms|Mx|Dr|Prof)\.?\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?")
            .expect("valid regex")
    });

    PERSON_RE.replace_all(text, BREAK).to_string()
}

fn strip_organizations(text: &str) -> String {
    static ORG_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r"\b(?:[A-Z][\w&'-]*\s+){0,3}[A-Z][\w&'-]*,?\s+(?:Inc|LLC|Ltd|Corp|Corporation|GmbH|PLC|Co)\b\.?",
        )
        .expect("valid regex")
    });

    ORG_RE.replace_all(text, BREAK).to_string()
}

fn strip_places(text: &str) -> String {
    static PLACE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r"\b(?:New York|San Francisco|Los Angeles|Seattle|Austin|Boston|Chicago|Denver|Atlanta|London|Berlin|Paris|Toronto|Vancouver|Dublin|Amsterdam|Singapore|Sydney|Bangalore|United States|United Kingdom|North America|USA|UK|Canada|Germany|India|Europe|EMEA|APAC|California|Texas)\b",
        )
        .expect("valid regex")
    });

    PLACE_RE.replace_all(text, BREAK).to_string()
}

// ---------------------------------------------------------------------------
// Topic detection
// ---------------------------------------------------------------------------

/// How strongly a token signals a named topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    /// Acronym, mixed case, or symbol-bearing: topical anywhere.
    Strong,
    /// Plain capitalized word: topical except at sentence start.
    Capitalized,
    /// Not topical; breaks the current run.
    Plain,
}

fn classify_token(token: &str) -> TokenKind {
    if !token.chars().any(char::is_uppercase) {
        return TokenKind::Plain;
    }
    if CAP_STOPWORDS.contains(&token.to_lowercase().as_str()) {
        return TokenKind::Plain;
    }

    let letters: Vec<char> = token.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.is_empty() {
        return TokenKind::Plain;
    }

    let acronym = letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase());
    let mixed_case = token.chars().skip(1).any(char::is_uppercase)
        && token.chars().any(char::is_lowercase);
    let symbolic = token
        .chars()
        .any(|c| c.is_ascii_digit() || matches!(c, '+' | '#' | '.' | '/'));

    if acronym || mixed_case || symbolic {
        TokenKind::Strong
    } else if token.chars().next().is_some_and(char::is_uppercase) {
        TokenKind::Capitalized
    } else {
        TokenKind::Plain
    }
}

/// Topic phrases found in one line of stripped text.
fn line_topics(line: &str) -> Vec<String> {
    // All-caps lines are shouted headers, not topics
    let has_lower = line.chars().any(char::is_lowercase);
    if !has_lower && line.split_whitespace().count() > 1 {
        return Vec::new();
    }

    let mut topics = Vec::new();
    let mut run: Vec<&str> = Vec::new();
    let mut sentence_start = true;

    let flush = |run: &mut Vec<&str>, topics: &mut Vec<String>| {
        if !run.is_empty() {
            topics.push(run.join(" "));
            run.clear();
        }
    };

    for raw in line.split_whitespace() {
        let starts_group = raw.starts_with(['(', '[', '{', '"', '“']);
        let token = raw
            .trim_start_matches(LEADING_PUNCT)
            .trim_end_matches(TRAILING_PUNCT);

        let tail = raw.trim_end_matches(['"', '\'', '”', '’', ')', ']', '}']);
        let ends_sentence = tail.ends_with(['.', '!', '?', ':']);
        let ends_phrase = ends_sentence || raw.len() != raw.trim_end_matches(TRAILING_PUNCT).len();

        if starts_group {
            flush(&mut run, &mut topics);
        }

        if token.is_empty() {
            // Bullets and stray punctuation keep the sentence-start state
            flush(&mut run, &mut topics);
            if ends_sentence {
                sentence_start = true;
            }
            continue;
        }

        match classify_token(token) {
            TokenKind::Strong => run.push(token),
            TokenKind::Capitalized if !sentence_start || !run.is_empty() => run.push(token),
            _ => flush(&mut run, &mut topics),
        }

        if run.len() >= MAX_PHRASE_TOKENS || ends_phrase {
            flush(&mut run, &mut topics);
        }

        sentence_start = ends_sentence;
    }

    flush(&mut run, &mut topics);
    topics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topics(text: &str) -> Vec<String> {
        HeuristicTagger.topics(text).expect("heuristic tagger never fails")
    }

    #[test]
    fn finds_acronyms_and_mid_sentence_names() {
        assert_eq!(topics("Must know SQL and Python."), vec!["SQL", "Python"]);
    }

    #[test]
    fn joins_adjacent_capitalized_tokens() {
        assert_eq!(
            topics("You will work with Apache Spark and Google Cloud Platform daily."),
            vec!["Apache Spark", "Google Cloud Platform"]
        );
    }

    #[test]
    fn skips_plain_capitalized_sentence_starts() {
        assert!(topics("Requirements").is_empty());
        assert_eq!(topics("Experience building dashboards in Tableau"), vec!["Tableau"]);
    }

    #[test]
    fn strong_tokens_count_at_sentence_start() {
        assert_eq!(
            topics("PostgreSQL and Node.js experience. C++ is a plus."),
            vec!["PostgreSQL", "Node.js", "C++"]
        );
    }

    #[test]
    fn commas_split_phrases() {
        assert_eq!(
            topics("Tools include Excel, Power BI, Looker"),
            vec!["Excel", "Power BI", "Looker"]
        );
    }

    #[test]
    fn strips_urls_money_dates() {
        let text = "Apply at https://Jobs.Example.com/Apply by March 3, 2026 for $120,000 - $150,000 with Kafka";
        let found = topics(text);
        assert_eq!(found, vec!["Kafka"]);
    }

    #[test]
    fn strips_people_orgs_and_places() {
        let text = "Report to Dr. Jane Smith at Globex Industries Inc. in San Francisco using Snowflake";
        let found = topics(text);
        assert_eq!(found, vec!["Snowflake"]);
    }

    #[test]
    fn ignores_shouted_headers() {
        assert!(topics("WHAT YOU'LL DO").is_empty());
    }

    #[test]
    fn stopword_capitals_do_not_form_topics() {
        assert!(topics("We value ownership. Our team is small.").is_empty());
    }

    #[test]
    fn long_runs_are_capped() {
        let found = topics("using Alpha Beta Gamma Delta Epsilon today");
        assert_eq!(found, vec!["Alpha Beta Gamma Delta", "Epsilon"]);
    }
}
