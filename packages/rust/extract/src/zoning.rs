//! Header-driven zoning of posting text.
//!
//! Lines are walked in order with a current zone that starts as
//! [`Zone::Neutral`]. Short capitalized lines are treated as section headers
//! and may switch the zone; every line (headers included) lands in whatever
//! zone is current after that check.

use std::sync::LazyLock;

use regex::Regex;
use upskill_shared::AmbiguousHeaders;

/// Header candidates must be shorter than this many characters once trimmed.
const MAX_HEADER_LEN: usize = 50;

/// A region of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Requirements, responsibilities, stack: positive evidence.
    Target,
    /// Benefits, compensation, legal boilerplate: never scanned.
    Ignore,
    /// Anything before the first recognized header.
    Neutral,
}

/// What an unrecognized header does to the current zone.
///
/// `KeepCurrent` is the default: a header like "Nice to have" inside a
/// requirements block keeps the following lines in the target zone instead of
/// leaking them into neutral.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AmbiguousHeaderPolicy {
    #[default]
    KeepCurrent,
    ResetToNeutral,
}

impl From<AmbiguousHeaders> for AmbiguousHeaderPolicy {
    fn from(value: AmbiguousHeaders) -> Self {
        match value {
            AmbiguousHeaders::Keep => Self::KeepCurrent,
            AmbiguousHeaders::Reset => Self::ResetToNeutral,
        }
    }
}

/// The three zones, each the newline-join of its lines in original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneSet {
    pub target: String,
    pub ignore: String,
    pub neutral: String,
}

impl ZoneSet {
    /// Text that feeds extraction: target followed by neutral.
    pub fn scan_text(&self) -> String {
        format!("{}\n{}", self.target, self.neutral)
    }
}

static TARGET_HEADERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(requirements|qualifications|skills|who you are|what you bring|experience|competencies|tech stack|responsibilities|duties|what you'll do|what you will do)",
    )
    .expect("valid regex")
});

static IGNORE_HEADERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(benefits|perks|what we offer|compensation|salary|legal|eeo|about us|company overview)",
    )
    .expect("valid regex")
});

/// Whether a trimmed line looks like a section header.
fn is_header_candidate(trimmed: &str) -> bool {
    trimmed.chars().count() < MAX_HEADER_LEN
        && trimmed.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Assign every line of `text` to a zone.
pub fn classify_lines(text: &str, policy: AmbiguousHeaderPolicy) -> Vec<(Zone, &str)> {
    let mut current = Zone::Neutral;
    let mut out = Vec::new();

    for line in text.split('\n') {
        let trimmed = line.trim();
        if is_header_candidate(trimmed) {
            if TARGET_HEADERS.is_match(trimmed) {
                current = Zone::Target;
            } else if IGNORE_HEADERS.is_match(trimmed) {
                current = Zone::Ignore;
            } else if policy == AmbiguousHeaderPolicy::ResetToNeutral {
                current = Zone::Neutral;
            }
        }
        out.push((current, line));
    }

    out
}

/// Split `text` into target, ignore, and neutral zones.
pub fn zone(text: &str, policy: AmbiguousHeaderPolicy) -> ZoneSet {
    let mut target: Vec<&str> = Vec::new();
    let mut ignore: Vec<&str> = Vec::new();
    let mut neutral: Vec<&str> = Vec::new();

    for (z, line) in classify_lines(text, policy) {
        match z {
            Zone::Target => target.push(line),
            Zone::Ignore => ignore.push(line),
            Zone::Neutral => neutral.push(line),
        }
    }

    ZoneSet {
        target: target.join("\n"),
        ignore: ignore.join("\n"),
        neutral: neutral.join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str =
        "Requirements\nMust know SQL and Python.\nBenefits\nFree lunch and insurance.";

    #[test]
    fn sample_posting_zones() {
        let zones = zone(SAMPLE, AmbiguousHeaderPolicy::KeepCurrent);
        assert_eq!(zones.target, "Requirements\nMust know SQL and Python.");
        assert_eq!(zones.ignore, "Benefits\nFree lunch and insurance.");
        assert_eq!(zones.neutral, "");
    }

    #[test]
    fn every_line_lands_in_exactly_one_zone() {
        let text = "Acme is hiring\n\nResponsibilities\n- build things\nNice to have\n- Kafka\nPerks\n- snacks\nlowercase line\nEEO statement";
        let lines = classify_lines(text, AmbiguousHeaderPolicy::KeepCurrent);
        assert_eq!(lines.len(), text.split('\n').count());

        let zones = zone(text, AmbiguousHeaderPolicy::KeepCurrent);
        let total = [&zones.target, &zones.ignore, &zones.neutral]
            .iter()
            .filter(|z| !z.is_empty())
            .map(|z| z.split('\n').count())
            .sum::<usize>();
        assert_eq!(total, text.split('\n').count());
    }

    #[test]
    fn zoning_is_deterministic() {
        let a = zone(SAMPLE, AmbiguousHeaderPolicy::KeepCurrent);
        let b = zone(SAMPLE, AmbiguousHeaderPolicy::KeepCurrent);
        assert_eq!(a, b);
    }

    #[test]
    fn ambiguous_header_keeps_current_zone() {
        let text = "Qualifications\n- Rust\nNice To Have\n- Kafka";
        let lines = classify_lines(text, AmbiguousHeaderPolicy::KeepCurrent);
        assert!(lines.iter().all(|(z, _)| *z == Zone::Target));
    }

    #[test]
    fn reset_policy_moves_to_neutral() {
        let text = "Qualifications\n- Rust\nNice To Have\n- Kafka";
        let lines = classify_lines(text, AmbiguousHeaderPolicy::ResetToNeutral);
        assert_eq!(lines[1].0, Zone::Target);
        assert_eq!(lines[2].0, Zone::Neutral);
        assert_eq!(lines[3].0, Zone::Neutral);
    }

    #[test]
    fn long_or_lowercase_lines_are_not_headers() {
        let text = "Benefits\nrequirements are listed below\nSkills you will need include a great many things beyond this";
        let lines = classify_lines(text, AmbiguousHeaderPolicy::KeepCurrent);
        assert!(lines.iter().all(|(z, _)| *z == Zone::Ignore));
    }

    #[test]
    fn headers_match_at_line_start_case_insensitively() {
        let text = "  WHAT YOU'LL DO:\nShip features\nAbout Us\nWe are great";
        let lines = classify_lines(text, AmbiguousHeaderPolicy::KeepCurrent);
        assert_eq!(lines[0].0, Zone::Target);
        assert_eq!(lines[1].0, Zone::Target);
        assert_eq!(lines[2].0, Zone::Ignore);
        assert_eq!(lines[3].0, Zone::Ignore);
    }

    #[test]
    fn scan_text_excludes_ignore_zone() {
        let zones = zone(SAMPLE, AmbiguousHeaderPolicy::KeepCurrent);
        let scan = zones.scan_text();
        assert!(scan.contains("SQL"));
        assert!(!scan.contains("insurance"));
    }
}
