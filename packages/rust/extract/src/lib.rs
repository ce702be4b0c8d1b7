//! Skill extraction from job-posting text.
//!
//! This crate provides:
//! - [`zoning`] — splits a posting into target / ignore / neutral zones
//! - [`tagger`] — statistical topic extraction ([`Tagger`], [`HeuristicTagger`])
//! - [`dictionary`] — whole-term matching against a configured skill list
//! - [`filter`] — length, blocklist, and stopword gates
//! - [`SkillExtractor`] — the full text → skill list pipeline

pub mod dictionary;
pub mod filter;
pub mod tagger;
pub mod zoning;

use tracing::{debug, instrument};
use upskill_shared::{SkillLists, SkillsConfig};

pub use dictionary::Dictionary;
pub use filter::CandidateFilter;
pub use tagger::{HeuristicTagger, Tagger};
pub use zoning::{AmbiguousHeaderPolicy, Zone, ZoneSet, classify_lines, zone};

/// Zoning, candidate extraction, and filtering, configured once per run.
pub struct SkillExtractor {
    dictionary: Dictionary,
    filter: CandidateFilter,
    tagger: Box<dyn Tagger>,
    policy: AmbiguousHeaderPolicy,
}

impl SkillExtractor {
    /// Build an extractor from loaded lists with the heuristic tagger.
    pub fn new(lists: &SkillLists, policy: AmbiguousHeaderPolicy) -> Self {
        Self {
            dictionary: Dictionary::new(lists.dictionary.iter().cloned()),
            filter: CandidateFilter::new(&lists.blocklist),
            tagger: Box::new(HeuristicTagger),
            policy,
        }
    }

    /// Build an extractor from the `[skills]` config section.
    pub fn from_config(config: &SkillsConfig, lists: &SkillLists) -> Self {
        Self::new(lists, config.ambiguous_headers.into())
    }

    /// Swap in a different topic tagger.
    pub fn with_tagger(mut self, tagger: Box<dyn Tagger>) -> Self {
        self.tagger = tagger;
        self
    }

    /// Split text into zones with this extractor's header policy.
    pub fn zone(&self, text: &str) -> ZoneSet {
        zone(text, self.policy)
    }

    /// Raw candidates from the target and neutral zones: tagger topics first,
    /// then dictionary hits, deduplicated case-sensitively.
    pub fn candidates(&self, zones: &ZoneSet) -> Vec<String> {
        let scan = zones.scan_text();
        let mut found: Vec<String> = Vec::new();
        let mut push = |s: &str| {
            if !found.iter().any(|f| f == s) {
                found.push(s.to_string());
            }
        };

        match self.tagger.topics(&scan) {
            Ok(topics) => topics.iter().for_each(|t| push(t)),
            Err(e) => debug!(tagger = self.tagger.name(), error = %e, "tagger failed, continuing"),
        }

        for term in self.dictionary.find_in(&scan) {
            push(term);
        }

        found
    }

    /// Full pipeline: zone, extract, filter.
    #[instrument(skip_all, fields(text_len = text.len()))]
    pub fn extract(&self, text: &str) -> Vec<String> {
        let zones = self.zone(text);
        let candidates = self.candidates(&zones);
        let skills = self.filter.apply(&candidates, &self.dictionary);

        debug!(
            candidates = candidates.len(),
            skills = skills.len(),
            "extraction finished"
        );

        skills
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upskill_shared::{Result, UpskillError};

    const SAMPLE: &str =
        "Requirements\nMust know SQL and Python.\nBenefits\nFree lunch and insurance.";

    fn lists(dictionary: &[&str], blocklist: &[&str]) -> SkillLists {
        SkillLists {
            dictionary: dictionary.iter().map(|s| s.to_string()).collect(),
            blocklist: blocklist.iter().map(|s| s.to_string()).collect(),
        }
    }

    struct FailingTagger;

    impl Tagger for FailingTagger {
        fn topics(&self, _text: &str) -> Result<Vec<String>> {
            Err(UpskillError::validation("tagger exploded"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn sample_posting_yields_sql_and_python() {
        let extractor = SkillExtractor::new(
            &lists(&["SQL", "Python"], &["Insurance"]),
            AmbiguousHeaderPolicy::KeepCurrent,
        );
        assert_eq!(extractor.extract(SAMPLE), vec!["SQL", "Python"]);
    }

    #[test]
    fn ignore_zone_terms_never_extracted() {
        let text = "Responsibilities\nBuild pipelines in Airflow\nPerks\nCompany-paid Peloton and Kubernetes swag";
        let extractor = SkillExtractor::new(
            &lists(&["Airflow", "Kubernetes", "Peloton"], &[]),
            AmbiguousHeaderPolicy::KeepCurrent,
        );
        let skills = extractor.extract(text);
        assert!(skills.contains(&"Airflow".to_string()));
        assert!(!skills.iter().any(|s| s.contains("Kubernetes")));
        assert!(!skills.iter().any(|s| s.contains("Peloton")));
    }

    #[test]
    fn cpp_dictionary_entry_is_returned_literally() {
        let extractor = SkillExtractor::new(
            &lists(&["C++"], &[]),
            AmbiguousHeaderPolicy::KeepCurrent,
        );
        let skills = extractor.extract("C++ developer needed");
        assert!(skills.contains(&"C++".to_string()));
    }

    #[test]
    fn tagger_failure_is_tolerated() {
        let extractor = SkillExtractor::new(
            &lists(&["SQL"], &[]),
            AmbiguousHeaderPolicy::KeepCurrent,
        )
        .with_tagger(Box::new(FailingTagger));
        assert_eq!(extractor.extract("Skills\nStrong sql"), vec!["SQL"]);
    }

    #[test]
    fn candidates_dedup_case_sensitively() {
        let extractor = SkillExtractor::new(
            &lists(&["Python", "python"], &[]),
            AmbiguousHeaderPolicy::KeepCurrent,
        );
        let zones = extractor.zone("Skills\nWe use Python daily");
        assert_eq!(extractor.candidates(&zones), vec!["Python", "python"]);
    }

    #[test]
    fn default_lists_apply_minimal_blocklist() {
        let extractor =
            SkillExtractor::new(&SkillLists::default(), AmbiguousHeaderPolicy::KeepCurrent);
        let skills = extractor.extract("Skills\nWork with Salary Bands and Snowflake");
        assert_eq!(skills, vec!["Snowflake"]);
    }
}
