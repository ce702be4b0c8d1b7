//! Gap classification against the user's known skills.

/// Skills the user already has. Anything else found in a posting is a gap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownSkills(Vec<String>);

impl KnownSkills {
    pub fn new<I, S>(skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(skills.into_iter().map(Into::into).collect())
    }

    /// Exact, case-sensitive membership test.
    pub fn is_gap(&self, skill: &str) -> bool {
        !self.0.iter().any(|known| known == skill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_skills_are_gaps() {
        let known = KnownSkills::new(["SQL", "Python", "Tableau", "Generative BI"]);
        assert!(!known.is_gap("SQL"));
        assert!(!known.is_gap("Generative BI"));
        assert!(known.is_gap("Kafka"));
    }

    #[test]
    fn match_is_case_sensitive() {
        let known = KnownSkills::new(["SQL"]);
        assert!(known.is_gap("sql"));
        assert!(known.is_gap(" SQL"));
    }

    #[test]
    fn empty_list_makes_everything_a_gap() {
        assert!(KnownSkills::default().is_gap("SQL"));
    }
}
