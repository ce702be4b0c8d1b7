//! Core domain types for the skill tracker.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SourceLabel
// ---------------------------------------------------------------------------

/// Where a skill observation came from: a URL, a manual paste, or an inbox item.
///
/// Labels are stored comma-separated, so commas are replaced on construction
/// to keep a stored list parseable back into the same labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceLabel(String);

impl SourceLabel {
    /// Normalize an arbitrary label.
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(label.as_ref().replace(',', ";").trim().to_string())
    }

    /// Label for text pasted on the command line on `date`.
    pub fn manual_paste(date: NaiveDate) -> Self {
        Self::new(format!("Manual Paste ({})", date.format("%-m/%-d/%Y")))
    }

    /// Label for a mobile-inbox item with the given title.
    pub fn inbox(title: &str) -> Self {
        Self::new(format!("Mobile Inbox: {title}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// Raw posting text plus the label it will be recorded under.
#[derive(Debug, Clone)]
pub struct Document {
    pub text: String,
    pub source: SourceLabel,
}

impl Document {
    pub fn new(text: impl Into<String>, source: SourceLabel) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// SkillRecord
// ---------------------------------------------------------------------------

/// Tracker status of a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillStatus {
    Matched,
    Gap,
}

impl SkillStatus {
    pub fn from_gap(is_gap: bool) -> Self {
        if is_gap { Self::Gap } else { Self::Matched }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matched => "Matched",
            Self::Gap => "Gap",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Matched" => Some(Self::Matched),
            "Gap" => Some(Self::Gap),
            _ => None,
        }
    }
}

/// Study priority of a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Low,
}

impl Priority {
    pub fn from_gap(is_gap: bool) -> Self {
        if is_gap { Self::High } else { Self::Low }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Low => "Low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "High" => Some(Self::High),
            "Low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// A row of the skill tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRecord {
    /// Store-assigned record id.
    pub id: String,
    /// Skill name; unique case-insensitively.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SkillStatus>,
    /// Number of distinct sources. Always `sources.len()` after a write.
    pub frequency: u32,
    /// Ordered set of source labels.
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub roadmap: String,
}

impl SkillRecord {
    /// Roadmap note written when a skill is first recorded.
    pub fn roadmap_note(is_gap: bool) -> &'static str {
        if is_gap {
            "Learning required (Auto-detected)."
        } else {
            "Core strength."
        }
    }

    /// Parse a stored comma-separated source list into an ordered set.
    pub fn parse_sources(text: &str) -> Vec<String> {
        let mut sources: Vec<String> = Vec::new();
        for s in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if !sources.iter().any(|existing| existing == s) {
                sources.push(s.to_string());
            }
        }
        sources
    }

    /// Render the source list the way it is stored.
    pub fn sources_text(&self) -> String {
        self.sources.join(", ")
    }

    pub fn has_source(&self, source: &SourceLabel) -> bool {
        self.sources.iter().any(|s| s == source.as_str())
    }

    /// Key used for case-insensitive name matching.
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }
}

// ---------------------------------------------------------------------------
// InboxItem
// ---------------------------------------------------------------------------

/// Processing status of an inbox entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InboxStatus {
    New,
    Processed,
    Error,
}

impl InboxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Processed => "Processed",
            Self::Error => "Error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "New" => Some(Self::New),
            "Processed" => Some(Self::Processed),
            "Error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// A queued job posting waiting to be processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboxItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// `None` when the status column is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InboxStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl InboxItem {
    /// Display title, `Untitled` when the name column is empty.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or("Untitled")
    }

    /// URL to fetch: the URL column, else the title when the user pasted
    /// the link into the name column.
    pub fn target_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .or_else(|| self.title.as_deref().map(str::trim).filter(|t| !t.is_empty()))
    }
}
