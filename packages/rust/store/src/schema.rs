//! Column layout of the tracker and inbox databases, and the mapping between
//! [`Record`]s and domain types.

use upskill_shared::{InboxItem, InboxStatus, Priority, SkillRecord, SkillStatus, SourceLabel};

use crate::{Fields, PropertyValue, Record, RecordFilter};

/// Longest single rich-text fragment the store accepts. Longer values are
/// written as several fragments.
pub const MAX_TEXT_LEN: usize = 2000;

pub mod tracker {
    pub const SKILL: &str = "Skill";
    pub const STATUS: &str = "Status";
    pub const FREQUENCY: &str = "Frequency";
    pub const SOURCES: &str = "Sources";
    pub const PRIORITY: &str = "Priority";
    pub const ROADMAP: &str = "Roadmap";
}

pub mod inbox {
    pub const NAME: &str = "Name";
    pub const URL: &str = "URL";
    pub const STATUS: &str = "Status";
    pub const SKILLS_FOUND: &str = "Skills Found";
}

/// Clamp a display-only rich-text value to [`MAX_TEXT_LEN`] characters.
/// Never used for source lists, which must round-trip intact.
pub fn clamp_text(text: &str) -> String {
    text.chars().take(MAX_TEXT_LEN).collect()
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Read a tracker record. Missing columns map to empty values.
pub fn skill_from_record(record: &Record) -> SkillRecord {
    let sources = SkillRecord::parse_sources(record.text(tracker::SOURCES).unwrap_or(""));
    let frequency = record
        .number(tracker::FREQUENCY)
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n as u32)
        .unwrap_or(sources.len() as u32);

    SkillRecord {
        id: record.id.clone(),
        name: record.text(tracker::SKILL).unwrap_or("").to_string(),
        status: record.text(tracker::STATUS).and_then(SkillStatus::parse),
        frequency,
        sources,
        priority: record.text(tracker::PRIORITY).and_then(Priority::parse),
        roadmap: record.text(tracker::ROADMAP).unwrap_or("").to_string(),
    }
}

/// Properties for a skill seen for the first time.
pub fn new_skill_fields(name: &str, is_gap: bool, source: &SourceLabel) -> Fields {
    let mut fields = Fields::new();
    fields.insert(tracker::SKILL.into(), PropertyValue::Title(name.to_string()));
    fields.insert(
        tracker::STATUS.into(),
        PropertyValue::Select(Some(SkillStatus::from_gap(is_gap).as_str().into())),
    );
    fields.insert(tracker::FREQUENCY.into(), PropertyValue::Number(Some(1.0)));
    fields.insert(
        tracker::SOURCES.into(),
        PropertyValue::Text(source.as_str().to_string()),
    );
    fields.insert(
        tracker::PRIORITY.into(),
        PropertyValue::Select(Some(Priority::from_gap(is_gap).as_str().into())),
    );
    fields.insert(
        tracker::ROADMAP.into(),
        PropertyValue::Text(SkillRecord::roadmap_note(is_gap).into()),
    );
    fields
}

/// Properties written when a skill gains a new source.
pub fn source_update_fields(record: &SkillRecord) -> Fields {
    let mut fields = Fields::new();
    fields.insert(
        tracker::FREQUENCY.into(),
        PropertyValue::Number(Some(f64::from(record.frequency))),
    );
    fields.insert(
        tracker::SOURCES.into(),
        PropertyValue::Text(record.sources_text()),
    );
    fields
}

// ---------------------------------------------------------------------------
// Inbox
// ---------------------------------------------------------------------------

/// Items still waiting: status `New` or empty.
pub fn pending_inbox_filter() -> RecordFilter {
    RecordFilter::Or(vec![
        RecordFilter::SelectEquals {
            property: inbox::STATUS.into(),
            value: InboxStatus::New.as_str().into(),
        },
        RecordFilter::SelectIsEmpty {
            property: inbox::STATUS.into(),
        },
    ])
}

pub fn inbox_item_from_record(record: &Record) -> InboxItem {
    InboxItem {
        id: record.id.clone(),
        title: record.text(inbox::NAME).map(String::from),
        url: record.text(inbox::URL).map(String::from),
        status: record.text(inbox::STATUS).and_then(InboxStatus::parse),
        summary: record.text(inbox::SKILLS_FOUND).map(String::from),
    }
}

/// Terminal status and summary for a processed item.
pub fn inbox_result_fields(status: InboxStatus, summary: &str) -> Fields {
    let mut fields = Fields::new();
    fields.insert(
        inbox::STATUS.into(),
        PropertyValue::Select(Some(status.as_str().into())),
    );
    fields.insert(
        inbox::SKILLS_FOUND.into(),
        PropertyValue::Text(clamp_text(summary)),
    );
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_skill_fields_roundtrip() {
        let source = SourceLabel::new("https://jobs.example.com/1");
        let record = Record {
            id: "p1".into(),
            properties: new_skill_fields("Kafka", true, &source),
        };
        let skill = skill_from_record(&record);
        assert_eq!(skill.name, "Kafka");
        assert_eq!(skill.status, Some(SkillStatus::Gap));
        assert_eq!(skill.priority, Some(Priority::High));
        assert_eq!(skill.frequency, 1);
        assert_eq!(skill.sources, vec!["https://jobs.example.com/1"]);
        assert_eq!(skill.roadmap, "Learning required (Auto-detected).");
    }

    #[test]
    fn known_skill_is_low_priority_core_strength() {
        let record = Record {
            id: "p2".into(),
            properties: new_skill_fields("SQL", false, &SourceLabel::new("x")),
        };
        let skill = skill_from_record(&record);
        assert_eq!(skill.status, Some(SkillStatus::Matched));
        assert_eq!(skill.priority, Some(Priority::Low));
        assert_eq!(skill.roadmap, "Core strength.");
    }

    #[test]
    fn missing_frequency_falls_back_to_source_count() {
        let mut properties = Fields::new();
        properties.insert(tracker::SKILL.into(), PropertyValue::Title("Go".into()));
        properties.insert(tracker::SOURCES.into(), PropertyValue::Text("a, b".into()));
        let skill = skill_from_record(&Record {
            id: "p3".into(),
            properties,
        });
        assert_eq!(skill.frequency, 2);
        assert_eq!(skill.status, None);
    }

    #[test]
    fn long_source_lists_are_written_whole() {
        let sources: Vec<String> = (0..80)
            .map(|i| format!("https://jobs.example.com/postings/{i:04}"))
            .collect();
        let record = SkillRecord {
            id: "p4".into(),
            name: "SQL".into(),
            status: None,
            frequency: sources.len() as u32,
            sources: sources.clone(),
            priority: None,
            roadmap: String::new(),
        };
        let fields = source_update_fields(&record);
        let text = fields[tracker::SOURCES].as_text().unwrap();
        assert!(text.chars().count() > MAX_TEXT_LEN);
        assert_eq!(SkillRecord::parse_sources(text), sources);
    }

    #[test]
    fn long_summaries_are_clamped() {
        let summary = "x".repeat(MAX_TEXT_LEN + 50);
        let fields = inbox_result_fields(InboxStatus::Processed, &summary);
        let text = fields[inbox::SKILLS_FOUND].as_text().unwrap();
        assert_eq!(text.chars().count(), MAX_TEXT_LEN);
    }

    #[test]
    fn inbox_item_mapping() {
        let mut properties = Fields::new();
        properties.insert(inbox::NAME.into(), PropertyValue::Title("Analyst".into()));
        properties.insert(
            inbox::URL.into(),
            PropertyValue::Url(Some("https://jobs.example.com/7".into())),
        );
        properties.insert(inbox::STATUS.into(), PropertyValue::Select(None));
        let item = inbox_item_from_record(&Record {
            id: "i1".into(),
            properties,
        });
        assert_eq!(item.title.as_deref(), Some("Analyst"));
        assert_eq!(item.target_url(), Some("https://jobs.example.com/7"));
        assert_eq!(item.status, None);
        assert!(pending_inbox_filter().matches(&Record {
            id: "i1".into(),
            properties: Fields::new(),
        }));
    }
}
