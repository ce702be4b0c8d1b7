//! Record-store access for the skill tracker and the job inbox.
//!
//! The [`RecordStore`] trait is the only way the pipeline touches persisted
//! state: query, create, and update over two collections. Records carry typed
//! property values; [`schema`] maps them to and from domain types.
//!
//! Implementations:
//! - [`NotionStore`] — Notion database REST API
//! - [`MemoryStore`] — in-process store with the same filter semantics
//!
//! There is no transactional isolation: every call is an independent round
//! trip, and two overlapping runs can race between a query and the write
//! that follows it.

mod memory;
mod notion;
pub mod schema;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use upskill_shared::Result;

pub use memory::MemoryStore;
pub use notion::NotionStore;

// ---------------------------------------------------------------------------
// Record model
// ---------------------------------------------------------------------------

/// The two collections the pipeline reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Collection {
    /// Skill tracker rows.
    Tracker,
    /// Queued job postings.
    Inbox,
}

/// A typed property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    Title(String),
    Text(String),
    Number(Option<f64>),
    Select(Option<String>),
    Url(Option<String>),
}

impl PropertyValue {
    /// String content of title, text, select, and url values.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Title(s) | Self::Text(s) => Some(s.as_str()),
            Self::Select(s) | Self::Url(s) => s.as_deref(),
            Self::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => *n,
            _ => None,
        }
    }
}

/// Property name → value.
pub type Fields = BTreeMap<String, PropertyValue>;

/// A stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub properties: Fields,
}

impl Record {
    /// Non-empty string content of a property.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.properties
            .get(name)
            .and_then(PropertyValue::as_text)
            .filter(|s| !s.is_empty())
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.properties.get(name).and_then(PropertyValue::as_number)
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Server-side query filter.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordFilter {
    /// Select property equals `value`.
    SelectEquals { property: String, value: String },
    /// Select property has no value.
    SelectIsEmpty { property: String },
    /// Any of the inner filters matches.
    Or(Vec<RecordFilter>),
}

impl RecordFilter {
    /// Evaluate the filter locally.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::SelectEquals { property, value } => {
                record.text(property) == Some(value.as_str())
            }
            Self::SelectIsEmpty { property } => record.text(property).is_none(),
            Self::Or(filters) => filters.iter().any(|f| f.matches(record)),
        }
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Generic query/create/update service over the tracker and inbox.
///
/// Every method may fail with [`upskill_shared::UpskillError::Store`] on a
/// transport or parse failure; callers log it and treat the call as a no-op.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records of `collection` matching `filter` (all records if `None`).
    async fn query_records(
        &self,
        collection: Collection,
        filter: Option<&RecordFilter>,
    ) -> Result<Vec<Record>>;

    /// Create a record and return it as stored.
    async fn create_record(&self, collection: Collection, fields: Fields) -> Result<Record>;

    /// Overwrite the given properties of record `id` and return it as stored.
    async fn update_record(&self, id: &str, fields: Fields) -> Result<Record>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: Option<&str>) -> Record {
        let mut properties = Fields::new();
        properties.insert(
            "Status".into(),
            PropertyValue::Select(status.map(String::from)),
        );
        properties.insert("Name".into(), PropertyValue::Title("Job".into()));
        Record {
            id: "r1".into(),
            properties,
        }
    }

    #[test]
    fn select_filters() {
        let eq_new = RecordFilter::SelectEquals {
            property: "Status".into(),
            value: "New".into(),
        };
        let empty = RecordFilter::SelectIsEmpty {
            property: "Status".into(),
        };
        let either = RecordFilter::Or(vec![eq_new.clone(), empty.clone()]);

        assert!(eq_new.matches(&record(Some("New"))));
        assert!(!eq_new.matches(&record(Some("Processed"))));
        assert!(empty.matches(&record(None)));
        assert!(empty.matches(&record(Some(""))));
        assert!(either.matches(&record(None)));
        assert!(!either.matches(&record(Some("Error"))));
    }

    #[test]
    fn record_accessors() {
        let mut r = record(Some("New"));
        r.properties
            .insert("Frequency".into(), PropertyValue::Number(Some(3.0)));
        assert_eq!(r.text("Name"), Some("Job"));
        assert_eq!(r.number("Frequency"), Some(3.0));
        assert_eq!(r.number("Name"), None);
        assert_eq!(r.text("Missing"), None);
    }
}
