//! In-process [`RecordStore`] used in tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use upskill_shared::{Result, UpskillError};

use crate::{Collection, Fields, Record, RecordFilter, RecordStore};

#[derive(Default)]
struct Inner {
    collections: BTreeMap<Collection, Vec<Record>>,
    writes: usize,
}

/// Records held in memory, with switches to simulate an unreachable backend.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    fail_queries: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record directly, bypassing the write counter. Returns its id.
    pub async fn seed(&self, collection: Collection, properties: Fields) -> String {
        let id = Uuid::now_v7().to_string();
        let mut inner = self.inner.lock().await;
        inner
            .collections
            .entry(collection)
            .or_default()
            .push(Record {
                id: id.clone(),
                properties,
            });
        id
    }

    /// Snapshot of a collection in insertion order.
    pub async fn records(&self, collection: Collection) -> Vec<Record> {
        let inner = self.inner.lock().await;
        inner.collections.get(&collection).cloned().unwrap_or_default()
    }

    /// Number of successful create and update calls.
    pub async fn write_count(&self) -> usize {
        self.inner.lock().await.writes
    }

    pub fn set_fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writes(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(UpskillError::Store("write rejected".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn query_records(
        &self,
        collection: Collection,
        filter: Option<&RecordFilter>,
    ) -> Result<Vec<Record>> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(UpskillError::Store("query unavailable".into()));
        }

        let inner = self.inner.lock().await;
        let records = inner
            .collections
            .get(&collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| filter.is_none_or(|f| f.matches(r)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(records)
    }

    async fn create_record(&self, collection: Collection, fields: Fields) -> Result<Record> {
        self.check_writes()?;

        let record = Record {
            id: Uuid::now_v7().to_string(),
            properties: fields,
        };
        let mut inner = self.inner.lock().await;
        inner
            .collections
            .entry(collection)
            .or_default()
            .push(record.clone());
        inner.writes += 1;
        Ok(record)
    }

    async fn update_record(&self, id: &str, fields: Fields) -> Result<Record> {
        self.check_writes()?;

        let mut inner = self.inner.lock().await;
        let record = inner
            .collections
            .values_mut()
            .flat_map(|records| records.iter_mut())
            .find(|r| r.id == id)
            .ok_or_else(|| UpskillError::Store(format!("no record with id {id}")))?;
        record.properties.extend(fields);
        let updated = record.clone();
        inner.writes += 1;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PropertyValue;

    fn status(value: Option<&str>) -> Fields {
        let mut fields = Fields::new();
        fields.insert(
            "Status".into(),
            PropertyValue::Select(value.map(String::from)),
        );
        fields
    }

    #[tokio::test]
    async fn query_applies_filter_per_collection() {
        let store = MemoryStore::new();
        store.seed(Collection::Inbox, status(Some("New"))).await;
        store.seed(Collection::Inbox, status(Some("Processed"))).await;
        store.seed(Collection::Inbox, status(None)).await;
        store.seed(Collection::Tracker, status(Some("New"))).await;

        let filter = crate::schema::pending_inbox_filter();
        let pending = store
            .query_records(Collection::Inbox, Some(&filter))
            .await
            .unwrap();
        assert_eq!(pending.len(), 2);

        let all = store.query_records(Collection::Tracker, None).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(store.write_count().await, 0);
    }

    #[tokio::test]
    async fn update_merges_properties() {
        let store = MemoryStore::new();
        let id = store.seed(Collection::Inbox, status(Some("New"))).await;

        let mut fields = status(Some("Processed"));
        fields.insert("Skills Found".into(), PropertyValue::Text("Kafka".into()));
        let updated = store.update_record(&id, fields).await.unwrap();

        assert_eq!(updated.text("Status"), Some("Processed"));
        assert_eq!(updated.text("Skills Found"), Some("Kafka"));
        assert_eq!(store.write_count().await, 1);
    }

    #[tokio::test]
    async fn failure_switches() {
        let store = MemoryStore::new();
        store.set_fail_queries(true);
        assert!(store.query_records(Collection::Tracker, None).await.is_err());

        store.set_fail_writes(true);
        assert!(
            store
                .create_record(Collection::Tracker, Fields::new())
                .await
                .is_err()
        );
        assert!(store.update_record("missing", Fields::new()).await.is_err());
        assert_eq!(store.write_count().await, 0);
    }
}
