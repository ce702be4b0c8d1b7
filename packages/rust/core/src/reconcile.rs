//! Idempotent merge of skill observations into the tracker.
//!
//! A [`Reconciler`] is built per document: it queries the whole tracker once
//! into a [`SkillIndex`] keyed by normalized name, then turns each
//! `(skill, source)` observation into at most one create or update. Seeing the
//! same source twice never writes, so re-running a document is a no-op.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use upskill_shared::{Priority, Result, SkillRecord, SkillStatus, SourceLabel};
use upskill_store::{Collection, RecordStore, schema};

/// What a single reconcile call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// New tracker record with frequency 1.
    Created,
    /// Source appended; `frequency` is the new source count.
    Updated { frequency: u32 },
    /// Source already recorded for this skill.
    Skipped,
    /// The tracker could not be read for this document; nothing written.
    Unavailable,
    /// The create or update call failed.
    Failed,
}

// ---------------------------------------------------------------------------
// SkillIndex
// ---------------------------------------------------------------------------

/// Tracker records keyed by [`SkillRecord::normalize_name`].
#[derive(Debug, Clone, Default)]
pub struct SkillIndex {
    by_name: HashMap<String, SkillRecord>,
}

impl SkillIndex {
    /// Build from tracker records. With duplicate names the first record wins.
    pub fn from_records(records: impl IntoIterator<Item = SkillRecord>) -> Self {
        let mut by_name = HashMap::new();
        for record in records {
            let key = SkillRecord::normalize_name(&record.name);
            if key.is_empty() {
                continue;
            }
            by_name.entry(key).or_insert(record);
        }
        Self { by_name }
    }

    /// Query the whole tracker.
    pub async fn load(store: &dyn RecordStore) -> Result<Self> {
        let records = store.query_records(Collection::Tracker, None).await?;
        Ok(Self::from_records(
            records.iter().map(schema::skill_from_record),
        ))
    }

    pub fn get(&self, name: &str) -> Option<&SkillRecord> {
        self.by_name.get(&SkillRecord::normalize_name(name))
    }

    pub fn insert(&mut self, record: SkillRecord) {
        self.by_name
            .insert(SkillRecord::normalize_name(&record.name), record);
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Reconciler
// ---------------------------------------------------------------------------

/// Per-document reconciliation against one tracker snapshot.
pub struct Reconciler<'a> {
    store: &'a dyn RecordStore,
    /// `None` when the tracker could not be queried.
    index: Option<SkillIndex>,
}

impl<'a> Reconciler<'a> {
    /// Snapshot the tracker. A failed query is logged and leaves the
    /// reconciler unavailable for this document.
    pub async fn load(store: &'a dyn RecordStore) -> Self {
        let index = match SkillIndex::load(store).await {
            Ok(index) => {
                debug!(records = index.len(), "loaded skill index");
                Some(index)
            }
            Err(e) => {
                warn!(error = %e, "tracker unavailable, skills will not be recorded");
                None
            }
        };
        Self { store, index }
    }

    pub fn index(&self) -> Option<&SkillIndex> {
        self.index.as_ref()
    }

    /// Record that `skill` was seen in `source`.
    pub async fn reconcile(
        &mut self,
        skill: &str,
        is_gap: bool,
        source: &SourceLabel,
    ) -> ReconcileOutcome {
        let Some(index) = self.index.as_mut() else {
            warn!(skill, "skipping skill, tracker unavailable");
            return ReconcileOutcome::Unavailable;
        };

        match index.get(skill) {
            Some(existing) if existing.has_source(source) => {
                debug!(skill, %source, "source already recorded");
                ReconcileOutcome::Skipped
            }
            Some(existing) => {
                let mut updated = existing.clone();
                updated.sources.push(source.as_str().to_string());
                updated.frequency = updated.sources.len() as u32;

                match self
                    .store
                    .update_record(&updated.id, schema::source_update_fields(&updated))
                    .await
                {
                    Ok(_) => {
                        info!(skill, frequency = updated.frequency, "updated skill");
                        let frequency = updated.frequency;
                        index.insert(updated);
                        ReconcileOutcome::Updated { frequency }
                    }
                    Err(e) => {
                        warn!(skill, error = %e, "failed to update skill");
                        ReconcileOutcome::Failed
                    }
                }
            }
            None => {
                let fields = schema::new_skill_fields(skill, is_gap, source);
                match self.store.create_record(Collection::Tracker, fields).await {
                    Ok(created) => {
                        info!(skill, gap = is_gap, "created skill");
                        index.insert(SkillRecord {
                            id: created.id,
                            name: skill.to_string(),
                            status: Some(SkillStatus::from_gap(is_gap)),
                            frequency: 1,
                            sources: vec![source.as_str().to_string()],
                            priority: Some(Priority::from_gap(is_gap)),
                            roadmap: SkillRecord::roadmap_note(is_gap).to_string(),
                        });
                        ReconcileOutcome::Created
                    }
                    Err(e) => {
                        warn!(skill, error = %e, "failed to create skill");
                        ReconcileOutcome::Failed
                    }
                }
            }
        }
    }
}
