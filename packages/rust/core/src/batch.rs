//! Manual and inbox drivers: document in, tracker mutations out.

use chrono::Local;
use serde::Serialize;
use tracing::{info, instrument, warn};
use url::Url;

use upskill_extract::SkillExtractor;
use upskill_fetcher::Fetcher;
use upskill_shared::{Document, InboxItem, InboxStatus, Result, SourceLabel, UpskillError};
use upskill_store::{Collection, RecordStore, schema};

use crate::gap::KnownSkills;
use crate::reconcile::{ReconcileOutcome, Reconciler};

/// Summary written for an inbox item whose URL cannot be fetched.
pub const INVALID_URL: &str = "Invalid URL";

/// Summary written for an inbox item with no skills.
pub const NO_SKILLS: &str = "No skills detected";

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// One skill and what reconciling it did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillOutcome {
    pub skill: String,
    pub is_gap: bool,
    pub outcome: ReconcileOutcome,
}

/// Result of processing one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub source: SourceLabel,
    pub skills: Vec<SkillOutcome>,
}

impl RunReport {
    fn count(&self, pred: impl Fn(&ReconcileOutcome) -> bool) -> usize {
        self.skills.iter().filter(|s| pred(&s.outcome)).count()
    }

    pub fn created(&self) -> usize {
        self.count(|o| *o == ReconcileOutcome::Created)
    }

    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, ReconcileOutcome::Updated { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| *o == ReconcileOutcome::Skipped)
    }

    /// Skills that were not recorded because of a store failure.
    pub fn not_recorded(&self) -> usize {
        self.count(|o| matches!(o, ReconcileOutcome::Unavailable | ReconcileOutcome::Failed))
    }

    pub fn gaps(&self) -> impl Iterator<Item = &str> {
        self.skills
            .iter()
            .filter(|s| s.is_gap)
            .map(|s| s.skill.as_str())
    }
}

/// Outcome of a manual invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ManualOutcome {
    Completed(RunReport),
    /// The site refused automated access; the user should paste the text.
    BotBlocked { url: String },
    NoSkills,
}

/// What happened to one inbox item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InboxItemReport {
    pub id: String,
    pub title: String,
    pub status: InboxStatus,
    pub summary: String,
    /// `false` when the terminal status could not be written back.
    pub status_written: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<RunReport>,
}

/// Result of one inbox pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InboxReport {
    pub items: Vec<InboxItemReport>,
}

impl InboxReport {
    pub fn processed(&self) -> usize {
        self.with_status(InboxStatus::Processed)
    }

    pub fn errored(&self) -> usize {
        self.with_status(InboxStatus::Error)
    }

    fn with_status(&self, status: InboxStatus) -> usize {
        self.items.iter().filter(|i| i.status == status).count()
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Progress callback for the drivers.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before each inbox item.
    fn item(&self, current: usize, total: usize, title: &str);
    /// Called after each skill is reconciled.
    fn skill(&self, outcome: &SkillOutcome);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn item(&self, _current: usize, _total: usize, _title: &str) {}
    fn skill(&self, _outcome: &SkillOutcome) {}
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Everything a run needs, built once and passed to both drivers.
pub struct Pipeline<'a> {
    pub extractor: &'a SkillExtractor,
    pub known: &'a KnownSkills,
    pub fetcher: &'a dyn Fetcher,
    pub store: &'a dyn RecordStore,
}

impl Pipeline<'_> {
    /// Process one command-line input: a URL to fetch, or posting text.
    ///
    /// A bot block is reported as [`ManualOutcome::BotBlocked`]; any other
    /// fetch failure is returned as an error.
    #[instrument(skip_all)]
    pub async fn run_manual(
        &self,
        input: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<ManualOutcome> {
        let input = input.trim();

        let document = if is_url(input) {
            let url = Url::parse(input)
                .map_err(|e| UpskillError::validation(format!("invalid URL '{input}': {e}")))?;
            progress.phase("Fetching posting");
            let text = match self.fetcher.fetch(&url).await {
                Ok(text) => text,
                Err(e) if e.is_bot_block() => {
                    warn!(url = input, "posting is behind bot protection");
                    return Ok(ManualOutcome::BotBlocked {
                        url: input.to_string(),
                    });
                }
                Err(e) => return Err(e),
            };
            Document::new(text, SourceLabel::new(input))
        } else {
            Document::new(input, SourceLabel::manual_paste(Local::now().date_naive()))
        };

        progress.phase("Extracting skills");
        let skills = self.extractor.extract(&document.text);
        if skills.is_empty() {
            info!("no skills detected");
            return Ok(ManualOutcome::NoSkills);
        }

        let report = self.record(&skills, &document.source, progress).await;
        Ok(ManualOutcome::Completed(report))
    }

    /// Process every inbox item whose status is `New` or empty, writing a
    /// terminal status back to each one.
    #[instrument(skip_all)]
    pub async fn run_inbox(&self, progress: &dyn ProgressReporter) -> InboxReport {
        progress.phase("Checking inbox");

        let filter = schema::pending_inbox_filter();
        let items: Vec<InboxItem> = match self
            .store
            .query_records(Collection::Inbox, Some(&filter))
            .await
        {
            Ok(records) => records.iter().map(schema::inbox_item_from_record).collect(),
            Err(e) => {
                warn!(error = %e, "inbox query failed, nothing to process");
                Vec::new()
            }
        };

        info!(count = items.len(), "pending inbox items");

        let mut report = InboxReport::default();
        let total = items.len();

        for (i, item) in items.iter().enumerate() {
            let title = item.display_title().to_string();
            progress.item(i + 1, total, &title);

            let (status, summary, run) = self.process_item(item, &title, progress).await;

            let fields = schema::inbox_result_fields(status, &summary);
            let status_written = match self.store.update_record(&item.id, fields).await {
                Ok(_) => true,
                Err(e) => {
                    warn!(item = %item.id, error = %e, "failed to write inbox status");
                    false
                }
            };

            info!(item = %item.id, title = %title, status = status.as_str(), "inbox item done");
            report.items.push(InboxItemReport {
                id: item.id.clone(),
                title,
                status,
                summary,
                status_written,
                run,
            });
        }

        report
    }

    async fn process_item(
        &self,
        item: &InboxItem,
        title: &str,
        progress: &dyn ProgressReporter,
    ) -> (InboxStatus, String, Option<RunReport>) {
        let Some(url) = item.target_url().and_then(http_url) else {
            warn!(item = %item.id, "inbox item has no usable URL");
            return (InboxStatus::Error, INVALID_URL.to_string(), None);
        };

        let text = match self.fetcher.fetch(&url).await {
            Ok(text) => text,
            Err(e) => {
                warn!(item = %item.id, error = %e, "fetch failed");
                return (InboxStatus::Error, format!("Error: {e}"), None);
            }
        };

        let skills = self.extractor.extract(&text);
        if skills.is_empty() {
            return (InboxStatus::Processed, NO_SKILLS.to_string(), None);
        }

        let source = SourceLabel::inbox(title);
        let run = self.record(&skills, &source, progress).await;
        (InboxStatus::Processed, skills.join(", "), Some(run))
    }

    /// Classify and reconcile `skills` in order against a fresh tracker
    /// snapshot.
    async fn record(
        &self,
        skills: &[String],
        source: &SourceLabel,
        progress: &dyn ProgressReporter,
    ) -> RunReport {
        progress.phase("Updating tracker");
        let mut reconciler = Reconciler::load(self.store).await;

        let mut outcomes = Vec::with_capacity(skills.len());
        for skill in skills {
            let is_gap = self.known.is_gap(skill);
            let outcome = SkillOutcome {
                skill: skill.clone(),
                is_gap,
                outcome: reconciler.reconcile(skill, is_gap, source).await,
            };
            progress.skill(&outcome);
            outcomes.push(outcome);
        }

        RunReport {
            source: source.clone(),
            skills: outcomes,
        }
    }
}

/// Manual inputs starting with `http` are treated as URLs.
fn is_url(input: &str) -> bool {
    input.trim_start().starts_with("http")
}

fn http_url(raw: &str) -> Option<Url> {
    if !raw.starts_with("http") {
        return None;
    }
    Url::parse(raw)
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
}
