//! Skill-tracking pipeline for upskill.
//!
//! This crate ties extraction, gap classification, and tracker
//! reconciliation into the two entry points the CLI exposes: a single manual
//! document and a pass over the job inbox.

pub mod batch;
pub mod gap;
pub mod reconcile;

pub use batch::{
    InboxItemReport, InboxReport, ManualOutcome, Pipeline, ProgressReporter, RunReport,
    SilentProgress, SkillOutcome,
};
pub use gap::KnownSkills;
pub use reconcile::{ReconcileOutcome, Reconciler, SkillIndex};
