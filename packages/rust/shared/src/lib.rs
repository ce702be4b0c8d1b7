//! Shared types, error model, and configuration for upskill.
//!
//! This crate is the foundation depended on by all other upskill crates.
//! It provides:
//! - [`UpskillError`] — the unified error type
//! - Domain types ([`SkillRecord`], [`InboxItem`], [`SourceLabel`], [`Document`])
//! - Configuration ([`AppConfig`], [`SkillLists`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AmbiguousHeaders, AppConfig, DEFAULT_BLOCKLIST, FetchConfig, SkillLists, SkillsConfig,
    StoreConfig, StoreCredentials, config_dir, config_file_path, init_config, load_config,
    load_config_from,
};
pub use error::{Result, UpskillError};
pub use types::{
    Document, InboxItem, InboxStatus, Priority, SkillRecord, SkillStatus, SourceLabel,
};
