//! Word-count quota and the manuscript processing service
//!
//! The normalizer never sees the quota. [`ManuscriptService`] counts the
//! words of an upload, checks them against the user's [`UsageProfile`] from a
//! [`UsageStore`], normalizes and records the usage.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::normalize::{walk_paragraphs, NormalizeReport, Normalizer};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Words per estimated manuscript page
pub const WORDS_PER_PAGE: u64 = 300;

/// Usage ratio from which a user is warned about the limit
pub const NEAR_LIMIT_RATIO: f64 = 0.9;

/// Which paragraphs count towards the word total
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordCountScope {
    /// Top-level body paragraphs only
    #[default]
    TopLevel,
    /// Body paragraphs plus paragraphs in table cells at any depth
    IncludeTables,
}

/// Count whitespace-separated words in the paragraphs selected by `scope`
pub fn word_count(document: &Document, scope: WordCountScope) -> u64 {
    let mut texts = Vec::new();
    match scope {
        WordCountScope::TopLevel => texts.extend(document.paragraphs().map(|p| p.text())),
        WordCountScope::IncludeTables => {
            walk_paragraphs(&document.body().content, &mut |p| texts.push(p.text()))
        }
    }
    texts.join(" ").split_whitespace().count() as u64
}

/// Estimated page count, never less than one
pub fn estimate_pages(words: u64) -> u64 {
    (words / WORDS_PER_PAGE).max(1)
}

/// A user's plan and consumption
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageProfile {
    pub words_used: u64,
    pub word_limit: u64,
    pub plan_type: String,
}

impl UsageProfile {
    pub fn new(plan_type: impl Into<String>, word_limit: u64) -> Self {
        Self {
            words_used: 0,
            word_limit,
            plan_type: plan_type.into(),
        }
    }

    /// Words left before the limit
    pub fn remaining(&self) -> u64 {
        self.word_limit.saturating_sub(self.words_used)
    }

    /// Used fraction of the limit; a zero limit counts as fully used
    pub fn usage_ratio(&self) -> f64 {
        if self.word_limit == 0 {
            return 1.0;
        }
        self.words_used as f64 / self.word_limit as f64
    }

    pub fn is_near_limit(&self) -> bool {
        self.usage_ratio() >= NEAR_LIMIT_RATIO
    }
}

/// Where usage profiles live
pub trait UsageStore {
    /// Current profile of a user
    fn get_usage(&self, user_id: &str) -> Result<UsageProfile>;

    /// Add `delta_words` to a user's consumption
    fn record_usage(&mut self, user_id: &str, delta_words: u64) -> Result<()>;
}

/// Map-backed [`UsageStore`]
#[derive(Debug, Clone, Default)]
pub struct InMemoryUsageStore {
    profiles: HashMap<String, UsageProfile>,
}

impl InMemoryUsageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a user's profile
    pub fn insert(&mut self, user_id: impl Into<String>, profile: UsageProfile) {
        self.profiles.insert(user_id.into(), profile);
    }
}

impl UsageStore for InMemoryUsageStore {
    fn get_usage(&self, user_id: &str) -> Result<UsageProfile> {
        self.profiles
            .get(user_id)
            .cloned()
            .ok_or_else(|| Error::UnknownUser(user_id.to_string()))
    }

    fn record_usage(&mut self, user_id: &str, delta_words: u64) -> Result<()> {
        let profile = self
            .profiles
            .get_mut(user_id)
            .ok_or_else(|| Error::UnknownUser(user_id.to_string()))?;
        profile.words_used = profile.words_used.saturating_add(delta_words);
        Ok(())
    }
}

/// Output of a processed upload
#[derive(Debug, Clone)]
pub struct ProcessedManuscript {
    /// Normalized `.docx`
    pub bytes: Vec<u8>,
    pub word_count: u64,
    pub estimated_pages: u64,
    pub report: NormalizeReport,
}

/// Quota-gated normalization of uploaded manuscripts
#[derive(Debug)]
pub struct ManuscriptService<S> {
    store: S,
    normalizer: Normalizer,
    scope: WordCountScope,
}

impl<S: UsageStore> ManuscriptService<S> {
    pub fn new(store: S, normalizer: Normalizer) -> Self {
        Self {
            store,
            normalizer,
            scope: WordCountScope::default(),
        }
    }

    /// Set which paragraphs are counted against the quota
    pub fn with_scope(mut self, scope: WordCountScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Normalize `docx` for `user_id` and charge its words to the user.
    ///
    /// Fails with [`Error::QuotaExceeded`] without recording anything when the
    /// document has more words than the user has left.
    pub fn process(&mut self, user_id: &str, docx: &[u8]) -> Result<ProcessedManuscript> {
        let mut document = Document::from_bytes(docx)?;
        let words = word_count(&document, self.scope);
        let profile = self.store.get_usage(user_id)?;

        if words > profile.remaining() {
            info!(
                "rejected {} words for '{}': {} remaining",
                words,
                user_id,
                profile.remaining()
            );
            return Err(Error::QuotaExceeded {
                requested: words,
                remaining: profile.remaining(),
            });
        }

        let report = self.normalizer.apply(&mut document)?;
        let bytes = document.to_bytes()?;
        self.store.record_usage(user_id, words)?;
        info!(
            "processed {} words (~{} pages) for '{}' on plan {}",
            words,
            estimate_pages(words),
            user_id,
            profile.plan_type
        );

        Ok(ProcessedManuscript {
            bytes,
            word_count: words,
            estimated_pages: estimate_pages(words),
            report,
        })
    }
}
