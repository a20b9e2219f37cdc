//! # manuscript-format
//!
//! Normalizes the formatting of DOCX manuscripts: fonts, sizes, line
//! spacing and page margins are rewritten to a rule set while protected
//! styles, symbol-font runs and equations keep their look.
//!
//! ## Features
//!
//! - Round-trip preservation (unknown elements and package entries are kept intact)
//! - Theme font purging, so explicit fonts are not overridden by the document theme
//! - Recursive coverage of nested tables
//! - Word counting and a quota-gated processing service
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use manuscript_format::{apply_rules, Document, RuleSet, SkipSet};
//!
//! let mut doc = Document::open("draft.docx")?;
//! let report = apply_rules(&mut doc, &RuleSet::manuscript(), &SkipSet::default())?;
//! println!("{}", report);
//! doc.save("formatted.docx")?;
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod normalize;
pub mod package;
pub mod quota;
pub mod xml;

pub use config::NormalizeConfig;
pub use document::{Document, Paragraph, Run, Style, Styles, Table};
pub use error::{Error, Result};
pub use normalize::{
    apply_rules, purge_theme_font, FontNode, Margins, NormalizeReport, Normalizer, PurgeOutcome,
    RuleSet, SkipSet,
};
pub use package::Package;
pub use quota::{
    estimate_pages, word_count, InMemoryUsageStore, ManuscriptService, ProcessedManuscript,
    UsageProfile, UsageStore, WordCountScope,
};
