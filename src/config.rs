//! JSON configuration for a normalization run
//!
//! ```json
//! {
//!   "rules": { "font_family": "Times New Roman", "font_size_pt": 12,
//!              "line_spacing": 2.0,
//!              "margins_inch": { "top": 1, "bottom": 1, "left": 1, "right": 1 } },
//!   "protected_styles": ["Caption", "Title"],
//!   "word_count_scope": "top_level"
//! }
//! ```
//!
//! Every key is optional.

use crate::error::Result;
use crate::normalize::{Normalizer, RuleSet, SkipSet};
use crate::quota::WordCountScope;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Rules, protected styles and word-count scope for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Target formatting
    pub rules: RuleSet,

    /// Style names exempt from font and size rewriting
    pub protected_styles: Vec<String>,

    /// Which paragraphs count towards the word quota
    pub word_count_scope: WordCountScope,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            rules: RuleSet::default(),
            protected_styles: SkipSet::default().iter().map(str::to_string).collect(),
            word_count_scope: WordCountScope::default(),
        }
    }
}

impl NormalizeConfig {
    /// Manuscript defaults: Times New Roman 12pt, double spacing, 1in margins
    pub fn manuscript_default() -> Self {
        Self {
            rules: RuleSet::manuscript(),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.rules.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Protected styles as a skip set
    pub fn skip_set(&self) -> SkipSet {
        self.protected_styles.iter().cloned().collect()
    }

    /// Normalizer for these rules
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.rules.clone(), self.skip_set())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::normalize::Margins;

    #[test]
    fn test_parse_full_config() {
        let config = NormalizeConfig::from_json_str(
            r#"{
                "rules": { "font_family": "Times New Roman", "font_size_pt": 12,
                           "line_spacing": 2.0,
                           "margins_inch": {"top": 1, "bottom": 1, "left": 1.25, "right": 1.25} },
                "protected_styles": ["Caption"],
                "word_count_scope": "include_tables"
            }"#,
        )
        .unwrap();

        assert_eq!(config.rules.font_family(), Some("Times New Roman"));
        assert_eq!(config.rules.font_size_pt, Some(12.0));
        assert_eq!(config.rules.margins_inch.unwrap().left, 1.25);
        assert_eq!(config.word_count_scope, WordCountScope::IncludeTables);
        assert!(config.skip_set().contains("Caption"));
        assert!(!config.skip_set().contains("Title"));
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config = NormalizeConfig::from_json_str("{}").unwrap();
        assert_eq!(config, NormalizeConfig::default());
        assert!(config.rules.is_empty());
        assert_eq!(config.skip_set(), SkipSet::default());
        assert_eq!(config.word_count_scope, WordCountScope::TopLevel);
    }

    #[test]
    fn test_manuscript_default() {
        let config = NormalizeConfig::manuscript_default();
        assert_eq!(config.rules.line_spacing, Some(2.0));
        assert_eq!(config.rules.margins_inch, Some(Margins::uniform(1.0)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = NormalizeConfig::from_json_str(r#"{"rules": {"font_size_pt": -3}}"#);
        assert!(matches!(err, Err(Error::InvalidRule(_))));

        let err = NormalizeConfig::from_json_str(r#"{"rules": {"font_size_pt": "big"}}"#);
        assert!(matches!(err, Err(Error::Config(_))));
    }
}
