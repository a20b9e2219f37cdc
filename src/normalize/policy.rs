//! Which styles and runs are exempt from rewriting

use std::collections::BTreeSet;

/// Fonts whose glyphs are pictographs; changing the family changes the symbol.
pub const SYMBOL_FONTS: &[&str] = &[
    "Symbol",
    "Webdings",
    "Wingdings",
    "Wingdings 2",
    "Wingdings 3",
    "MT Extra",
];

/// Table-of-contents styles are named "TOC 1".."TOC 9" (stored as "toc 1").
const TOC_PREFIX: &str = "toc";

/// Whether `font` is one of [`SYMBOL_FONTS`]
pub fn is_symbol_font(font: &str) -> bool {
    SYMBOL_FONTS.contains(&font)
}

/// Whether a style name belongs to a table-of-contents style
pub fn is_toc_style(name: &str) -> bool {
    let (Some(prefix), Some(rest)) = (name.get(..TOC_PREFIX.len()), name.get(TOC_PREFIX.len()..))
    else {
        return false;
    };
    prefix.eq_ignore_ascii_case(TOC_PREFIX)
        && rest
            .chars()
            .next()
            .map_or(true, |c| c == ' ' || c.is_ascii_digit())
}

/// Style names (UI names) exempt from font and size rewriting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipSet {
    names: BTreeSet<String>,
}

impl SkipSet {
    /// Empty set: nothing is protected
    pub fn empty() -> Self {
        Self {
            names: BTreeSet::new(),
        }
    }

    /// Add a style name
    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// Whether `name` is protected
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Protected names in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for SkipSet {
    /// Captions and the title keep their formatting.
    fn default() -> Self {
        ["Caption", "Title"].into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for SkipSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}
