//! Theme-font purging
//!
//! Word resolves a theme reference (`w:asciiTheme="minorHAnsi"`) before the
//! explicit family next to it, so setting `w:ascii` alone does not change the
//! rendered font. Purging sets the family for every script and drops the
//! theme references.

use crate::document::{Paragraph, Run, RunProperties, Style};

/// A node that can carry font properties
#[derive(Debug)]
pub enum FontNode<'a> {
    /// Style definition: its `w:rPr`
    Style(&'a mut Style),
    /// Paragraph: its paragraph-mark `w:pPr/w:rPr`
    Paragraph(&'a mut Paragraph),
    /// Run: its `w:rPr`
    Run(&'a mut Run),
}

impl FontNode<'_> {
    /// Font properties of the node, created if absent. `None` for nodes
    /// without a font facet (numbering styles).
    pub fn font_properties(&mut self) -> Option<&mut RunProperties> {
        match self {
            FontNode::Style(style) if !style.has_font_facet() => None,
            FontNode::Style(style) => Some(style.run_properties_mut()),
            FontNode::Paragraph(para) => Some(para.mark_properties_mut()),
            FontNode::Run(run) => Some(run.properties.get_or_insert_with(Default::default)),
        }
    }
}

/// Result of purging one node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeOutcome {
    /// Explicit family set, theme references removed
    Purged,
    /// The node cannot carry fonts; left unchanged
    Unsupported,
}

/// Force `target_font` on every script category of `node` and remove its
/// theme font references.
pub fn purge_theme_font(node: &mut FontNode<'_>, target_font: &str) -> PurgeOutcome {
    let Some(props) = node.font_properties() else {
        return PurgeOutcome::Unsupported;
    };

    let fonts = props.fonts_mut();
    fonts.set_all_families(target_font);
    fonts.clear_theme_refs();
    PurgeOutcome::Purged
}
