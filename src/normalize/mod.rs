//! Style normalization: rewrite fonts, sizes, line spacing and margins
//! across a document while leaving protected styles, symbol runs and math
//! alone.

mod policy;
mod purge;
mod rules;
mod walker;

pub use policy::{is_symbol_font, is_toc_style, SkipSet, SYMBOL_FONTS};
pub use purge::{purge_theme_font, FontNode, PurgeOutcome};
pub use rules::{Margins, RuleSet};
pub use walker::{walk_paragraphs, walk_paragraphs_mut};

use crate::document::{Document, Paragraph, Styles};
use crate::error::Result;
use log::{debug, info, warn};
use std::fmt;

/// What one normalization pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub styles_rewritten: usize,
    pub styles_protected: usize,
    /// Styles without a font facet (numbering styles)
    pub styles_unsupported: usize,
    pub sections_updated: usize,
    pub paragraphs_rewritten: usize,
    pub paragraphs_protected: usize,
    pub runs_rewritten: usize,
    /// Symbol-font and math runs left untouched
    pub runs_preserved: usize,
}

impl fmt::Display for NormalizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "styles: {} rewritten, {} protected, {} unsupported; sections: {}; \
             paragraphs: {} rewritten, {} protected; runs: {} rewritten, {} preserved",
            self.styles_rewritten,
            self.styles_protected,
            self.styles_unsupported,
            self.sections_updated,
            self.paragraphs_rewritten,
            self.paragraphs_protected,
            self.runs_rewritten,
            self.runs_preserved
        )
    }
}

/// A rule set and skip set bundled for repeated use
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    rules: RuleSet,
    skip: SkipSet,
}

impl Normalizer {
    pub fn new(rules: RuleSet, skip: SkipSet) -> Self {
        Self { rules, skip }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn skip_set(&self) -> &SkipSet {
        &self.skip
    }

    /// Normalize `document` in place
    pub fn apply(&self, document: &mut Document) -> Result<NormalizeReport> {
        apply_rules(document, &self.rules, &self.skip)
    }
}

/// Apply `rules` to the styles, sections and every paragraph of `document`.
///
/// Styles named in `skip_styles` keep their fonts unless they are
/// table-of-contents styles. Paragraphs whose style resolves to a name in
/// `skip_styles` are left entirely untouched. Runs in a symbol font or
/// carrying math markup keep their fonts and size.
///
/// Fails with [`Error::InvalidRule`](crate::Error::InvalidRule) before
/// touching the document when `rules` does not validate.
pub fn apply_rules(
    document: &mut Document,
    rules: &RuleSet,
    skip_styles: &SkipSet,
) -> Result<NormalizeReport> {
    rules.validate()?;
    let mut report = NormalizeReport::default();
    let font_family = rules.font_family();

    if let Some(family) = font_family {
        let size = rules.font_size_pt;
        normalize_styles(&mut document.styles, family, size, skip_styles, &mut report);
    }

    if let Some(margins) = &rules.margins_inch {
        for section in document.body.sections_mut() {
            section.set_margins_inch(margins.top, margins.bottom, margins.left, margins.right);
            report.sections_updated += 1;
        }
    }

    let styles = &document.styles;
    walk_paragraphs_mut(&mut document.body.content, &mut |para| {
        normalize_paragraph(para, styles, rules, skip_styles, &mut report);
    });

    info!("normalization finished: {}", report);
    Ok(report)
}

fn normalize_styles(
    styles: &mut Styles,
    family: &str,
    size_pt: Option<f32>,
    skip_styles: &SkipSet,
    report: &mut NormalizeReport,
) {
    for style in styles.iter_mut() {
        let name = style.ui_name().unwrap_or_default().to_string();
        if skip_styles.contains(&name) && !is_toc_style(&name) {
            debug!("style '{}' is protected", name);
            report.styles_protected += 1;
            continue;
        }

        let mut node = FontNode::Style(style);
        match purge_theme_font(&mut node, family) {
            PurgeOutcome::Purged => {
                if let (Some(size), Some(props)) = (size_pt, node.font_properties()) {
                    props.set_font_size_pt(size);
                }
                report.styles_rewritten += 1;
            }
            PurgeOutcome::Unsupported => {
                warn!("style '{}' has no font properties, skipped", name);
                report.styles_unsupported += 1;
            }
        }
    }
}

fn normalize_paragraph(
    para: &mut Paragraph,
    styles: &Styles,
    rules: &RuleSet,
    skip_styles: &SkipSet,
    report: &mut NormalizeReport,
) {
    let style_name = styles
        .paragraph_style_name(para.style())
        .map(str::to_string);
    if let Some(name) = style_name.filter(|n| skip_styles.contains(n)) {
        debug!("paragraph in protected style '{}' skipped", name);
        report.paragraphs_protected += 1;
        return;
    }

    let font_family = rules.font_family();
    if let Some(family) = font_family {
        purge_theme_font(&mut FontNode::Paragraph(&mut *para), family);
    }
    if let Some(multiple) = rules.line_spacing {
        para.set_line_spacing(multiple);
    }
    report.paragraphs_rewritten += 1;

    for run in para.all_runs_mut() {
        if let Some(font) = run.font_name().filter(|f| is_symbol_font(f)) {
            debug!("run in symbol font '{}' preserved", font);
            report.runs_preserved += 1;
            continue;
        }
        if run.contains_math() {
            debug!("run with math markup preserved");
            report.runs_preserved += 1;
            continue;
        }

        if let Some(family) = font_family {
            purge_theme_font(&mut FontNode::Run(&mut *run), family);
        }
        if let Some(size) = rules.font_size_pt {
            run.set_font_size_pt(size);
        }
        report.runs_rewritten += 1;
    }
}
