//! Schema child order for property containers.
//!
//! WordprocessingML property elements are `xsd:sequence`s: Word rejects a
//! `w:rPr` whose `w:sz` precedes its `w:rFonts`. Typed fields and preserved
//! unknown children are merged and then sorted with these tables before
//! writing. Children outside the `w:` namespace sort last, in input order.

use crate::xml::RawXmlNode;

/// Child order of `w:rPr`
pub const RPR_ORDER: &[&str] = &[
    "rStyle", "rFonts", "b", "bCs", "i", "iCs", "caps", "smallCaps", "strike", "dstrike",
    "outline", "shadow", "emboss", "imprint", "noProof", "snapToGrid", "vanish", "webHidden",
    "color", "spacing", "w", "kern", "position", "sz", "szCs", "highlight", "u", "effect", "bdr",
    "shd", "fitText", "vertAlign", "rtl", "cs", "em", "lang", "eastAsianLayout", "specVanish",
    "oMath", "rPrChange",
];

/// Child order of `w:pPr`
pub const PPR_ORDER: &[&str] = &[
    "pStyle", "keepNext", "keepLines", "pageBreakBefore", "framePr", "widowControl", "numPr",
    "suppressLineNumbers", "pBdr", "shd", "tabs", "suppressAutoHyphens", "kinsoku", "wordWrap",
    "overflowPunct", "topLinePunct", "autoSpaceDE", "autoSpaceDN", "bidi", "adjustRightInd",
    "snapToGrid", "spacing", "ind", "contextualSpacing", "mirrorIndents", "suppressOverlap", "jc",
    "textDirection", "textAlignment", "textboxTightWrap", "outlineLvl", "divId", "cnfStyle", "rPr",
    "sectPr", "pPrChange",
];

/// Child order of `w:sectPr`
pub const SECTPR_ORDER: &[&str] = &[
    "headerReference", "footerReference", "footnotePr", "endnotePr", "type", "pgSz", "pgMar",
    "paperSrc", "pgBorders", "lnNumType", "pgNumType", "cols", "formProt", "vAlign", "noEndnote",
    "titlePg", "textDirection", "bidi", "rtlGutter", "docGrid", "printerSettings", "sectPrChange",
];

/// Child order of `w:style`
pub const STYLE_ORDER: &[&str] = &[
    "name", "aliases", "basedOn", "next", "link", "autoRedefine", "hidden", "uiPriority",
    "semiHidden", "unhideWhenUsed", "qFormat", "locked", "personal", "personalCompose",
    "personalReply", "rsid", "pPr", "rPr", "tblPr", "trPr", "tcPr", "tblStylePr",
];

fn rank(node: &RawXmlNode, order: &[&str]) -> usize {
    node.as_element()
        .and_then(|e| e.name.strip_prefix("w:"))
        .and_then(|local| order.iter().position(|o| *o == local))
        .unwrap_or(order.len())
}

/// Stable-sort children into schema order
pub fn sort_children(children: &mut [RawXmlNode], order: &[&str]) {
    children.sort_by_key(|c| rank(c, order));
}
