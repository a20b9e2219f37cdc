//! XML namespaces used in OOXML

/// WordprocessingML main namespace
pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
/// Relationships namespace
pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
/// Office Math namespace
pub const M: &str = "http://schemas.openxmlformats.org/officeDocument/2006/math";
/// Content Types namespace
pub const CT: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
/// Package Relationships namespace
pub const PR: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Namespace declarations for a freshly created document.xml
pub fn document_namespaces() -> Vec<(String, String)> {
    [("xmlns:w", W), ("xmlns:r", R), ("xmlns:m", M)]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
