//! Formatting rule set

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Page margins in inches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Margins {
    /// Same margin on all four sides
    pub fn uniform(inches: f64) -> Self {
        Self {
            top: inches,
            bottom: inches,
            left: inches,
            right: inches,
        }
    }
}

/// Target formatting. Every rule is optional; an unset rule leaves its
/// category of properties untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Font family applied to every script category
    pub font_family: Option<String>,

    /// Font size in points
    pub font_size_pt: Option<f32>,

    /// Line spacing as a multiple of single spacing
    pub line_spacing: Option<f32>,

    /// Page margins
    pub margins_inch: Option<Margins>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Common manuscript submission format: Times New Roman 12pt,
    /// double-spaced, one-inch margins.
    pub fn manuscript() -> Self {
        Self::new()
            .with_font_family("Times New Roman")
            .with_font_size(12.0)
            .with_line_spacing(2.0)
            .with_margins(Margins::uniform(1.0))
    }

    /// Set the font family.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    /// Set the font size in points.
    pub fn with_font_size(mut self, size_pt: f32) -> Self {
        self.font_size_pt = Some(size_pt);
        self
    }

    /// Set the line spacing multiple.
    pub fn with_line_spacing(mut self, multiple: f32) -> Self {
        self.line_spacing = Some(multiple);
        self
    }

    /// Set the page margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins_inch = Some(margins);
        self
    }

    /// Font family to apply; a blank family counts as unset.
    pub fn font_family(&self) -> Option<&str> {
        self.font_family
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }

    /// Whether no rule is set
    pub fn is_empty(&self) -> bool {
        self.font_family().is_none()
            && self.font_size_pt.is_none()
            && self.line_spacing.is_none()
            && self.margins_inch.is_none()
    }

    /// Reject values Word cannot represent.
    pub fn validate(&self) -> Result<()> {
        if let Some(size) = self.font_size_pt {
            if !size.is_finite() || size <= 0.0 {
                return Err(Error::InvalidRule(format!("font size must be positive, got {size}")));
            }
        }
        if let Some(spacing) = self.line_spacing {
            if !spacing.is_finite() || spacing <= 0.0 {
                return Err(Error::InvalidRule(format!(
                    "line spacing must be positive, got {spacing}"
                )));
            }
        }
        if let Some(m) = &self.margins_inch {
            for (side, value) in [
                ("top", m.top),
                ("bottom", m.bottom),
                ("left", m.left),
                ("right", m.right),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(Error::InvalidRule(format!(
                        "{side} margin must be non-negative, got {value}"
                    )));
                }
            }
        }
        Ok(())
    }
}
