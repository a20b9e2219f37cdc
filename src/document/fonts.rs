//! Font slots of `w:rFonts`

use crate::xml::{local_of, RawXmlElement};

/// Script category of a font slot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontScript {
    /// Basic Latin (`w:ascii`)
    Ascii,
    /// High-ANSI Latin (`w:hAnsi`)
    HighAnsi,
    /// East Asian (`w:eastAsia`)
    EastAsian,
    /// Complex script (`w:cs`)
    ComplexScript,
}

impl FontScript {
    /// All script categories
    pub const ALL: [FontScript; 4] = [
        FontScript::Ascii,
        FontScript::HighAnsi,
        FontScript::EastAsian,
        FontScript::ComplexScript,
    ];
}

/// Run fonts (`w:rFonts`): an explicit family and an optional theme
/// reference per script. A theme reference wins over the explicit family
/// when Word resolves the font.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunFonts {
    pub ascii: Option<String>,
    pub h_ansi: Option<String>,
    pub east_asia: Option<String>,
    pub cs: Option<String>,
    pub ascii_theme: Option<String>,
    pub h_ansi_theme: Option<String>,
    pub east_asia_theme: Option<String>,
    pub cs_theme: Option<String>,
    /// Font hint (`w:hint`)
    pub hint: Option<String>,
    /// Unknown attributes (preserved)
    pub unknown_attrs: Vec<(String, String)>,
}

impl RunFonts {
    /// Build from a parsed `w:rFonts` element
    pub fn from_raw(raw: &RawXmlElement) -> Self {
        let mut fonts = RunFonts::default();

        for (key, value) in &raw.attributes {
            let value = Some(value.clone());
            match local_of(key) {
                "ascii" => fonts.ascii = value,
                "hAnsi" => fonts.h_ansi = value,
                "eastAsia" => fonts.east_asia = value,
                "cs" => fonts.cs = value,
                "asciiTheme" => fonts.ascii_theme = value,
                "hAnsiTheme" => fonts.h_ansi_theme = value,
                "eastAsiaTheme" => fonts.east_asia_theme = value,
                "cstheme" | "csTheme" => fonts.cs_theme = value,
                "hint" => fonts.hint = value,
                _ => fonts.unknown_attrs.push((key.clone(), value.unwrap_or_default())),
            }
        }

        fonts
    }

    /// Convert back to a `w:rFonts` element
    pub fn to_raw(&self) -> RawXmlElement {
        let mut elem = RawXmlElement::empty("w:rFonts");
        let slots = [
            ("w:hint", &self.hint),
            ("w:ascii", &self.ascii),
            ("w:hAnsi", &self.h_ansi),
            ("w:eastAsia", &self.east_asia),
            ("w:cs", &self.cs),
            ("w:asciiTheme", &self.ascii_theme),
            ("w:hAnsiTheme", &self.h_ansi_theme),
            ("w:eastAsiaTheme", &self.east_asia_theme),
            ("w:cstheme", &self.cs_theme),
        ];
        for (name, value) in slots {
            if let Some(v) = value {
                elem.attributes.push((name.to_string(), v.clone()));
            }
        }
        elem.attributes.extend(self.unknown_attrs.iter().cloned());
        elem
    }

    /// Explicit family for a script
    pub fn family(&self, script: FontScript) -> Option<&str> {
        match script {
            FontScript::Ascii => self.ascii.as_deref(),
            FontScript::HighAnsi => self.h_ansi.as_deref(),
            FontScript::EastAsian => self.east_asia.as_deref(),
            FontScript::ComplexScript => self.cs.as_deref(),
        }
    }

    /// Theme reference for a script
    pub fn theme(&self, script: FontScript) -> Option<&str> {
        match script {
            FontScript::Ascii => self.ascii_theme.as_deref(),
            FontScript::HighAnsi => self.h_ansi_theme.as_deref(),
            FontScript::EastAsian => self.east_asia_theme.as_deref(),
            FontScript::ComplexScript => self.cs_theme.as_deref(),
        }
    }

    /// Set the explicit family of every script
    pub fn set_all_families(&mut self, family: &str) {
        for slot in [
            &mut self.ascii,
            &mut self.h_ansi,
            &mut self.east_asia,
            &mut self.cs,
        ] {
            *slot = Some(family.to_string());
        }
    }

    /// Remove every theme reference
    pub fn clear_theme_refs(&mut self) {
        self.ascii_theme = None;
        self.h_ansi_theme = None;
        self.east_asia_theme = None;
        self.cs_theme = None;
    }

    /// Whether any script still resolves through the theme
    pub fn has_theme_refs(&self) -> bool {
        FontScript::ALL.iter().any(|s| self.theme(*s).is_some())
    }

    /// Whether no attribute is set at all
    pub fn is_empty(&self) -> bool {
        *self == RunFonts::default()
    }
}
