//! ZIP container handling for DOCX packages
//!
//! Entries are kept in archive order as raw bytes. Only the parts the
//! document model re-serializes are ever replaced; everything else (media,
//! themes, headers, settings) is written back untouched.

mod relationships;

pub use relationships::{rel_types, rels_path_for, resolve_target, Relationship, Relationships};

use crate::error::{Error, Result};
use crate::xml::{CT, PR};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;
use zip::read::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

/// One stored archive entry
#[derive(Clone, Debug)]
struct Entry {
    name: String,
    data: Vec<u8>,
    compression: CompressionMethod,
}

/// A DOCX package (ZIP-based OPC container)
#[derive(Clone, Debug, Default)]
pub struct Package {
    entries: Vec<Entry>,
}

impl Package {
    /// Open a package from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Open a package from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Open a package from a reader
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut entries = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }

            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            entries.push(Entry {
                name: file.name().to_string(),
                data,
                compression: file.compression(),
            });
        }

        log::debug!("read package with {} entries", entries.len());
        Ok(Self { entries })
    }

    /// Package skeleton for a new, empty document: content types, package
    /// relationships and a document relationship to `word/styles.xml`.
    pub fn blank() -> Self {
        let mut package = Self::default();
        package.set_part("[Content_Types].xml", blank_content_types().into_bytes());
        package.set_part("_rels/.rels", blank_package_rels().into_bytes());
        package.set_part(
            "word/_rels/document.xml.rels",
            blank_document_rels().into_bytes(),
        );
        package
    }

    /// Save the package to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(file)
    }

    /// Save the package to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write_to(&mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Write the package to a writer
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);

        for entry in &self.entries {
            let method = match entry.compression {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            };
            let options = SimpleFileOptions::default().compression_method(method);
            zip.start_file(entry.name.as_str(), options)?;
            zip.write_all(&entry.data)?;
        }

        zip.finish()?;
        Ok(())
    }

    /// Raw bytes of a part by zip entry name
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.data.as_slice())
    }

    /// Part decoded as UTF-8
    pub fn part_str(&self, name: &str) -> Result<Option<&str>> {
        match self.part(name) {
            Some(data) => Ok(Some(std::str::from_utf8(strip_bom(data))?)),
            None => Ok(None),
        }
    }

    /// Replace a part's data, or append it if the package lacks it
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.data = data,
            None => self.entries.push(Entry {
                name: name.to_string(),
                data,
                compression: CompressionMethod::Deflated,
            }),
        }
    }

    /// All entry names in archive order
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Relationships whose source is `part` (`""` for the package itself)
    pub fn relationships_of(&self, part: &str) -> Result<Relationships> {
        match self.part_str(&rels_path_for(part))? {
            Some(xml) => Relationships::from_xml(xml),
            None => Ok(Relationships::default()),
        }
    }

    /// Entry name of the main document part
    pub fn main_document_path(&self) -> Result<String> {
        let rels = self.relationships_of("")?;
        let rel = rels
            .by_type(rel_types::OFFICE_DOCUMENT)
            .ok_or_else(|| Error::MissingPart("officeDocument relationship".into()))?;
        let path = resolve_target("", &rel.target);

        if self.part(&path).is_none() {
            return Err(Error::MissingPart(path));
        }
        Ok(path)
    }

    /// Entry name of a part related to `source` by `rel_type`, if present
    pub fn related_part_path(&self, source: &str, rel_type: &str) -> Result<Option<String>> {
        let rels = self.relationships_of(source)?;
        Ok(rels
            .by_type(rel_type)
            .filter(|r| !r.external)
            .map(|r| resolve_target(source, &r.target))
            .filter(|path| self.part(path).is_some()))
    }
}

fn strip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data)
}

fn blank_content_types() -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Types xmlns="{}">"#,
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
            r#"<Default Extension="xml" ContentType="application/xml"/>"#,
            r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
            r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
            r#"</Types>"#
        ),
        CT
    )
}

fn blank_package_rels() -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Relationships xmlns="{}">"#,
            r#"<Relationship Id="rId1" Type="{}" Target="word/document.xml"/>"#,
            r#"</Relationships>"#
        ),
        PR,
        rel_types::OFFICE_DOCUMENT
    )
}

fn blank_document_rels() -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Relationships xmlns="{}">"#,
            r#"<Relationship Id="rId1" Type="{}" Target="styles.xml"/>"#,
            r#"</Relationships>"#
        ),
        PR,
        rel_types::STYLES
    )
}
