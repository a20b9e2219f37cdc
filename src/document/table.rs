//! Table elements (w:tbl, w:tr, w:tc)
//!
//! Cells own block content, so tables nest to any depth.

use crate::document::body::{outer_paragraphs, read_blocks};
use crate::document::{BlockContent, Paragraph};
use crate::error::Result;
use crate::xml::{attributes_of, unexpected_eof, RawXmlElement, RawXmlNode};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::io::BufRead;

/// Table element (w:tbl)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    /// Rows and preserved markup (tblPr, tblGrid, bookmarks), in order
    pub content: Vec<TableContent>,
}

/// Child of a table
#[derive(Clone, Debug, PartialEq)]
pub enum TableContent {
    Row(TableRow),
    Unknown(RawXmlNode),
}

/// Table row (w:tr)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableRow {
    /// Attributes (rsids, preserved)
    pub attrs: Vec<(String, String)>,
    /// Cells and preserved markup (trPr, ...), in order
    pub content: Vec<RowContent>,
}

/// Child of a table row
#[derive(Clone, Debug, PartialEq)]
pub enum RowContent {
    Cell(TableCell),
    Unknown(RawXmlNode),
}

/// Table cell (w:tc)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableCell {
    /// Cell properties (w:tcPr, preserved)
    pub properties: Option<RawXmlNode>,
    /// Cell content: paragraphs, nested tables, preserved blocks
    pub content: Vec<BlockContent>,
}

impl Table {
    /// Create a table from a 2D array of strings
    pub fn from_data<S: AsRef<str>>(data: &[&[S]]) -> Self {
        let content = data
            .iter()
            .map(|row| {
                let texts = row.iter().map(<S as AsRef<str>>::as_ref);
                TableContent::Row(TableRow::from_texts(texts))
            })
            .collect();
        Table { content }
    }

    /// Parse from reader (after w:tbl start tag)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>, _start: &BytesStart) -> Result<Self> {
        let mut table = Table::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.name().local_name().as_ref() {
                    b"tr" => {
                        let row = TableRow::from_reader(reader, &e)?;
                        table.content.push(TableContent::Row(row));
                    }
                    _ => {
                        let raw = RawXmlElement::from_reader(reader, &e)?;
                        table.content.push(TableContent::Unknown(RawXmlNode::Element(raw)));
                    }
                },
                Event::Empty(e) => match e.name().local_name().as_ref() {
                    b"tr" => {
                        let row = TableRow {
                            attrs: attributes_of(&e),
                            ..Default::default()
                        };
                        table.content.push(TableContent::Row(row));
                    }
                    _ => {
                        let raw = RawXmlElement::from_empty(&e);
                        table.content.push(TableContent::Unknown(RawXmlNode::Element(raw)));
                    }
                },
                Event::End(e) => {
                    if e.name().local_name().as_ref() == b"tbl" {
                        break;
                    }
                }
                Event::Eof => return Err(unexpected_eof("w:tbl")),
                _ => {}
            }
            buf.clear();
        }

        Ok(table)
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &TableRow> {
        self.content.iter().filter_map(|c| match c {
            TableContent::Row(r) => Some(r),
            _ => None,
        })
    }

    /// Iterate over rows mutably
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut TableRow> {
        self.content.iter_mut().filter_map(|c| match c {
            TableContent::Row(r) => Some(r),
            _ => None,
        })
    }

    /// Get row count
    pub fn row_count(&self) -> usize {
        self.rows().count()
    }

    /// Get cell at position
    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.rows().nth(row)?.cells().nth(col)
    }

    /// Get mutable cell at position
    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut TableCell> {
        self.rows_mut().nth(row)?.cells_mut().nth(col)
    }

    /// Write to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        writer.write_event(Event::Start(BytesStart::new("w:tbl")))?;

        for child in &self.content {
            match child {
                TableContent::Row(row) => row.write_to(writer)?,
                TableContent::Unknown(node) => node.write_to(writer)?,
            }
        }

        writer.write_event(Event::End(BytesEnd::new("w:tbl")))?;
        Ok(())
    }
}

impl TableRow {
    /// Create a row from cell texts
    pub fn from_texts<S: Into<String>>(texts: impl IntoIterator<Item = S>) -> Self {
        let content = texts
            .into_iter()
            .map(|t| RowContent::Cell(TableCell::new(t)))
            .collect();
        TableRow {
            content,
            ..Default::default()
        }
    }

    /// Parse from reader (after w:tr start tag)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> Result<Self> {
        let mut row = TableRow {
            attrs: attributes_of(start),
            ..Default::default()
        };
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.name().local_name().as_ref() {
                    b"tc" => {
                        let cell = TableCell::from_reader(reader, &e)?;
                        row.content.push(RowContent::Cell(cell));
                    }
                    _ => {
                        let raw = RawXmlElement::from_reader(reader, &e)?;
                        row.content.push(RowContent::Unknown(RawXmlNode::Element(raw)));
                    }
                },
                Event::Empty(e) => match e.name().local_name().as_ref() {
                    b"tc" => row.content.push(RowContent::Cell(TableCell::default())),
                    _ => {
                        let raw = RawXmlElement::from_empty(&e);
                        row.content.push(RowContent::Unknown(RawXmlNode::Element(raw)));
                    }
                },
                Event::End(e) => {
                    if e.name().local_name().as_ref() == b"tr" {
                        break;
                    }
                }
                Event::Eof => return Err(unexpected_eof("w:tr")),
                _ => {}
            }
            buf.clear();
        }

        Ok(row)
    }

    /// Iterate over cells
    pub fn cells(&self) -> impl Iterator<Item = &TableCell> {
        self.content.iter().filter_map(|c| match c {
            RowContent::Cell(cell) => Some(cell),
            _ => None,
        })
    }

    /// Iterate over cells mutably
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut TableCell> {
        self.content.iter_mut().filter_map(|c| match c {
            RowContent::Cell(cell) => Some(cell),
            _ => None,
        })
    }

    /// Get cell count
    pub fn cell_count(&self) -> usize {
        self.cells().count()
    }

    /// Write to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new("w:tr");
        for (key, value) in &self.attrs {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        writer.write_event(Event::Start(start))?;

        for child in &self.content {
            match child {
                RowContent::Cell(cell) => cell.write_to(writer)?,
                RowContent::Unknown(node) => node.write_to(writer)?,
            }
        }

        writer.write_event(Event::End(BytesEnd::new("w:tr")))?;
        Ok(())
    }
}

impl TableCell {
    /// Create a new cell with text
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let para = if text.is_empty() {
            Paragraph::default()
        } else {
            Paragraph::new(text)
        };
        TableCell {
            properties: None,
            content: vec![BlockContent::Paragraph(para)],
        }
    }

    /// Parse from reader (after w:tc start tag)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>, _start: &BytesStart) -> Result<Self> {
        let mut cell = TableCell::default();
        let (mut content, _) = read_blocks(reader, b"tc")?;

        // tcPr is the first child when present; keep it apart from the blocks.
        if let Some(BlockContent::Unknown(RawXmlNode::Element(e))) = content.first() {
            if e.local_name() == "tcPr" {
                if let BlockContent::Unknown(node) = content.remove(0) {
                    cell.properties = Some(node);
                }
            }
        }
        cell.content = content;

        Ok(cell)
    }

    /// Paragraphs of this cell outside nested tables
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        outer_paragraphs(&self.content)
    }

    /// Nested tables directly in this cell
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.content.iter().filter_map(|c| match c {
            BlockContent::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Get cell text (paragraphs joined by newlines)
    pub fn text(&self) -> String {
        self.paragraphs()
            .map(|p| p.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Add a nested table
    pub fn add_table(&mut self, table: Table) {
        self.content.push(BlockContent::Table(table));
        // A cell must end with a paragraph.
        self.content.push(BlockContent::Paragraph(Paragraph::default()));
    }

    /// Write to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        writer.write_event(Event::Start(BytesStart::new("w:tc")))?;

        if let Some(props) = &self.properties {
            props.write_to(writer)?;
        }

        for block in &self.content {
            block.write_to(writer)?;
        }

        // Word rejects a cell without a paragraph.
        if self.paragraphs().next().is_none() {
            writer.write_event(Event::Empty(BytesStart::new("w:p")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("w:tc")))?;
        Ok(())
    }
}
