//! Paragraph traversal through tables, rows and cells

use crate::document::{BlockContent, Paragraph};

/// Visit every paragraph in `blocks`, descending into table cells and
/// content controls at any depth. Paragraphs are visited in document order.
pub fn walk_paragraphs<'a, F>(blocks: &'a [BlockContent], visit: &mut F)
where
    F: FnMut(&'a Paragraph),
{
    for block in blocks {
        match block {
            BlockContent::Paragraph(para) => visit(para),
            BlockContent::Table(table) => {
                for row in table.rows() {
                    for cell in row.cells() {
                        walk_paragraphs(&cell.content, visit);
                    }
                }
            }
            BlockContent::Group(group) => walk_paragraphs(&group.content, visit),
            BlockContent::Unknown(_) => {}
        }
    }
}

/// Mutable counterpart of [`walk_paragraphs`]
pub fn walk_paragraphs_mut<F>(blocks: &mut [BlockContent], visit: &mut F)
where
    F: FnMut(&mut Paragraph),
{
    for block in blocks {
        match block {
            BlockContent::Paragraph(para) => visit(para),
            BlockContent::Table(table) => {
                for row in table.rows_mut() {
                    for cell in row.cells_mut() {
                        walk_paragraphs_mut(&mut cell.content, visit);
                    }
                }
            }
            BlockContent::Group(group) => walk_paragraphs_mut(&mut group.content, visit),
            BlockContent::Unknown(_) => {}
        }
    }
}
