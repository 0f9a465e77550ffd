//! Table cell traversal for HTML notifications.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::normalize::collapse_whitespace;

lazy_static! {
    static ref CELL: Selector = Selector::parse("td, th").unwrap();
    static ref BARE_CELL: Regex = Regex::new(r"(?i)<t[dh][\s>]").unwrap();
}

/// Text of one table cell and of the cell right after it in the same row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    /// Whitespace-collapsed cell text.
    pub text: String,
    /// Text of the next sibling cell, if any.
    pub next_text: Option<String>,
}

/// Collect every `<td>`/`<th>` in document order.
///
/// Cells outside a `<table>` are dropped by the HTML parser, so markup that
/// has cell tags but yields no cells is re-parsed inside a table context.
pub fn table_cells(html: &str) -> Vec<TableCell> {
    let cells = collect_cells(&Html::parse_document(html));
    if !cells.is_empty() || !BARE_CELL.is_match(html) {
        return cells;
    }

    collect_cells(&Html::parse_document(&format!("<table>{html}</table>")))
}

fn collect_cells(document: &Html) -> Vec<TableCell> {
    document
        .select(&CELL)
        .map(|cell| TableCell {
            text: cell_text(&cell),
            next_text: next_cell(&cell).map(|next| cell_text(&next)),
        })
        .collect()
}

fn next_cell<'a>(cell: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    cell.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| matches!(sibling.value().name(), "td" | "th"))
}

fn cell_text(cell: &ElementRef<'_>) -> String {
    collapse_whitespace(&cell.text().collect::<Vec<_>>().join(" "))
}
