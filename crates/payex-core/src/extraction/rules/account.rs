//! Account number (NUBAN) extraction.

use crate::html::TableCell;

use super::patterns::{ACCOUNT_LABEL, ACCOUNT_NUMBER, LABELED_ACCOUNT_NUMBER};

/// Ten-digit account number from a labelled table cell, else from an
/// `Account Number: 0123456789` phrase in `content`.
pub fn extract_account_number(cells: &[TableCell], content: &str) -> Option<String> {
    let from_cells = cells
        .iter()
        .filter(|cell| ACCOUNT_LABEL.is_match(&cell.text))
        .filter_map(|cell| cell.next_text.as_deref())
        .find_map(|value| ACCOUNT_NUMBER.captures(value))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    from_cells.or_else(|| {
        LABELED_ACCOUNT_NUMBER
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}
