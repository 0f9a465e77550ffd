//! Sender name extraction from transfer narrations.

use crate::html::TableCell;

use super::patterns::{DESCRIPTION_LABEL, FROM_NAME_TO};
use super::FieldExtractor;

/// Shortest name accepted, after trimming.
const MIN_NAME_LEN: usize = 3;

/// Finds `FROM NAME TO` phrases where NAME is upper case. Names come out
/// lower-cased.
pub struct SenderExtractor;

impl SenderExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SenderExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for SenderExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        FROM_NAME_TO
            .captures_iter(text)
            .filter_map(|caps| {
                let name = caps.get(1)?.as_str().trim();
                (name.chars().count() >= MIN_NAME_LEN).then(|| name.to_lowercase())
            })
            .collect()
    }
}

/// Sender name, lower-cased.
///
/// A description/remarks cell followed by a `FROM NAME TO` cell wins; after
/// that any `FROM NAME TO` phrase in `content` (HTML and text together).
pub fn extract_sender_name(cells: &[TableCell], content: &str) -> Option<String> {
    let extractor = SenderExtractor::new();

    cells
        .iter()
        .filter(|cell| DESCRIPTION_LABEL.is_match(&cell.text))
        .filter_map(|cell| cell.next_text.as_deref())
        .find_map(|narration| extractor.extract(narration))
        .or_else(|| extractor.extract(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::table_cells;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_description_cell() {
        let html = r#"<table>
            <tr><td>Remarks:</td><td>TRF FROM ADA OBI to ME</td></tr>
            <tr><td>Note</td><td>from OTHER PERSON to you</td></tr>
        </table>"#;

        let cells = table_cells(html);
        assert_eq!(extract_sender_name(&cells, html), Some("ada obi".to_string()));
    }

    #[test]
    fn test_bare_phrase() {
        let content = "Transfer from JOHN DOE to your account";
        assert_eq!(extract_sender_name(&[], content), Some("john doe".to_string()));
    }

    #[test]
    fn test_name_must_be_upper_case() {
        assert_eq!(extract_sender_name(&[], "a gift from John Doe to you"), None);
    }

    #[test]
    fn test_short_names_are_skipped() {
        let content = "from AB to X, later from CHIOMA to Y";
        assert_eq!(extract_sender_name(&[], content), Some("chioma".to_string()));
    }

    #[test]
    fn test_to_must_be_a_word() {
        let content = "from JOHN TOBI to savings";
        assert_eq!(extract_sender_name(&[], content), Some("john tobi".to_string()));
    }

    #[test]
    fn test_extract_all_in_text_order() {
        let text = "from ADA OBI to X; from AB to Y; from EMEKA to Z";
        let names = SenderExtractor::new().extract_all(text);
        assert_eq!(names, vec!["ada obi".to_string(), "emeka".to_string()]);
    }

    #[test]
    fn test_absent() {
        assert_eq!(extract_sender_name(&[], "Payment NGN 500 received"), None);
    }
}
