//! HTML processing: rendering markup to text and walking table cells.

pub mod normalize;
pub mod table;

pub use normalize::{
    collapse_whitespace, decode_entities, decode_quoted_printable, is_quoted_printable,
    strip_html,
};
pub use table::{table_cells, TableCell};
