//! The four amount-finding strategies, in priority order.

use std::borrow::Cow;
use std::cell::OnceCell;

use tracing::trace;

use crate::html::{decode_quoted_printable, strip_html, table_cells, TableCell};
use crate::models::{ExtractionInput, SourceTag, StrategyResult};

use super::rules::patterns::TABLE_AMOUNT_LABEL;
use super::rules::{AmountExtractor, ExtractionMatch, FieldExtractor};

/// Label cell and amount cell agree.
pub const TABLE_LABELED_CONFIDENCE: f32 = 0.95;
/// A cell holds a currency amount but no label was seen.
pub const TABLE_CELL_CONFIDENCE: f32 = 0.90;
pub const HTML_TEXT_CONFIDENCE: f32 = 0.85;
pub const TEXT_BODY_CONFIDENCE: f32 = 0.80;
/// Rendered text loses layout, so it scores below the declared text body.
pub const RENDERED_CONFIDENCE_FACTOR: f32 = 0.9;

/// Email bodies ready for the strategies.
///
/// The text body is quoted-printable decoded up front; table cells and the
/// rendered HTML are computed on first use and shared between the strategies
/// and the enrichment step.
pub struct PreparedInput<'a> {
    html: Option<&'a str>,
    text: Option<Cow<'a, str>>,
    cells: OnceCell<Vec<TableCell>>,
    rendered: OnceCell<String>,
}

impl<'a> PreparedInput<'a> {
    pub fn new(input: &'a ExtractionInput, decode_qp: bool) -> Self {
        let text = input.text_body().map(|text| {
            if decode_qp {
                decode_quoted_printable(text)
            } else {
                Cow::Borrowed(text)
            }
        });

        Self {
            html: input.html_body(),
            text,
            cells: OnceCell::new(),
            rendered: OnceCell::new(),
        }
    }

    /// Raw HTML body, if present and non-empty.
    pub fn html(&self) -> Option<&str> {
        self.html
    }

    /// Decoded text body, if present and non-empty.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Table cells of the HTML body; empty without HTML.
    pub fn cells(&self) -> &[TableCell] {
        self.cells
            .get_or_init(|| self.html.map(table_cells).unwrap_or_default())
    }

    /// HTML body rendered to plain text; empty without HTML.
    pub fn rendered(&self) -> &str {
        self.rendered
            .get_or_init(|| self.html.map(strip_html).unwrap_or_default())
    }
}

/// One step of the extraction cascade.
pub trait ExtractionStrategy: Send + Sync {
    /// Source tag reported when this strategy wins.
    fn tag(&self) -> SourceTag;

    /// Name used in diagnostics, e.g. `HTML table`.
    fn label(&self) -> &'static str;

    /// Whether the input carries what this strategy reads. Strategies that
    /// do not apply are skipped without a diagnostics entry.
    fn applies(&self, _input: &PreparedInput<'_>) -> bool {
        true
    }

    /// Look for an amount. `None` means nothing plausible was found.
    fn attempt(&self, input: &PreparedInput<'_>) -> Option<StrategyResult>;
}

/// Amounts in `<td>`/`<th>` cells, preferring cells next to an amount label.
pub struct HtmlTableStrategy;

impl ExtractionStrategy for HtmlTableStrategy {
    fn tag(&self) -> SourceTag {
        SourceTag::HtmlTable
    }

    fn label(&self) -> &'static str {
        "HTML table"
    }

    fn applies(&self, input: &PreparedInput<'_>) -> bool {
        input.html().is_some()
    }

    fn attempt(&self, input: &PreparedInput<'_>) -> Option<StrategyResult> {
        let cells = input.cells();
        let labeled = AmountExtractor::currency_only(TABLE_LABELED_CONFIDENCE);
        let unlabeled = AmountExtractor::currency_only(TABLE_CELL_CONFIDENCE);

        let found = cells
            .iter()
            .filter(|cell| TABLE_AMOUNT_LABEL.is_match(&cell.text))
            .find_map(|cell| {
                labeled.extract(&cell.text).or_else(|| {
                    cell.next_text
                        .as_deref()
                        .and_then(|next| labeled.extract(next))
                })
            })
            .or_else(|| cells.iter().find_map(|cell| unlabeled.extract(&cell.text)))?;

        Some(matched(self.tag(), found))
    }
}

/// Amount patterns over the raw markup.
pub struct HtmlTextStrategy;

impl ExtractionStrategy for HtmlTextStrategy {
    fn tag(&self) -> SourceTag {
        SourceTag::HtmlText
    }

    fn label(&self) -> &'static str {
        "HTML text"
    }

    fn applies(&self, input: &PreparedInput<'_>) -> bool {
        input.html().is_some()
    }

    fn attempt(&self, input: &PreparedInput<'_>) -> Option<StrategyResult> {
        let found = AmountExtractor::html_text(HTML_TEXT_CONFIDENCE).extract(input.html()?)?;
        Some(matched(self.tag(), found))
    }
}

/// Amount patterns over the declared plain-text body.
pub struct TextBodyStrategy;

impl ExtractionStrategy for TextBodyStrategy {
    fn tag(&self) -> SourceTag {
        SourceTag::TextBody
    }

    fn label(&self) -> &'static str {
        "text body"
    }

    fn applies(&self, input: &PreparedInput<'_>) -> bool {
        input.text().is_some()
    }

    fn attempt(&self, input: &PreparedInput<'_>) -> Option<StrategyResult> {
        let found = AmountExtractor::plain_text(TEXT_BODY_CONFIDENCE).extract(input.text()?)?;
        Some(matched(self.tag(), found))
    }
}

/// Plain-text patterns over the HTML body rendered to text. Last resort.
pub struct RenderedTextStrategy;

impl RenderedTextStrategy {
    /// Rounded to two decimals (`0.72`).
    pub fn confidence() -> f32 {
        (TEXT_BODY_CONFIDENCE * RENDERED_CONFIDENCE_FACTOR * 100.0).round() / 100.0
    }
}

impl ExtractionStrategy for RenderedTextStrategy {
    fn tag(&self) -> SourceTag {
        SourceTag::HtmlRenderedText
    }

    fn label(&self) -> &'static str {
        "HTML-to-text"
    }

    fn applies(&self, input: &PreparedInput<'_>) -> bool {
        input.html().is_some() && !input.rendered().is_empty()
    }

    fn attempt(&self, input: &PreparedInput<'_>) -> Option<StrategyResult> {
        let found = AmountExtractor::plain_text(Self::confidence()).extract(input.rendered())?;
        Some(matched(self.tag(), found))
    }
}

fn matched(tag: SourceTag, found: ExtractionMatch<f64>) -> StrategyResult {
    trace!("{} matched {:?}", tag, found.source);
    StrategyResult::new(found.value, found.confidence, tag)
}

/// The standard cascade: table, markup, text body, rendered text.
pub fn default_strategies() -> Vec<Box<dyn ExtractionStrategy>> {
    vec![
        Box::new(HtmlTableStrategy),
        Box::new(HtmlTextStrategy),
        Box::new(TextBodyStrategy),
        Box::new(RenderedTextStrategy),
    ]
}
