//! Markup stripping and text decoding.

use std::borrow::Cow;

use lazy_static::lazy_static;
use quoted_printable::ParseMode;
use regex::{Captures, Regex};
use scraper::Html;
use tracing::debug;

lazy_static! {
    static ref SCRIPT_BLOCK: Regex = Regex::new(r"(?is)<script[^>]*>.*?</script\s*>").unwrap();
    static ref STYLE_BLOCK: Regex = Regex::new(r"(?is)<style[^>]*>.*?</style\s*>").unwrap();
    static ref TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref ENTITY: Regex = Regex::new(
        r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|([a-zA-Z][a-zA-Z0-9]{1,31}));"
    )
    .unwrap();
    static ref QP_SEQUENCE: Regex = Regex::new(r"=(?:[0-9A-Fa-f]{2}|\r?\n)").unwrap();
}

/// Render HTML to plain text.
///
/// Script and style blocks go first, then every remaining tag becomes a
/// space. Character references are decoded and whitespace runs collapse to
/// a single space. Malformed markup is stripped as far as the tag pattern
/// reaches; this never fails.
pub fn strip_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let text = SCRIPT_BLOCK.replace_all(html, "");
    let text = STYLE_BLOCK.replace_all(&text, "");
    let text = TAG.replace_all(&text, " ");
    let text = decode_entities(&text);

    collapse_whitespace(&text)
}

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Decode HTML character references.
///
/// Numeric references are decoded when they name a valid scalar value.
/// Named references go through the HTML parser, so the full HTML5 table is
/// known; `&nbsp;` becomes a plain space. Unknown names are left as written.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    ENTITY.replace_all(text, |caps: &Captures| {
        let decoded = if let Some(dec) = caps.get(1) {
            dec.as_str().parse::<u32>().ok().and_then(char::from_u32).map(String::from)
        } else if let Some(hex) = caps.get(2) {
            u32::from_str_radix(hex.as_str(), 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
        } else if caps[3].eq_ignore_ascii_case("nbsp") {
            Some(" ".to_string())
        } else {
            Some(named_entity(&caps[0]))
        };

        decoded.unwrap_or_else(|| caps[0].to_string())
    })
}

/// `reference` is a whole `&name;` token.
fn named_entity(reference: &str) -> String {
    Html::parse_fragment(reference)
        .root_element()
        .text()
        .collect()
}

/// Whether a text body reads as quoted-printable.
///
/// The body must be ASCII and every `=` must open a hex escape or a soft
/// line break. At least one escape must also be unambiguous: a soft break,
/// a hex pair with a letter, or a digit pair that does not run on into a
/// number. `Amount=15,000` reads as an amount, not as `=15`.
pub fn is_quoted_printable(text: &str) -> bool {
    if !text.is_ascii() {
        return false;
    }

    let sequences: Vec<_> = QP_SEQUENCE.find_iter(text).collect();
    if sequences.is_empty() || sequences.len() != text.matches('=').count() {
        return false;
    }

    sequences.iter().any(|m| {
        let digits_only = m.as_str()[1..].bytes().all(|b| b.is_ascii_digit());
        let runs_on = text[m.end()..]
            .starts_with(|c: char| c.is_ascii_digit() || c == ',' || c == '.');
        !(digits_only && runs_on)
    })
}

/// Decode a quoted-printable text body.
///
/// Bodies that fail [`is_quoted_printable`] come back untouched. Invalid
/// UTF-8 after decoding is replaced lossily.
pub fn decode_quoted_printable(text: &str) -> Cow<'_, str> {
    if !is_quoted_printable(text) {
        return Cow::Borrowed(text);
    }

    match quoted_printable::decode(text, ParseMode::Robust) {
        Ok(bytes) => Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            debug!("Quoted-printable decoding failed: {:?}", e);
            Cow::Borrowed(text)
        }
    }
}
