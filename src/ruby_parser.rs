/*!
 * Ruby (furigana) markup parsing.
 *
 * Only the ruby subset of HTML is understood: `<ruby>BASE<rt>READING</rt></ruby>`,
 * optionally with `<rb>` around the base and `<rp>` fallback parentheses.
 * Every other tag is stripped and its text kept as plain content. Parsing is
 * best-effort and never fails.
 */

use std::borrow::Cow;

use log::debug;
use quick_xml::escape::{resolve_predefined_entity, unescape_with};
use serde::Serialize;

use crate::errors::Diagnostic;

/// One atomic piece of a content unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// Text to display or transliterate
    pub base: String,

    /// Kana reading, present only for ruby-annotated text
    pub reading: Option<String>,
}

impl Segment {
    /// Create a segment without a reading
    pub fn plain(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            reading: None,
        }
    }

    /// Create a ruby-annotated segment
    pub fn annotated(base: impl Into<String>, reading: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            reading: Some(reading.into()),
        }
    }

    /// The reading if there is one, otherwise the base text
    pub fn phonetic_text(&self) -> &str {
        self.reading.as_deref().unwrap_or(&self.base)
    }
}

/// Ordered segments making up one subtitle line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentUnit {
    segments: Vec<Segment>,
}

impl ContentUnit {
    /// Build a unit from already parsed segments
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Concatenated base text, i.e. the visible line without markup
    pub fn visible_text(&self) -> String {
        self.segments.iter().map(|s| s.base.as_str()).collect()
    }
}

/// Parse one markup string, logging every recovered problem at debug level
pub fn parse_markup(markup: &str) -> ContentUnit {
    let (unit, diagnostics) = parse_markup_with_diagnostics(markup);
    for diagnostic in &diagnostics {
        debug!("Markup: {}", diagnostic);
    }
    unit
}

/// Parse one markup string and return the recovered problems alongside the unit
pub fn parse_markup_with_diagnostics(markup: &str) -> (ContentUnit, Vec<Diagnostic>) {
    let tokens = tokenize(markup);
    let mut builder = UnitBuilder::default();
    let mut i = 0;

    while i < tokens.len() {
        match &tokens[i] {
            Token::Text(text) => builder.plain.push_str(&decode_entities(text)),
            Token::Tag(tag) if tag.name == "ruby" && !tag.closing => {
                let close = tokens[i + 1..]
                    .iter()
                    .position(|t| matches!(t, Token::Tag(t) if t.name == "ruby" && t.closing))
                    .map(|offset| i + 1 + offset);

                match close {
                    Some(close) => {
                        builder.flush_plain();
                        builder.annotation(&tokens[i + 1..close]);
                        i = close;
                    }
                    None => builder.stray(tag),
                }
            }
            Token::Tag(tag) => builder.stray(tag),
        }
        i += 1;
    }

    builder.flush_plain();
    (ContentUnit::new(builder.segments), builder.diagnostics)
}

#[derive(Default)]
struct UnitBuilder {
    segments: Vec<Segment>,
    diagnostics: Vec<Diagnostic>,
    plain: String,
}

impl UnitBuilder {
    fn stray(&mut self, tag: &Tag<'_>) {
        self.diagnostics.push(Diagnostic::MalformedMarkup {
            tag: tag.raw.to_string(),
        });
    }

    /// Plain text becomes one segment per whitespace-delimited run
    fn flush_plain(&mut self) {
        self.segments
            .extend(self.plain.split_whitespace().map(Segment::plain));
        self.plain.clear();
    }

    /// Consume the tokens between `<ruby>` and `</ruby>`
    fn annotation(&mut self, inner: &[Token<'_>]) {
        let mut base = String::new();
        let mut reading = String::new();
        let mut in_reading = false;
        let mut in_fallback = false;

        for token in inner {
            match token {
                Token::Text(_) if in_fallback => {}
                Token::Text(text) if in_reading => reading.push_str(&decode_entities(text)),
                Token::Text(text) => base.push_str(&decode_entities(text)),
                Token::Tag(tag) => match (tag.name.as_str(), tag.closing) {
                    ("rt", false) => {
                        // A new <rt> without a closing one ends the previous pair
                        if in_reading {
                            self.pair(&mut base, &mut reading);
                        }
                        in_reading = true;
                    }
                    ("rt", true) => {
                        if in_reading {
                            self.pair(&mut base, &mut reading);
                            in_reading = false;
                        } else {
                            self.stray(tag);
                        }
                    }
                    ("rp", closing) => in_fallback = !closing,
                    ("rb", _) => {}
                    _ => self.stray(tag),
                },
            }
        }

        if in_reading || !base.trim().is_empty() {
            self.pair(&mut base, &mut reading);
        }
    }

    fn pair(&mut self, base: &mut String, reading: &mut String) {
        let base_text = base.trim();
        let reading_text = reading.trim();

        if base_text.is_empty() {
            self.diagnostics.push(Diagnostic::MissingBase {
                reading: reading_text.to_string(),
            });
        } else if reading_text.is_empty() {
            self.diagnostics.push(Diagnostic::MissingReading {
                base: base_text.to_string(),
            });
        } else {
            self.segments
                .push(Segment::annotated(base_text, reading_text));
        }

        base.clear();
        reading.clear();
    }
}

#[derive(Debug, PartialEq)]
enum Token<'a> {
    Text(&'a str),
    Tag(Tag<'a>),
}

#[derive(Debug, PartialEq)]
struct Tag<'a> {
    /// Lowercased element name
    name: String,
    closing: bool,
    raw: &'a str,
}

fn tokenize(markup: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut cursor = 0;

    while let Some(offset) = markup[cursor..].find('<') {
        let lt = cursor + offset;
        let Some(tag) = read_tag(&markup[lt..]) else {
            // Not a tag, the '<' stays part of the text
            cursor = lt + 1;
            continue;
        };

        if lt > text_start {
            tokens.push(Token::Text(&markup[text_start..lt]));
        }
        cursor = lt + tag.raw.len();
        text_start = cursor;
        tokens.push(Token::Tag(tag));
    }

    if text_start < markup.len() {
        tokens.push(Token::Text(&markup[text_start..]));
    }
    tokens
}

/// Read a tag at the start of `input`, which begins with '<'
fn read_tag(input: &str) -> Option<Tag<'_>> {
    let gt = input.find('>')?;
    let raw = &input[..=gt];
    let inner = &raw[1..raw.len() - 1];
    let (closing, rest) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };

    if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }

    let name: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    Some(Tag { name, closing, raw })
}

fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    // A bare '&' or unknown entity leaves the text as written
    unescape_with(text, |entity| match entity {
        "nbsp" => Some("\u{a0}"),
        _ => resolve_predefined_entity(entity),
    })
    .unwrap_or(Cow::Borrowed(text))
}
