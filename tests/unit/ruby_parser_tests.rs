/*!
 * Tests for ruby markup parsing
 */

use furisub::errors::Diagnostic;
use furisub::ruby_parser::{ContentUnit, Segment, parse_markup, parse_markup_with_diagnostics};

#[test]
fn test_parse_markup_withSingleRuby_shouldProduceAnnotatedSegment() {
    let unit = parse_markup("<ruby>犬<rt>いぬ</rt></ruby>");
    assert_eq!(unit.segments(), &[Segment::annotated("犬", "いぬ")]);
}

#[test]
fn test_parse_markup_withMixedContent_shouldKeepOrder() {
    let unit = parse_markup("今日は<ruby>晴<rt>は</rt></ruby>れ");
    assert_eq!(
        unit.segments(),
        &[
            Segment::plain("今日は"),
            Segment::annotated("晴", "は"),
            Segment::plain("れ"),
        ]
    );
}

#[test]
fn test_parse_markup_withPlainWhitespaceFreeText_shouldConcatenateToInput() {
    let input = "ただのテキスト";
    let unit = parse_markup(input);
    assert!(unit.segments().iter().all(|s| s.reading.is_none()));
    assert_eq!(unit.visible_text(), input);
}

#[test]
fn test_parse_markup_withSpaces_shouldSplitPlainRuns() {
    let unit = parse_markup("hello  big world");
    assert_eq!(
        unit.segments(),
        &[Segment::plain("hello"), Segment::plain("big"), Segment::plain("world")]
    );
}

#[test]
fn test_parse_markup_withEmptyInput_shouldReturnEmptyUnit() {
    assert!(parse_markup("").is_empty());
    assert!(parse_markup("   ").is_empty());
}

#[test]
fn test_parse_markup_withRpFallback_shouldDropParentheses() {
    let unit = parse_markup("<ruby>漢<rp>(</rp><rt>かん</rt><rp>)</rp></ruby>");
    assert_eq!(unit.segments(), &[Segment::annotated("漢", "かん")]);
}

#[test]
fn test_parse_markup_withRbElement_shouldUseItsText() {
    let unit = parse_markup("<ruby><rb>字</rb><rt>じ</rt></ruby>");
    assert_eq!(unit.segments(), &[Segment::annotated("字", "じ")]);
}

#[test]
fn test_parse_markup_withMultiplePairsInOneRuby_shouldProduceEachPair() {
    let unit = parse_markup("<ruby>東<rt>とう</rt>京<rt>きょう</rt></ruby>");
    assert_eq!(
        unit.segments(),
        &[Segment::annotated("東", "とう"), Segment::annotated("京", "きょう")]
    );
}

#[test]
fn test_parse_markup_withUppercaseTags_shouldBeCaseInsensitive() {
    let unit = parse_markup("<RUBY>犬<RT>いぬ</RT></RUBY>");
    assert_eq!(unit.segments(), &[Segment::annotated("犬", "いぬ")]);
}

#[test]
fn test_parse_markup_withUnknownTags_shouldStripThemAndReport() {
    let (unit, diagnostics) = parse_markup_with_diagnostics("<b>強</b><ruby>犬<rt>いぬ</rt></ruby>");

    assert_eq!(
        unit.segments(),
        &[Segment::plain("強"), Segment::annotated("犬", "いぬ")]
    );
    assert_eq!(
        diagnostics,
        vec![
            Diagnostic::MalformedMarkup { tag: "<b>".to_string() },
            Diagnostic::MalformedMarkup { tag: "</b>".to_string() },
        ]
    );
}

#[test]
fn test_parse_markup_withUnterminatedRuby_shouldKeepTextAsPlain() {
    let (unit, diagnostics) = parse_markup_with_diagnostics("<ruby>犬<rt>いぬ");

    assert!(unit.segments().iter().all(|s| s.reading.is_none()));
    assert_eq!(unit.visible_text(), "犬いぬ");
    assert_eq!(diagnostics.len(), 2);
}

#[test]
fn test_parse_markup_withMissingReading_shouldSkipAnnotation() {
    let (unit, diagnostics) = parse_markup_with_diagnostics("a<ruby>犬</ruby>b");

    assert_eq!(unit.segments(), &[Segment::plain("a"), Segment::plain("b")]);
    assert_eq!(diagnostics, vec![Diagnostic::MissingReading { base: "犬".to_string() }]);
}

#[test]
fn test_parse_markup_withMissingBase_shouldSkipAnnotation() {
    let (unit, diagnostics) = parse_markup_with_diagnostics("<ruby><rt>いぬ</rt></ruby>");

    assert!(unit.is_empty());
    assert_eq!(diagnostics, vec![Diagnostic::MissingBase { reading: "いぬ".to_string() }]);
}

#[test]
fn test_parse_markup_withEntities_shouldDecodeText() {
    let unit = parse_markup("A&amp;B");
    assert_eq!(unit.segments(), &[Segment::plain("A&B")]);
}

#[test]
fn test_parse_markup_withNumericReferences_shouldDecodeCharacters() {
    let unit = parse_markup("&#x72AC;&#12354;");
    assert_eq!(unit.segments(), &[Segment::plain("犬あ")]);

    let unit = parse_markup("<ruby>&#x72AC;<rt>&#x3044;&#x306C;</rt></ruby>");
    assert_eq!(unit.segments(), &[Segment::annotated("犬", "いぬ")]);
}

#[test]
fn test_parse_markup_withLoneAngleBracket_shouldKeepItAsText() {
    let unit = parse_markup("1<2");
    assert_eq!(unit.segments(), &[Segment::plain("1<2")]);
}

#[test]
fn test_segment_phonetic_text_shouldPreferReading() {
    assert_eq!(Segment::annotated("犬", "いぬ").phonetic_text(), "いぬ");
    assert_eq!(Segment::plain("ねこ").phonetic_text(), "ねこ");
}

#[test]
fn test_content_unit_new_shouldExposeSegments() {
    let unit = ContentUnit::new(vec![Segment::plain("a"), Segment::annotated("b", "c")]);
    assert_eq!(unit.len(), 2);
    assert_eq!(unit.visible_text(), "ab");
}
