/*!
 * Kana to romaji transliteration.
 *
 * Hepburn-style romanization driven by a fixed lookup table. The table covers
 * the vowels, the plain consonant rows, their voiced and semi-voiced
 * variants, and every consonant + small-y digraph. Katakana input is folded
 * onto the hiragana rows before lookup.
 *
 * The transliterator never fails: characters without an entry are copied to
 * the output unchanged.
 */

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::errors::Diagnostic;

/// Small tsu, the gemination marker
const SMALL_TSU: char = 'っ';

/// Offset between the katakana and hiragana blocks
const KATAKANA_OFFSET: u32 = 0x60;

const KANA_ENTRIES: &[(&str, &str)] = &[
    // Vowels
    ("あ", "a"), ("い", "i"), ("う", "u"), ("え", "e"), ("お", "o"),
    // Plain rows
    ("か", "ka"), ("き", "ki"), ("く", "ku"), ("け", "ke"), ("こ", "ko"),
    ("さ", "sa"), ("し", "shi"), ("す", "su"), ("せ", "se"), ("そ", "so"),
    ("た", "ta"), ("ち", "chi"), ("つ", "tsu"), ("て", "te"), ("と", "to"),
    ("な", "na"), ("に", "ni"), ("ぬ", "nu"), ("ね", "ne"), ("の", "no"),
    ("は", "ha"), ("ひ", "hi"), ("ふ", "fu"), ("へ", "he"), ("ほ", "ho"),
    ("ま", "ma"), ("み", "mi"), ("む", "mu"), ("め", "me"), ("も", "mo"),
    ("や", "ya"), ("ゆ", "yu"), ("よ", "yo"),
    ("ら", "ra"), ("り", "ri"), ("る", "ru"), ("れ", "re"), ("ろ", "ro"),
    ("わ", "wa"), ("を", "wo"), ("ん", "n"),
    // Voiced and semi-voiced
    ("が", "ga"), ("ぎ", "gi"), ("ぐ", "gu"), ("げ", "ge"), ("ご", "go"),
    ("ざ", "za"), ("じ", "ji"), ("ず", "zu"), ("ぜ", "ze"), ("ぞ", "zo"),
    ("だ", "da"), ("ぢ", "ji"), ("づ", "zu"), ("で", "de"), ("ど", "do"),
    ("ば", "ba"), ("び", "bi"), ("ぶ", "bu"), ("べ", "be"), ("ぼ", "bo"),
    ("ぱ", "pa"), ("ぴ", "pi"), ("ぷ", "pu"), ("ぺ", "pe"), ("ぽ", "po"),
    // Digraphs
    ("きゃ", "kya"), ("きゅ", "kyu"), ("きょ", "kyo"),
    ("しゃ", "sha"), ("しゅ", "shu"), ("しょ", "sho"),
    ("ちゃ", "cha"), ("ちゅ", "chu"), ("ちょ", "cho"),
    ("にゃ", "nya"), ("にゅ", "nyu"), ("にょ", "nyo"),
    ("ひゃ", "hya"), ("ひゅ", "hyu"), ("ひょ", "hyo"),
    ("みゃ", "mya"), ("みゅ", "myu"), ("みょ", "myo"),
    ("りゃ", "rya"), ("りゅ", "ryu"), ("りょ", "ryo"),
    ("ぎゃ", "gya"), ("ぎゅ", "gyu"), ("ぎょ", "gyo"),
    ("じゃ", "ja"), ("じゅ", "ju"), ("じょ", "jo"),
    ("びゃ", "bya"), ("びゅ", "byu"), ("びょ", "byo"),
    ("ぴゃ", "pya"), ("ぴゅ", "pyu"), ("ぴょ", "pyo"),
];

static KANA_TABLE: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| KANA_ENTRIES.iter().copied().collect());

/// Every digraph in the table, in table order
pub fn digraphs() -> impl Iterator<Item = (&'static str, &'static str)> {
    KANA_ENTRIES
        .iter()
        .copied()
        .filter(|(kana, _)| kana.chars().count() == 2)
}

/// Transliterate kana to romaji
///
/// Unsupported characters pass through unchanged, so ASCII input comes back
/// as-is.
pub fn transliterate(text: &str) -> String {
    transliterate_reporting(text, |_| {})
}

/// Transliterate kana to romaji, reporting every character that had no entry
pub fn transliterate_reporting(text: &str, mut report: impl FnMut(Diagnostic)) -> String {
    let originals: Vec<char> = text.chars().collect();
    let chars: Vec<char> = originals.iter().copied().map(fold_katakana).collect();
    let mut romaji = String::with_capacity(text.len());
    let mut key = String::with_capacity(8);
    let mut i = 0;

    while i < chars.len() {
        let current = chars[i];

        if current == SMALL_TSU {
            // Doubles the first letter of whatever follows, never 'n'
            if let Some(next) = chars.get(i + 1).and_then(|c| lookup_char(*c, &mut key)) {
                if let Some(first) = next.chars().next() {
                    if first != 'n' {
                        romaji.push(first);
                    }
                }
            }
            i += 1;
            continue;
        }

        if let Some(&next) = chars.get(i + 1) {
            key.clear();
            key.push(current);
            key.push(next);
            if let Some(digraph) = KANA_TABLE.get(key.as_str()) {
                romaji.push_str(digraph);
                i += 2;
                continue;
            }
        }

        match lookup_char(current, &mut key) {
            Some(single) => romaji.push_str(single),
            None => {
                let original = originals[i];
                report(Diagnostic::UnsupportedCharacter(original));
                romaji.push(original);
            }
        }
        i += 1;
    }

    romaji
}

fn lookup_char(c: char, key: &mut String) -> Option<&'static str> {
    key.clear();
    key.push(c);
    KANA_TABLE.get(key.as_str()).copied()
}

/// Map a katakana character onto its hiragana counterpart
fn fold_katakana(c: char) -> char {
    match c {
        'ァ'..='ヶ' => char::from_u32(c as u32 - KATAKANA_OFFSET).unwrap_or(c),
        _ => c,
    }
}
