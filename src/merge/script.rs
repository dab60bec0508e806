//! Script-aware character classes used by the joining heuristics.
//!
//! Each class is a membership table, not a per-language branch: supporting a
//! new script means adding its characters (or Unicode categories) here.

use regex::Regex;
use std::sync::LazyLock;

/// Characters that end a line on a word split by a line break.
pub const HYPHENS: &[char] = &[
    '-',        // hyphen-minus
    '—',        // em dash
    '¬',        // not sign, used as a break hyphen by some OCR engines
    '\u{00AD}', // soft hyphen
    '\u{2010}', // hyphen
];

/// Punctuation after which a sentence usually carries on onto the next line.
pub const SOFT_CONTINUATIONS: &[char] = &[',', ';', '(', '—', '"', '\'', '*'];

/// Sentence terminators across Latin, CJK and Thai text.
pub const SENTENCE_TERMINATORS: &[char] = &[
    '.', '?', '!',  // Latin
    '。', '！', '？', // CJK ideographic / fullwidth
    'ๆ',            // Thai
];

// Lowercase letters, caseless letters (CJK, Thai, ...) and decimal digits.
static WORD_CONTINUING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{Ll}\p{Lo}\p{Nd}]$").unwrap());

static LETTER_OR_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{Nd}]$").unwrap());

fn char_matches(re: &Regex, c: char) -> bool {
    let mut buf = [0u8; 4];
    re.is_match(c.encode_utf8(&mut buf))
}

/// Characters that can sit inside a running word: lowercase letters,
/// letters of caseless scripts and decimal digits. Uppercase letters are
/// excluded so that `Anglo-` + `Saxon` keeps its hyphen.
pub fn is_word_continuing(c: char) -> bool {
    char_matches(&WORD_CONTINUING, c)
}

/// Any letter (all scripts) or decimal digit.
pub fn is_letter_or_digit(c: char) -> bool {
    char_matches(&LETTER_OR_DIGIT, c)
}

/// Line-break hyphen.
pub fn is_hyphen(c: char) -> bool {
    HYPHENS.contains(&c)
}

/// Soft continuation punctuation.
pub fn is_soft_continuation(c: char) -> bool {
    SOFT_CONTINUATIONS.contains(&c)
}

/// Sentence terminator.
pub fn is_sentence_terminator(c: char) -> bool {
    SENTENCE_TERMINATORS.contains(&c)
}
