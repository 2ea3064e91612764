//! Text normalization used for guess comparison.
//!
//! `normalize` folds accents, drops punctuation and squeezes whitespace so
//! that "Café!" and "cafe" compare equal once upper-cased.

use std::collections::BTreeSet;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Word characters in the regular-expression sense: `[A-Za-z0-9_]`.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Canonical form of `text`.
///
/// Decomposes to NFD and strips combining marks, drops every character that
/// is neither a word character nor whitespace, collapses whitespace runs to
/// one space and trims both ends. Idempotent.
///
/// ```
/// use pixdex::game::normalize::normalize;
///
/// assert_eq!(normalize("Café!  "), "Cafe");
/// assert_eq!(normalize("  Mad Max:   Fury Road "), "Mad Max Fury Road");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.nfd() {
        if is_combining_mark(c) {
            continue;
        }
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if is_word_char(c) {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(c);
        }
    }

    out
}

/// `normalize` followed by upper-casing; the form titles are compared in.
pub fn canonical_title(text: &str) -> String {
    normalize(text).to_ascii_uppercase()
}

/// Letters a letter-by-letter solve of `name` has to cover.
pub fn target_letters(name: &str) -> BTreeSet<char> {
    normalize(name)
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Uppercase guessable letter for `c`, if it has one.
///
/// Accented letters fold to their base (`é` -> `E`); anything that does not
/// normalize to a single ASCII letter yields `None`.
pub fn letter_of(c: char) -> Option<char> {
    let mut buf = [0u8; 4];
    let folded = normalize(c.encode_utf8(&mut buf));
    let mut chars = folded.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_ascii_alphabetic() => Some(letter.to_ascii_uppercase()),
        _ => None,
    }
}

/// First character upper-cased, the rest lower-cased.
///
/// ```
/// use pixdex::game::normalize::capitalize;
///
/// assert_eq!(capitalize("acción"), "Acción");
/// assert_eq!(capitalize("CIENCIA FICCIÓN"), "Ciencia ficción");
/// ```
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
