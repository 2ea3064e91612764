//! Partially revealed rendering of the target title.

use super::{constants::HIDDEN_GLYPH, normalize::letter_of};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt};

/// One rendered character of the title
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Glyph {
    Space,
    Revealed(char),
    Hidden,
}

/// The target title with unguessed letters blanked out.
///
/// Displays glyph-by-glyph separated by single spaces, e.g. `D _ r k`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct MaskedWord(pub Vec<Glyph>);

impl MaskedWord {
    pub fn glyphs(&self) -> &[Glyph] {
        &self.0
    }

    pub fn hidden_count(&self) -> usize {
        self.0.iter().filter(|g| matches!(g, Glyph::Hidden)).count()
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.hidden_count() == 0
    }
}

impl fmt::Display for MaskedWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, glyph) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match glyph {
                Glyph::Space => f.write_str(" ")?,
                Glyph::Revealed(c) => write!(f, "{c}")?,
                Glyph::Hidden => write!(f, "{HIDDEN_GLYPH}")?,
            }
        }
        Ok(())
    }
}

/// Mask `name` against the set of guessed uppercase letters.
///
/// Whitespace is kept, characters that fold to a guessable letter are shown
/// only once that letter is guessed, everything else (digits, punctuation) is
/// always shown. The original characters are preserved, accents included.
pub fn mask(name: &str, guessed: &BTreeSet<char>) -> MaskedWord {
    MaskedWord(
        name.chars()
            .map(|c| {
                if c.is_whitespace() {
                    return Glyph::Space;
                }
                match letter_of(c) {
                    Some(letter) if !guessed.contains(&letter) => Glyph::Hidden,
                    _ => Glyph::Revealed(c),
                }
            })
            .collect(),
    )
}
