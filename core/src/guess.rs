//! Ranked recognition guesses.
//!
//! A `GuessList` is replaced wholesale by every engine response; it is never
//! merged or edited in place. Rank 0 is the engine's best guess.

use crate::charcode::CharacterCode;

/// Most guesses the engine may return for one lookup.
pub const MAX_GUESSES: usize = 10;

/// The guesses currently on display, best first. Holds at most `MAX_GUESSES`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuessList {
    codes: Vec<CharacterCode>,
}

impl GuessList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from ranked codes; anything past `MAX_GUESSES` is dropped.
    pub fn from_codes(mut codes: Vec<CharacterCode>) -> Self {
        codes.truncate(MAX_GUESSES);
        GuessList { codes }
    }

    pub fn codes(&self) -> &[CharacterCode] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// The guess at rank `index`.
    pub fn get(&self, index: usize) -> Option<CharacterCode> {
        self.codes.get(index).copied()
    }

    /// Rank of `code`, if present.
    pub fn position(&self, code: CharacterCode) -> Option<usize> {
        self.codes.iter().position(|c| *c == code)
    }

    pub fn contains(&self, code: CharacterCode) -> bool {
        self.position(code).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CharacterCode> {
        self.codes.iter()
    }
}
