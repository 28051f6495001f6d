//! Guess selection state machine.
//!
//! The selection is either empty or one code taken from the current guess
//! list. It only becomes `Selected` through `pick` on a row inside the list,
//! and it is dropped whenever the list is replaced or the user clicks outside
//! the rows.

use crate::charcode::CharacterCode;
use crate::guess::GuessList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    NoSelection,
    Selected(CharacterCode),
}

#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: Selection,
}

impl SelectionController {
    /// Start with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Selection {
        self.state
    }

    /// User clicked row `index` of the guess list.
    ///
    /// Rows past the end of the list clear the selection. A row holding the
    /// zero/zero code also clears it, since that pair means "nothing".
    pub fn pick(&mut self, guesses: &GuessList, index: usize) -> Selection {
        self.state = match guesses.get(index) {
            Some(code) if !code.is_sentinel() => Selection::Selected(code),
            _ => Selection::NoSelection,
        };
        self.state
    }

    /// A new guess list replaced the old one.
    pub fn guesses_replaced(&mut self) {
        self.state = Selection::NoSelection;
    }

    /// Explicit clear, e.g. when clipboard ownership is lost.
    pub fn clear(&mut self) {
        self.state = Selection::NoSelection;
    }

    pub fn has_selection(&self) -> bool {
        matches!(self.state, Selection::Selected(_))
    }

    pub fn selected(&self) -> Option<CharacterCode> {
        match self.state {
            Selection::Selected(code) => Some(code),
            Selection::NoSelection => None,
        }
    }
}
