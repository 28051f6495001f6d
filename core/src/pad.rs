//! Pad state with event dispatch.
//!
//! `Pad` owns everything the front end draws from: the strokes, the guesses
//! from the last engine response and the selection among them. Front ends
//! turn pointer input, menu actions and engine output into `PadEvent`s and
//! feed them to `handle()` one at a time; each event runs to completion
//! before the next, so an engine response can never interleave with a pick.

use serde::Serialize;
use tracing::debug;

use crate::charcode::CharacterCode;
use crate::guess::GuessList;
use crate::selection::SelectionController;
use crate::stroke::{Point, StrokeModel};
use crate::transcoder;

/// Events the pad reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PadEvent {
    /// Pointer pressed in the drawing area
    PenDown(Point),
    /// Pointer moved while pressed
    PenMove(Point),
    /// Pointer released
    PenUp,
    /// Ask the engine about the current strokes
    Lookup,
    /// Erase all strokes
    Clear,
    /// Click on guess row `n` (0-based; rows past the list clear the selection)
    Pick(usize),
    /// Drop the selection, e.g. clipboard ownership lost
    ClearSelection,
    /// Flip the annotate display hint
    ToggleAnnotate,
    /// One line read from the engine
    EngineLine(String),
}

/// What the front end has to do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PadResult {
    /// Nothing visible changed
    Unchanged,
    /// Redraw and recompute sensitivity
    Changed,
    /// Send these bytes to the engine
    Request(Vec<u8>),
}

/// Which actions are currently available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sensitivity {
    pub copy: bool,
    pub lookup: bool,
    pub clear: bool,
    pub save: bool,
}

/// One guess row as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuessView {
    pub text: String,
    pub code: String,
}

/// Serializable snapshot of the pad for front ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PadView {
    pub guesses: Vec<GuessView>,
    pub selected: Option<usize>,
    pub strokes: usize,
    pub annotate: bool,
    pub sensitivity: Sensitivity,
}

#[derive(Debug, Clone, Default)]
pub struct Pad {
    strokes: StrokeModel,
    guesses: GuessList,
    selection: SelectionController,
}

impl Pad {
    /// Create an empty pad.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strokes(&self) -> &StrokeModel {
        &self.strokes
    }

    pub fn strokes_mut(&mut self) -> &mut StrokeModel {
        &mut self.strokes
    }

    pub fn guesses(&self) -> &GuessList {
        &self.guesses
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn has_strokes(&self) -> bool {
        !self.strokes.is_empty()
    }

    pub fn has_selection(&self) -> bool {
        self.selection.has_selection()
    }

    /// Dispatch one event.
    pub fn handle(&mut self, event: PadEvent) -> PadResult {
        match event {
            PadEvent::PenDown(point) => {
                self.strokes.begin_stroke(point);
                PadResult::Changed
            }
            PadEvent::PenMove(point) => {
                if self.strokes.extend_stroke(point) {
                    PadResult::Changed
                } else {
                    PadResult::Unchanged
                }
            }
            PadEvent::PenUp => {
                if self.strokes.end_stroke() {
                    PadResult::Changed
                } else {
                    PadResult::Unchanged
                }
            }
            PadEvent::Lookup => self.lookup(),
            PadEvent::Clear => {
                self.strokes.clear();
                PadResult::Changed
            }
            PadEvent::Pick(index) => {
                self.selection.pick(&self.guesses, index);
                PadResult::Changed
            }
            PadEvent::ClearSelection => {
                self.selection.clear();
                PadResult::Changed
            }
            PadEvent::ToggleAnnotate => {
                self.strokes.toggle_annotate();
                PadResult::Changed
            }
            PadEvent::EngineLine(line) => match transcoder::decode(&line) {
                Some(guesses) => {
                    self.replace_guesses(guesses);
                    PadResult::Changed
                }
                None => PadResult::Unchanged,
            },
        }
    }

    fn lookup(&mut self) -> PadResult {
        if !self.has_strokes() {
            debug!("lookup with no strokes ignored");
            return PadResult::Unchanged;
        }
        let request = transcoder::encode(&self.strokes);
        debug!(strokes = self.strokes.len(), bytes = request.len(), "lookup request");
        PadResult::Request(request)
    }

    /// Install a new guess list. The selection never survives this.
    pub fn replace_guesses(&mut self, guesses: GuessList) {
        debug!(count = guesses.len(), "guess list replaced");
        self.guesses = guesses;
        self.selection.guesses_replaced();
    }

    /// Row index of the selected guess, for highlighting.
    pub fn selected_index(&self) -> Option<usize> {
        self.selection
            .selected()
            .and_then(|code| self.guesses.position(code))
    }

    /// The selected code if it is still one of the guesses.
    pub fn selected_guess(&self) -> Option<CharacterCode> {
        self.selection
            .selected()
            .filter(|code| self.guesses.contains(*code))
    }

    /// Display text of the selection, for copy and delegation.
    pub fn selection_text(&self) -> Option<String> {
        self.selection.selected()?.to_display_string()
    }

    pub fn sensitivity(&self) -> Sensitivity {
        let have_strokes = self.has_strokes();
        Sensitivity {
            copy: self.has_selection(),
            lookup: have_strokes,
            clear: have_strokes,
            save: have_strokes,
        }
    }

    pub fn view(&self) -> PadView {
        PadView {
            guesses: self
                .guesses
                .iter()
                .map(|code| GuessView {
                    text: code.to_string(),
                    code: code.to_hex(),
                })
                .collect(),
            selected: self.selected_index(),
            strokes: self.strokes.len(),
            annotate: self.strokes.annotate(),
            sensitivity: self.sensitivity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Selection;

    fn draw(pad: &mut Pad, points: &[(i32, i32)]) {
        let mut iter = points.iter();
        if let Some(&(x, y)) = iter.next() {
            pad.handle(PadEvent::PenDown(Point::new(x, y)));
        }
        for &(x, y) in iter {
            pad.handle(PadEvent::PenMove(Point::new(x, y)));
        }
        pad.handle(PadEvent::PenUp);
    }

    #[test]
    fn test_new_pad() {
        let pad = Pad::new();
        assert!(!pad.has_strokes());
        assert!(!pad.has_selection());
        assert!(pad.guesses().is_empty());
        assert_eq!(
            pad.sensitivity(),
            Sensitivity {
                copy: false,
                lookup: false,
                clear: false,
                save: false
            }
        );
    }

    #[test]
    fn test_lookup_without_strokes_sends_nothing() {
        let mut pad = Pad::new();
        assert_eq!(pad.handle(PadEvent::Lookup), PadResult::Unchanged);
    }

    #[test]
    fn test_lookup_encodes_strokes() {
        let mut pad = Pad::new();
        draw(&mut pad, &[(0, 0), (5, 5)]);
        assert_eq!(
            pad.handle(PadEvent::Lookup),
            PadResult::Request(b"0 0 5 5 \n\n".to_vec())
        );
    }

    #[test]
    fn test_stray_pen_events() {
        let mut pad = Pad::new();
        assert_eq!(pad.handle(PadEvent::PenMove(Point::new(1, 1))), PadResult::Unchanged);
        assert_eq!(pad.handle(PadEvent::PenUp), PadResult::Unchanged);
        assert!(!pad.has_strokes());
    }

    #[test]
    fn test_engine_line_replaces_guesses_and_clears_selection() {
        let mut pad = Pad::new();
        pad.handle(PadEvent::EngineLine("K 3021 3022\n".into()));
        pad.handle(PadEvent::Pick(1));
        assert!(pad.has_selection());

        assert_eq!(
            pad.handle(PadEvent::EngineLine("K 2422\n".into())),
            PadResult::Changed
        );
        assert_eq!(pad.guesses().len(), 1);
        assert_eq!(pad.selection().state(), Selection::NoSelection);
    }

    #[test]
    fn test_ignored_engine_line_keeps_state() {
        let mut pad = Pad::new();
        pad.handle(PadEvent::EngineLine("K 3021\n".into()));
        pad.handle(PadEvent::Pick(0));
        assert_eq!(
            pad.handle(PadEvent::EngineLine("engine ready\n".into())),
            PadResult::Unchanged
        );
        assert!(pad.has_selection());
        assert_eq!(pad.guesses().len(), 1);
    }

    #[test]
    fn test_empty_response_still_replaces() {
        let mut pad = Pad::new();
        pad.handle(PadEvent::EngineLine("K 3021\n".into()));
        pad.handle(PadEvent::Pick(0));
        pad.handle(PadEvent::EngineLine("K\n".into()));
        assert!(pad.guesses().is_empty());
        assert!(!pad.has_selection());
    }

    #[test]
    fn test_pick_outside_rows_clears_selection() {
        let mut pad = Pad::new();
        pad.handle(PadEvent::EngineLine("K 3021\n".into()));
        pad.handle(PadEvent::Pick(0));
        pad.handle(PadEvent::Pick(5));
        assert!(!pad.has_selection());
        assert_eq!(pad.selection_text(), None);
    }

    #[test]
    fn test_clear_keeps_guesses() {
        let mut pad = Pad::new();
        draw(&mut pad, &[(1, 1)]);
        pad.handle(PadEvent::EngineLine("K 3021\n".into()));
        pad.handle(PadEvent::Pick(0));

        pad.handle(PadEvent::Clear);
        pad.handle(PadEvent::Clear);
        assert!(!pad.has_strokes());
        assert!(pad.has_selection());
        assert_eq!(pad.guesses().len(), 1);
    }

    #[test]
    fn test_sensitivity_follows_state() {
        let mut pad = Pad::new();
        draw(&mut pad, &[(1, 1), (2, 2)]);
        let s = pad.sensitivity();
        assert!(s.lookup && s.clear && s.save);
        assert!(!s.copy);

        pad.handle(PadEvent::EngineLine("K 3021\n".into()));
        pad.handle(PadEvent::Pick(0));
        assert!(pad.sensitivity().copy);

        pad.handle(PadEvent::ClearSelection);
        assert!(!pad.sensitivity().copy);
    }

    #[test]
    fn test_view_snapshot() {
        let mut pad = Pad::new();
        draw(&mut pad, &[(1, 1)]);
        pad.handle(PadEvent::ToggleAnnotate);
        pad.handle(PadEvent::EngineLine("K 3021 2422\n".into()));
        pad.handle(PadEvent::Pick(1));

        let view = pad.view();
        assert_eq!(view.strokes, 1);
        assert!(view.annotate);
        assert_eq!(view.selected, Some(1));
        assert_eq!(view.guesses[0].text, "亜");
        assert_eq!(view.guesses[1].code, "2422");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["guesses"][1]["text"], "あ");
        assert_eq!(json["sensitivity"]["copy"], true);
    }
}
