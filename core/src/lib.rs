//! kanjipad-core
//!
//! Stroke capture, the line protocol spoken with the external handwriting
//! recognition engine (`kpengine`), and the guess selection shared by the
//! kanjipad front ends. Nothing here draws pixels or owns a window; a front
//! end feeds pointer input, menu actions and engine output in as `PadEvent`s
//! and reads back what to show and which actions are available.
//!
//! Public API:
//! - `StrokeModel` - strokes drawn for the current character
//! - `CharacterCode` - JIS row/column pair as exchanged with the engine
//! - `GuessList` - ranked guesses from the last engine response
//! - `transcoder` - request encoding and response decoding
//! - `SelectionController` - which guess, if any, is selected
//! - `Pad` - all of the above behind one event dispatcher
//! - `EngineSession` - the engine subprocess and its pipes
//! - `SampleWriter` / `delegate` - saving samples and handing characters on
//! - `Config` - TOML configuration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kanjipad_core::{EngineCommand, EngineSession, Pad, PadEvent, PadResult, Point, RequestSink};
//!
//! let mut engine = EngineSession::start(&EngineCommand::resolve(None, None))?;
//! let mut pad = Pad::new();
//!
//! pad.handle(PadEvent::PenDown(Point::new(0, 0)));
//! pad.handle(PadEvent::PenMove(Point::new(5, 5)));
//! pad.handle(PadEvent::PenUp);
//! if let PadResult::Request(bytes) = pad.handle(PadEvent::Lookup) {
//!     engine.send_request(&bytes)?;
//! }
//! let line = engine.next_line()?;
//! pad.handle(PadEvent::EngineLine(line));
//! pad.handle(PadEvent::Pick(0));
//! println!("{:?}", pad.selection_text());
//! ```

pub mod charcode;
pub use charcode::CharacterCode;

pub mod config;
pub use config::Config;

pub mod delegate;
pub use delegate::{deliver, DelegateTarget};

pub mod engine;
pub use engine::{EngineCommand, EngineMessage, EngineSession, RequestSink};

pub mod error;
pub use error::{Error, Result};

pub mod guess;
pub use guess::{GuessList, MAX_GUESSES};

pub mod pad;
pub use pad::{GuessView, Pad, PadEvent, PadResult, PadView, Sensitivity};

pub mod samples;
pub use samples::{SampleWriter, SavedSample};

pub mod selection;
pub use selection::{Selection, SelectionController};

pub mod stroke;
pub use stroke::{Point, Stroke, StrokeModel};

pub mod transcoder;
pub use transcoder::{decode, encode};
