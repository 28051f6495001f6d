//! Wire format spoken with the recognition engine.
//!
//! Request: one line per stroke, each point as `"<x> <y> "` (decimal, note
//! the trailing space), then a bare newline closing the message. An empty
//! model is just the bare newline.
//!
//! Response: lines starting with `K` carry up to `MAX_GUESSES` codes as
//! whitespace separated 4-hex-digit tokens. Any other line is ignored.
//! Parsing stops quietly at the first token that is not a code; the codes
//! read before it are kept.

use std::fmt::Write as _;

use tracing::{debug, warn};

use crate::charcode::CharacterCode;
use crate::guess::{GuessList, MAX_GUESSES};
use crate::stroke::{Stroke, StrokeModel};

/// First character of a response line that carries guesses.
pub const GUESS_MARKER: char = 'K';

/// Encode the committed strokes of `model` as one request message.
pub fn encode(model: &StrokeModel) -> Vec<u8> {
    encode_strokes(model.strokes()).into_bytes()
}

/// Text form of the stroke block, shared with the samples file.
pub fn encode_strokes(strokes: &[Stroke]) -> String {
    let mut message = String::new();
    for stroke in strokes {
        for point in stroke.points() {
            // Writing to a String cannot fail.
            let _ = write!(message, "{} {} ", point.x, point.y);
        }
        message.push('\n');
    }
    message.push('\n');
    message
}

/// Decode one engine response line.
///
/// Returns `None` when the line carries no guess update.
pub fn decode(line: &str) -> Option<GuessList> {
    let Some(rest) = line.strip_prefix(GUESS_MARKER) else {
        debug!(line = line.trim_end(), "ignoring engine line");
        return None;
    };

    let bytes = rest.as_bytes();
    let mut pos = 0;
    let mut codes = Vec::with_capacity(MAX_GUESSES);
    while codes.len() < MAX_GUESSES {
        while pos < bytes.len() && is_space(bytes[pos]) {
            pos += 1;
        }
        let end = bytes[pos..]
            .iter()
            .position(|b| is_space(*b))
            .map_or(bytes.len(), |n| pos + n);
        // pos and end sit on ASCII whitespace or the ends, so both are char boundaries
        match CharacterCode::from_hex_prefix(&rest[pos..end]) {
            Some(code) => codes.push(code),
            None => {
                if pos < bytes.len() {
                    warn!(token = &rest[pos..end], parsed = codes.len(), "guess list cut short");
                }
                break;
            }
        }
        pos = end;
    }

    Some(GuessList::from_codes(codes))
}

/// Whitespace as the C locale classifies it (includes vertical tab).
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}
