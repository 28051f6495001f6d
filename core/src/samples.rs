//! Training sample log.
//!
//! Each save appends one record to the samples file: a header naming the
//! character, then the strokes in request format (so the blank line ends
//! the record). The header is `"hhhh XX"` with the code in `%2x%2x` form and
//! the raw EUC-JP bytes, or `"0000 ??N"` when the character is unknown. `N`
//! counts unknown saves for the lifetime of the writer.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::charcode::CharacterCode;
use crate::error::{Error, Result};
use crate::pad::Pad;
use crate::transcoder;

/// Default samples file, relative to the working directory.
pub const DEFAULT_SAMPLES_FILE: &str = "samples.dat";

/// How a saved sample was labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavedSample {
    Known(CharacterCode),
    Unknown(u32),
}

pub struct SampleWriter {
    path: PathBuf,
    file: Option<File>,
    next_unknown_id: u32,
}

impl SampleWriter {
    /// Writer for `path`; the file is opened on first save.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        SampleWriter {
            path: path.into(),
            file: None,
            next_unknown_id: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append the pad's strokes, labelled with the selected guess.
    pub fn save(&mut self, pad: &Pad) -> Result<SavedSample> {
        let (bytes, saved) = self.record_for(pad);
        self.append(&bytes)
            .map_err(|source| Error::Samples {
                path: self.path.clone(),
                source,
            })?;
        match saved {
            SavedSample::Known(code) => info!(code = %code.to_hex(), "sample saved"),
            SavedSample::Unknown(id) => {
                // only now: a failed write must not burn an id
                self.next_unknown_id += 1;
                warn!("Unknown character saved, ID: {}", id);
            }
        }
        Ok(saved)
    }

    fn record_for(&self, pad: &Pad) -> (Vec<u8>, SavedSample) {
        let mut record = Vec::new();
        let saved = match pad.selected_guess() {
            Some(code) => {
                let [b0, b1] = code.bytes();
                record.extend_from_slice(format!("{:2x}{:2x} ", b0, b1).as_bytes());
                record.extend_from_slice(&code.euc_jp_bytes());
                record.push(b'\n');
                SavedSample::Known(code)
            }
            None => {
                let id = self.next_unknown_id;
                record.extend_from_slice(format!("0000 ??{}\n", id).as_bytes());
                SavedSample::Unknown(id)
            }
        };
        record.extend_from_slice(transcoder::encode_strokes(pad.strokes().strokes()).as_bytes());
        (record, saved)
    }

    fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
        let file = match self.file.take() {
            Some(file) => file,
            None => OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?,
        };
        let file = self.file.insert(file);
        file.write_all(bytes)?;
        file.flush()
    }
}
