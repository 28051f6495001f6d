//! Command dispatch for the line front end.
//!
//! `App` wraps a `Pad` with everything the menu actions need: the request
//! sink, the sample writer, the delegate settings and somewhere to print.
//! User commands and engine lines both end up in `Pad::handle`, one at a
//! time, from the same thread.

use std::io::Write;

use anyhow::Result;
use kanjipad_core::{
    deliver, Config, DelegateTarget, Pad, PadEvent, PadResult, RequestSink, SampleWriter,
    SavedSample,
};
use tracing::{debug, warn};

use crate::commands::{Command, DelegateKind, HELP};

/// Whether the dispatch loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<S, W> {
    pad: Pad,
    sink: S,
    samples: SampleWriter,
    config: Config,
    out: W,
}

impl<S: RequestSink, W: Write> App<S, W> {
    pub fn new(sink: S, config: Config, out: W) -> Self {
        let mut pad = Pad::new();
        pad.strokes_mut().set_annotate(config.annotate);
        App {
            pad,
            sink,
            samples: SampleWriter::new(config.samples_path.clone()),
            config,
            out,
        }
    }

    /// Run one user command.
    ///
    /// Errors returned here are fatal. Failures the pad survives (saving,
    /// delegating) are printed and the loop continues.
    pub fn handle_command(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Nothing => {}
            Command::Down(point) => self.apply(PadEvent::PenDown(point))?,
            Command::Move(point) => self.apply(PadEvent::PenMove(point))?,
            Command::Up => self.apply(PadEvent::PenUp)?,
            Command::Stroke(points) => {
                let mut points = points.into_iter();
                if let Some(first) = points.next() {
                    self.pad.handle(PadEvent::PenDown(first));
                    for point in points {
                        self.pad.handle(PadEvent::PenMove(point));
                    }
                    self.apply(PadEvent::PenUp)?;
                }
            }
            Command::Lookup => {
                if !self.pad.has_strokes() {
                    writeln!(self.out, "nothing to look up")?;
                }
                self.apply(PadEvent::Lookup)?;
            }
            Command::Clear => self.apply(PadEvent::Clear)?,
            Command::Pick(row) => {
                let event = match row.checked_sub(1) {
                    Some(index) => PadEvent::Pick(index),
                    None => PadEvent::ClearSelection,
                };
                self.apply(event)?;
            }
            Command::Unselect => self.apply(PadEvent::ClearSelection)?,
            Command::Annotate => self.apply(PadEvent::ToggleAnnotate)?,
            Command::Copy => match self.pad.selection_text() {
                Some(text) => writeln!(self.out, "{}", text)?,
                None => writeln!(self.out, "nothing selected")?,
            },
            Command::Save => self.save()?,
            Command::Delegate(kind) => self.delegate(kind)?,
            Command::Status => {
                let json = serde_json::to_string(&self.pad.view())?;
                writeln!(self.out, "{}", json)?;
            }
            Command::Help => writeln!(self.out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        self.out.flush()?;
        Ok(Flow::Continue)
    }

    /// Apply one line read from the engine.
    pub fn handle_engine_line(&mut self, line: String) -> Result<()> {
        self.apply(PadEvent::EngineLine(line))?;
        self.out.flush()?;
        Ok(())
    }

    /// Print a command that could not be parsed.
    pub fn report(&mut self, err: &anyhow::Error) -> Result<()> {
        writeln!(self.out, "error: {:#}", err)?;
        self.out.flush()?;
        Ok(())
    }

    fn apply(&mut self, event: PadEvent) -> Result<()> {
        match self.pad.handle(event) {
            PadResult::Unchanged => {}
            PadResult::Changed => self.render()?,
            PadResult::Request(bytes) => self.sink.send_request(&bytes)?,
        }
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        if !self.pad.sensitivity().save {
            writeln!(self.out, "nothing to save")?;
            return Ok(());
        }
        match self.samples.save(&self.pad) {
            Ok(SavedSample::Known(code)) => writeln!(
                self.out,
                "saved {} ({}) to {}",
                code,
                code.to_hex(),
                self.samples.path().display()
            )?,
            Ok(SavedSample::Unknown(id)) => writeln!(
                self.out,
                "saved unknown character #{} to {}",
                id,
                self.samples.path().display()
            )?,
            Err(err) => {
                warn!(%err, "save failed");
                writeln!(self.out, "error: {}", err)?;
            }
        }
        Ok(())
    }

    fn delegate(&mut self, kind: DelegateKind) -> Result<()> {
        let Some(text) = self.pad.selection_text() else {
            writeln!(self.out, "nothing selected")?;
            return Ok(());
        };
        let target = match kind {
            DelegateKind::Stdout => Some(DelegateTarget::Stdout),
            DelegateKind::File => self.config.file_target(),
            DelegateKind::Command => self.config.command_target(),
        };
        let Some(target) = target else {
            writeln!(self.out, "no delegate {:?} configured", kind)?;
            return Ok(());
        };
        if let Err(err) = deliver(&target, &text, &mut self.out) {
            warn!(%err, "delegation failed");
            writeln!(self.out, "error: {}", err)?;
        } else {
            debug!(%target, "delegated {}", text);
        }
        Ok(())
    }

    /// Print the guess list and the actions currently available.
    pub fn render(&mut self) -> Result<()> {
        let view = self.pad.view();
        let strokes = self.pad.strokes().strokes();
        writeln!(self.out, "strokes: {}", view.strokes)?;
        if view.annotate {
            for (n, stroke) in strokes.iter().enumerate() {
                if let Some(start) = stroke.points().first() {
                    writeln!(self.out, "  {} at ({}, {})", n + 1, start.x, start.y)?;
                }
            }
        }

        if view.guesses.is_empty() {
            writeln!(self.out, "guesses: none")?;
        } else {
            writeln!(self.out, "guesses:")?;
            for (row, guess) in view.guesses.iter().enumerate() {
                let marker = if view.selected == Some(row) { " *" } else { "" };
                writeln!(self.out, "  {:>2}. {} {}{}", row + 1, guess.text, guess.code, marker)?;
            }
        }

        let s = view.sensitivity;
        let enabled: Vec<&str> = [
            (s.lookup, "lookup"),
            (s.clear, "clear"),
            (s.save, "save"),
            (s.copy, "copy"),
        ]
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, name)| *name)
        .collect();
        if enabled.is_empty() {
            writeln!(self.out, "actions: none")?;
        } else {
            writeln!(self.out, "actions: {}", enabled.join(" "))?;
        }
        Ok(())
    }
}
