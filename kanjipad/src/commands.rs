//! Line commands typed at the pad.
//!
//! Single letters are the keyboard accelerators of the menu: `l` lookup,
//! `x` clear, `w` save, `c` copy, `p`/`f`/`e` for the three delegations.

use anyhow::{anyhow, bail, Context, Result};
use kanjipad_core::Point;

/// Where a delegated character goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelegateKind {
    Stdout,
    File,
    Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Down(Point),
    Move(Point),
    Up,
    /// A whole stroke: down at the first point, through the rest, up
    Stroke(Vec<Point>),
    Lookup,
    Clear,
    /// 1-based row as displayed
    Pick(usize),
    Unselect,
    Copy,
    Save,
    Annotate,
    Delegate(DelegateKind),
    Status,
    Help,
    Quit,
    /// Blank line
    Nothing,
}

pub const HELP: &str = "\
commands:
  down X Y | move X Y | up     draw with the pen
  stroke X1 Y1 X2 Y2 ...       draw a whole stroke
  lookup, l                    ask the engine
  clear, x                     erase the strokes
  pick N                       select guess N (other rows clear the selection)
  unselect                     drop the selection
  copy, c                      print the selected character
  save, w                      append the sample to the samples file
  annotate                     toggle stroke numbering
  stdout, p | file, f | exec, e
                               hand the selection on
  status                       pad state as JSON
  help | quit, q";

/// Parse one input line.
pub fn parse(line: &str) -> Result<Command> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(Command::Nothing);
    };
    let args: Vec<&str> = words.collect();

    let command = match name {
        "down" => Command::Down(point(&args)?),
        "move" => Command::Move(point(&args)?),
        "up" => no_args(Command::Up, &args)?,
        "stroke" => Command::Stroke(points(&args)?),
        "lookup" | "l" => no_args(Command::Lookup, &args)?,
        "clear" | "x" => no_args(Command::Clear, &args)?,
        "pick" => match args.as_slice() {
            [row] => Command::Pick(
                row.parse()
                    .with_context(|| format!("not a row number: {}", row))?,
            ),
            _ => bail!("usage: pick N"),
        },
        "unselect" => no_args(Command::Unselect, &args)?,
        "copy" | "c" => no_args(Command::Copy, &args)?,
        "save" | "w" => no_args(Command::Save, &args)?,
        "annotate" => no_args(Command::Annotate, &args)?,
        "stdout" | "p" => no_args(Command::Delegate(DelegateKind::Stdout), &args)?,
        "file" | "f" => no_args(Command::Delegate(DelegateKind::File), &args)?,
        "exec" | "e" => no_args(Command::Delegate(DelegateKind::Command), &args)?,
        "status" => no_args(Command::Status, &args)?,
        "help" | "?" => Command::Help,
        "quit" | "q" => Command::Quit,
        other => bail!("unknown command '{}' (try 'help')", other),
    };
    Ok(command)
}

fn no_args(command: Command, args: &[&str]) -> Result<Command> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(anyhow!("{:?} takes no arguments", command))
    }
}

fn coordinate(word: &str) -> Result<i32> {
    word.parse()
        .with_context(|| format!("not a coordinate: {}", word))
}

fn point(args: &[&str]) -> Result<Point> {
    match args {
        [x, y] => Ok(Point::new(coordinate(x)?, coordinate(y)?)),
        _ => bail!("expected X Y"),
    }
}

fn points(args: &[&str]) -> Result<Vec<Point>> {
    if args.is_empty() || args.len() % 2 != 0 {
        bail!("expected X1 Y1 [X2 Y2 ...]");
    }
    args.chunks(2)
        .map(|pair| Ok(Point::new(coordinate(pair[0])?, coordinate(pair[1])?)))
        .collect()
}
