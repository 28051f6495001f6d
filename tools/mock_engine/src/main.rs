use anyhow::{bail, Context, Result};
use clap::Parser;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// A few guesses per stroke count, enough to click through the pad.
/// Same format as `--data-file`: `<stroke-count> <hex> <hex> ...`.
const BUILTIN_TABLE: &str = "\
# one stroke
1 306c 3235
# two strokes
2 4673 3f4d 467e 482c 4e4f 3d3d 3c37
# three strokes
3 387d 406e 3b33 3b30 455a 4267 3d77 3b52 3e65 323c
";

#[derive(Parser)]
#[command(name = "kpengine-mock")]
#[command(about = "Pretend recognition engine: answers each request by stroke count")]
struct Cli {
    /// Table of `<stroke-count> <hex>...` lines replacing the built-in one
    #[arg(short = 'f', long = "data-file")]
    data_file: Option<PathBuf>,
}

/// Guesses to answer with, keyed by number of strokes.
#[derive(Debug, Default, PartialEq, Eq)]
struct GuessTable {
    by_strokes: BTreeMap<usize, Vec<String>>,
}

impl GuessTable {
    fn parse(text: &str) -> Result<Self> {
        let mut by_strokes = BTreeMap::new();
        for (n, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split_whitespace();
            let count = parts.next().unwrap_or_default();
            let count: usize = count
                .parse()
                .with_context(|| format!("line {}: bad stroke count '{}'", n + 1, count))?;
            let mut codes = Vec::new();
            for code in parts {
                if code.len() != 4 || !code.bytes().all(|b| b.is_ascii_hexdigit()) {
                    bail!("line {}: '{}' is not a 4-digit hex code", n + 1, code);
                }
                codes.push(code.to_ascii_lowercase());
            }
            by_strokes.insert(count, codes);
        }
        Ok(GuessTable { by_strokes })
    }

    /// The `K` line for a request with `strokes` strokes.
    fn response(&self, strokes: usize) -> String {
        let mut line = String::from("K");
        for code in self.by_strokes.get(&strokes).into_iter().flatten() {
            line.push(' ');
            line.push_str(code);
        }
        line
    }
}

/// Answer requests from `input` until it closes.
fn serve<R: BufRead, W: Write>(table: &GuessTable, input: R, mut output: W) -> Result<()> {
    writeln!(output, "kpengine-mock ready, {} stroke counts known", table.by_strokes.len())?;
    output.flush()?;

    let mut strokes = 0;
    for line in input.lines() {
        let line = line.context("reading request")?;
        if line.is_empty() {
            writeln!(output, "{}", table.response(strokes))?;
            output.flush()?;
            strokes = 0;
        } else {
            strokes += 1;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let table = match &cli.data_file {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            GuessTable::parse(&text)?
        }
        None => GuessTable::parse(BUILTIN_TABLE)?,
    };
    let stdin = io::stdin();
    let stdout = io::stdout();
    serve(&table, stdin.lock(), stdout.lock())
}
