//! Hand the selected character to somewhere else.
//!
//! Three targets: standard output, a file the text is appended to, or an
//! external command that receives the text as its last argument. Failures
//! are reported to the caller; none of them touch the pad.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelegateTarget {
    Stdout,
    File(PathBuf),
    /// Whitespace separated program and leading arguments
    Command(String),
}

impl fmt::Display for DelegateTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelegateTarget::Stdout => f.write_str("stdout"),
            DelegateTarget::File(path) => write!(f, "file {}", path.display()),
            DelegateTarget::Command(cmd) => write!(f, "command '{}'", cmd),
        }
    }
}

/// Deliver `text` to `target`. `stdout` is where `Stdout` writes go.
pub fn deliver<W: Write>(target: &DelegateTarget, text: &str, stdout: &mut W) -> Result<()> {
    let io_error = |source: std::io::Error| Error::Delegate {
        target: target.to_string(),
        source,
    };
    match target {
        DelegateTarget::Stdout => {
            writeln!(stdout, "{}", text).map_err(io_error)?;
            stdout.flush().map_err(io_error)?;
        }
        DelegateTarget::File(path) => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(io_error)?;
            writeln!(file, "{}", text).map_err(io_error)?;
        }
        DelegateTarget::Command(cmdline) => {
            let mut words = cmdline.split_whitespace();
            let Some(program) = words.next() else {
                return Err(io_error(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "empty delegate command",
                )));
            };
            let status = Command::new(program)
                .args(words)
                .arg(text)
                .status()
                .map_err(io_error)?;
            if !status.success() {
                return Err(Error::DelegateStatus {
                    command: cmdline.clone(),
                    status,
                });
            }
        }
    }
    debug!(%target, "character delegated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deliver_to_stdout_writer() {
        let mut out = Vec::new();
        deliver(&DelegateTarget::Stdout, "亜", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "亜\n");
    }

    #[test]
    fn test_deliver_appends_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picked.txt");
        let target = DelegateTarget::File(path.clone());
        let mut out = Vec::new();

        deliver(&target, "亜", &mut out).unwrap();
        deliver(&target, "あ", &mut out).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "亜\nあ\n");
        assert!(out.is_empty());
    }

    #[test]
    fn test_empty_command_is_rejected() {
        let err = deliver(&DelegateTarget::Command("  ".into()), "亜", &mut Vec::new()).unwrap_err();
        assert!(matches!(err, Error::Delegate { .. }));
        assert!(!err.is_fatal());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_receives_text_as_last_argument() {
        // `test -n <text>` succeeds only if the text arrived as an argument
        deliver(&DelegateTarget::Command("test -n".into()), "亜", &mut Vec::new()).unwrap();

        let err = deliver(&DelegateTarget::Command("test -z".into()), "亜", &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, Error::DelegateStatus { .. }));
    }

    #[test]
    fn test_missing_program_is_reported() {
        let target = DelegateTarget::Command("/nonexistent/kanjipad-delegate".into());
        let err = deliver(&target, "亜", &mut Vec::new()).unwrap_err();
        assert!(matches!(err, Error::Delegate { .. }));
    }
}
