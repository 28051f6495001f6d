//! Error type shared by the core crate.
//!
//! Engine transport and launch failures are fatal. Everything else is
//! reported and the pad keeps running. Malformed engine output is never an
//! error (see `transcoder::decode`).

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("could not start engine '{program}': {source}")]
    EngineLaunch {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("cannot write message to engine: {0}")]
    EngineWrite(#[source] io::Error),
    #[error("error flushing message to engine: {0}")]
    EngineFlush(#[source] io::Error),
    #[error("error reading from engine: {0}")]
    EngineRead(#[source] io::Error),
    #[error("engine no longer exists")]
    EngineClosed,
    #[error("cannot write samples file {}: {}", .path.display(), .source)]
    Samples {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("delegation to {target} failed: {source}")]
    Delegate {
        target: String,
        #[source]
        source: io::Error,
    },
    #[error("delegate command '{command}' exited with {status}")]
    DelegateStatus { command: String, status: ExitStatus },
    #[error("cannot read config {}: {}", .path.display(), .source)]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl Error {
    /// Whether the process must terminate after reporting this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::EngineLaunch { .. }
                | Error::EngineWrite(_)
                | Error::EngineFlush(_)
                | Error::EngineRead(_)
                | Error::EngineClosed
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_errors_are_fatal() {
        let broken = || io::Error::new(io::ErrorKind::BrokenPipe, "pipe");
        assert!(Error::EngineWrite(broken()).is_fatal());
        assert!(Error::EngineFlush(broken()).is_fatal());
        assert!(Error::EngineRead(broken()).is_fatal());
        assert!(Error::EngineClosed.is_fatal());
        assert!(Error::EngineLaunch {
            program: "kpengine".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        }
        .is_fatal());
    }

    #[test]
    fn test_side_channel_errors_are_not_fatal() {
        let err = Error::Samples {
            path: PathBuf::from("samples.dat"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!err.is_fatal());

        let parse = toml::from_str::<toml::Value>("= nope").unwrap_err();
        assert!(!Error::ConfigParse(parse).is_fatal());
    }

    #[test]
    fn test_messages_match_engine_reports() {
        assert_eq!(Error::EngineClosed.to_string(), "engine no longer exists");
        let err = Error::EngineLaunch {
            program: "/usr/local/bin/kpengine".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file"),
        };
        assert_eq!(
            err.to_string(),
            "could not start engine '/usr/local/bin/kpengine': No such file"
        );
    }
}
