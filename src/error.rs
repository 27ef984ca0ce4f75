use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Which part of a run a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    KeyLoading,
    DataProcessing,
    Writing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::KeyLoading => "key loading",
            Stage::DataProcessing => "data processing",
            Stage::Writing => "writing",
        };
        f.write_str(name)
    }
}

/// Fatal errors. Decode and short-line anomalies are recovered in place and never surface here.
#[derive(Debug, Error)]
pub enum XrefError {
    #[error("cannot open {}: {source}", .path.display())]
    SourceUnavailable {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read {}: {source}", .path.display())]
    SourceRead {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("configuration error: {0}")]
    Config(String),
}

impl XrefError {
    pub fn stage(&self) -> Option<Stage> {
        match self {
            XrefError::SourceUnavailable { stage, .. } | XrefError::SourceRead { stage, .. } => {
                Some(*stage)
            }
            XrefError::OutputWrite { .. } => Some(Stage::Writing),
            XrefError::Config(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, XrefError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_of_each_variant() {
        let missing = || io::Error::new(io::ErrorKind::NotFound, "gone");
        let keys = XrefError::SourceUnavailable {
            stage: Stage::KeyLoading,
            path: PathBuf::from("keys.csv"),
            source: missing(),
        };
        assert_eq!(keys.stage(), Some(Stage::KeyLoading));

        let read = XrefError::SourceRead {
            stage: Stage::DataProcessing,
            path: PathBuf::from("data.imp"),
            source: missing(),
        };
        assert_eq!(read.stage(), Some(Stage::DataProcessing));

        let write = XrefError::OutputWrite {
            path: PathBuf::from("out.csv"),
            source: missing(),
        };
        assert_eq!(write.stage(), Some(Stage::Writing));
        assert_eq!(XrefError::Config("bad".into()).stage(), None);
    }

    #[test]
    fn test_message_names_path() {
        let err = XrefError::SourceUnavailable {
            stage: Stage::DataProcessing,
            path: PathBuf::from("data.imp"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "cannot open data.imp: gone");
        assert_eq!(Stage::DataProcessing.to_string(), "data processing");
    }
}
