use std::{error::Error, fmt, io, path::PathBuf};

use machine_learning::{config::InputType, MlErr};

use crate::trainer::TrainerKind;

/// The trainers' result type.
pub type Result<T> = std::result::Result<T, TrainerErr>;

/// Trainer failures.
#[derive(Debug)]
pub enum TrainerErr {
    /// An operation that needs a model ran before one was initialized or loaded.
    Uninitialized {
        kind: TrainerKind,
        op: &'static str,
    },
    Io {
        action: &'static str,
        path: PathBuf,
        source: MlErr,
    },
    InvalidConfig(String),
    /// The loaded model was built for the other kind of trainer.
    TopologyMismatch {
        kind: TrainerKind,
        found: InputType,
    },
    Model(MlErr),
}

impl TrainerErr {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: MlErr) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for TrainerErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainerErr::Uninitialized { kind, op } => {
                write!(f, "the {kind} model must be initialized before calling {op}")
            }
            TrainerErr::Io {
                action,
                path,
                source,
            } => write!(
                f,
                "failed to {action} the model at {}: {source}",
                path.display()
            ),
            TrainerErr::InvalidConfig(msg) => write!(f, "invalid trainer configuration: {msg}"),
            TrainerErr::TopologyMismatch { kind, found } => {
                write!(f, "a {kind} trainer can't hold a model with input {found:?}")
            }
            TrainerErr::Model(e) => write!(f, "model error: {e}"),
        }
    }
}

impl Error for TrainerErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TrainerErr::Io { source, .. } => Some(source),
            TrainerErr::Model(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MlErr> for TrainerErr {
    fn from(value: MlErr) -> Self {
        match value {
            MlErr::InvalidConfig(msg) => Self::InvalidConfig(msg),
            other => Self::Model(other),
        }
    }
}

/// Boundary conversion for binaries / I/O APIs.
impl From<TrainerErr> for io::Error {
    fn from(value: TrainerErr) -> Self {
        match value {
            TrainerErr::Io {
                source: MlErr::Io(e),
                ..
            } => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
