use std::{io, path::PathBuf};

use crate::{program::ProgramState, shader::StageKind};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything a program operation can report back to the caller.
///
/// None of these abort anything: the program stays usable (or at least
/// droppable) after any of them, and the caller decides whether to go on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read \"{}\"", .path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("[{} Shader] Compilation failed\n{log}", .stage.name())]
    Compile { stage: StageKind, log: String },

    #[error("[Shader Program] Linking failed\n{log}")]
    Link { log: String },

    #[error("cannot link while a stage kind's last add failed")]
    FailedStage,

    #[error("uniform upload to a program that is not bound")]
    NotBound,

    #[error("unknown shader stage enum {0:#x}")]
    UnknownStage(u32),

    #[error("uniform \"{0}\" not found in program")]
    UniformNotFound(String),

    #[error("failed to create program: {0}")]
    CreateProgram(String),

    #[error("failed to create {} shader: {reason}", .stage.name())]
    CreateShader { stage: StageKind, reason: String },

    #[error("cannot {op} while program is {state:?}")]
    InvalidState {
        op: &'static str,
        state: ProgramState,
    },

    #[error("invalid program manifest \"{}\"", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}
