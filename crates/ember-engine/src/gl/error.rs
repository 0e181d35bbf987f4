use std::path::PathBuf;

use super::ShaderStage;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure raised by a resource wrapper.
///
/// Every wrapper operation that touches the device returns this instead of
/// panicking, so smoke tests can report which step failed and why.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("buffer `{label}`: {requested} bytes exceeds device limit of {limit} bytes")]
    BufferTooLarge {
        label: String,
        requested: u64,
        limit: u64,
    },

    #[error("buffer `{label}`: zero-sized allocation")]
    EmptyBuffer { label: String },

    #[error("mapped range {start}..{end} is outside a buffer of {len} elements")]
    MapOutOfRange { start: usize, end: usize, len: usize },

    #[error("shader `{label}` failed to compile:\n{log}")]
    Compile { label: String, log: String },

    #[error("shader `{label}` has no {stage} entry point named `{entry_point}`")]
    MissingEntryPoint {
        label: String,
        stage: ShaderStage,
        entry_point: String,
    },

    #[error("program `{label}` failed to link:\n{log}")]
    Link { label: String, log: String },

    #[error("no uniform named `{name}` in program")]
    UniformNotFound { name: String },

    #[error("failed to read shader source `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Compiler or linker output for `Compile` and `Link` failures.
    pub fn log(&self) -> Option<&str> {
        match self {
            Error::Compile { log, .. } | Error::Link { log, .. } => Some(log),
            _ => None,
        }
    }
}
