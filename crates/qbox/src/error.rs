use std::{io, path::PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io issue encountered: {0}")]
    Io(#[from] io::Error),
    #[error("qemufile {path} is malformed: {source}")]
    MalformedConfiguration {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("box '{name}' has an invalid image definition: {reason}")]
    InvalidImage { name: String, reason: String },
    #[error("no box found with name '{0}'")]
    BoxNotFound(String),
    #[error("{program} exited with status {code}")]
    ToolFailed { program: String, code: i32 },
    #[error("{program} was terminated before it exited")]
    ToolTerminated { program: String },
}

pub type Result<T> = std::result::Result<T, Error>;
