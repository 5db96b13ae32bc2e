use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProgramError {
    #[error("failed to read shader source {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("failed to create GL object: {0}")]
    Create(String),
    #[error("error compiling shader ({name}): {log}")]
    Compile { name: String, log: String },
    #[error("error while linking program: {0}")]
    Link(String),
}
