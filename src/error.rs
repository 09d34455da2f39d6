//! Error types for model loading and the render loop.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort loading a model. No partial mesh is ever returned.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The model file could not be opened or read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading failed partway through the model.
    #[error("I/O error reading line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// A `v` or `f` line could not be parsed.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A face referenced a vertex that does not exist.
    #[error("parse error at line {line}: vertex index {index} out of range (model has {vertex_count} vertices)")]
    IndexOutOfRange {
        line: usize,
        index: i64,
        vertex_count: usize,
    },

    /// The triangulating importer produced a face past the end of the
    /// vertex buffer.
    #[error("import error: vertex index {index} out of range (model has {vertex_count} vertices)")]
    ImportIndexOutOfRange { index: u32, vertex_count: usize },

    /// The triangulating importer rejected the file.
    #[error("import error: {0}")]
    Import(#[from] tobj::LoadError),
}

impl MeshError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        MeshError::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Top level error for the binary.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error("window error: {0}")]
    Window(#[from] minifb::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("logger error: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
