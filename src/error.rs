use crate::abi_groups::{load, write};

/// Broad failure classes of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input could not be read or the output could not be written.
    Io,
    /// The input is not well-formed JSON, or its top level is not an object.
    Parse,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Loading ABI groups")]
    Load(#[from] load::Error),
    #[error("Writing ABI union")]
    Write(#[from] write::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Load(load) => load.kind(),
            Error::Write(write) => write.kind(),
        }
    }
}

pub type Result<T> = std::result::Result<T, self::Error>;
