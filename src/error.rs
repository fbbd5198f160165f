//! Crate-wide error type.
//!
//! The CLI boundary collapses every variant here into the single
//! human-readable line a shell command prints on failure; only `Io` is
//! allowed to unwind the REPL loop entirely, since a host I/O failure
//! leaves the session's cached state unreliable.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FatError {
    #[error("invalid name")]
    InvalidName,

    #[error("not found")]
    NotFound,

    #[error("already exists")]
    AlreadyExists,

    #[error("wrong kind")]
    WrongKind,

    #[error("directory not empty")]
    DirectoryNotEmpty,

    #[error("out of space")]
    OutOfSpace,

    #[error("not a fat32 volume")]
    NotFat32,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type FatResult<T> = Result<T, FatError>;
