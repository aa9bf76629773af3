use std::collections::TryReserveError;

/// Things that can go wrong when storing into a map. Absence of a key is never
/// one of them; that's what the `Option`s are for.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// There was no memory left to allocate a new entry.
    #[error("could not allocate a new entry: {0}")]
    OutOfMemory(#[from] TryReserveError),
}

pub type Result<T> = std::result::Result<T, Error>;
