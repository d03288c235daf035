//! Failure reasons behind the boolean operation surface.

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("initial capacity must be greater than zero")]
    ZeroCapacity,

    #[error("max load factor must be in (0, 1], got {0}")]
    InvalidLoadFactor(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InsertError {
    #[error("key already registered")]
    DuplicateKey,

    #[error("table is full")]
    TableFull,

    /// A full probe walk found neither an empty slot nor a tombstone although
    /// the live count said there was room. Only reachable if the probe or
    /// bookkeeping logic is broken.
    #[error("probe walk found no free slot below capacity")]
    NoFreeSlot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    #[error("account to merge does not exist")]
    MissingAccount,

    #[error("merged key already belongs to another account")]
    NewKeyExists,

    #[error("failed to insert merged account: {0}")]
    Insert(#[from] InsertError),
}
