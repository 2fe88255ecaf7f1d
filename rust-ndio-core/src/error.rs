use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("Out of bounds: {msg}")]
    OutOfBoundsError { msg: String },

    #[error("Rank mismatch: {msg}")]
    RankError { msg: String },

    #[error("Invalid arguments: {msg}")]
    ArgumentsError { msg: String },

    #[error("Read-only violation: {msg}")]
    ReadOnlyError { msg: String },

    #[error("Capacity violation: {msg}")]
    CapacityError { msg: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn out_of_bounds(value: u64, limit: u64) -> Self {
        Error::OutOfBoundsError {
            msg: format!("{} is not in range [0, {})", value, limit),
        }
    }
}
