use std::fmt::{self, Display, Formatter};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("{value} is out of range, the largest encodable magnitude is {max}")]
    OutOfRange { value: Scalar, max: Scalar },

    #[error(transparent)]
    Bits(#[from] bits::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A value that failed to encode, kept for error messages.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Scalar {
    Float(f32),
    UInt(u64),
}

impl Error {
    pub(crate) fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Error {
        Error::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Scalar::Float(value) => write!(f, "{}", value),
            Scalar::UInt(value) => write!(f, "{}", value),
        }
    }
}
