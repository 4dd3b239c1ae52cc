use std::{io, path::PathBuf};

use thiserror::Error;

/// Why a row was rejected in strict mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedRow {
    #[error("row has no ';' delimiter")]
    MissingDelimiter,
    #[error("value field is empty")]
    EmptyValue,
    #[error("value has no digits")]
    NoDigits,
    #[error("unexpected byte {0:#04x} in value")]
    InvalidByte(u8),
    #[error("value has more than one decimal point")]
    RepeatedDecimalPoint,
    #[error("value has more than {} fractional digits", crate::parse::MAX_FRACTION_DIGITS)]
    TooManyFractionDigits,
    #[error("value does not fit the integer accumulator")]
    Overflow,
}

#[derive(Debug, Error)]
pub enum Error {
    /// A row that failed strict validation, `offset` is the byte offset of the row
    /// in the whole input.
    #[error("malformed row at byte {offset}: {kind}")]
    Malformed { offset: usize, kind: MalformedRow },

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
