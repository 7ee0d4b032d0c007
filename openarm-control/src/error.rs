use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(
        "openarm-control: Length mismatch (expected = {}, actual = {})",
        expected,
        actual
    )]
    LengthMismatch { expected: usize, actual: usize },
    #[error(
        "openarm-control: {} address {} is out of range (len = {})",
        what,
        index,
        len
    )]
    AddressOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
    #[error("openarm-control: Backend error : {}", .0)]
    Backend(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
