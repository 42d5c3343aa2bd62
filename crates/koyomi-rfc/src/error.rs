use thiserror::Error;

use crate::rfc::datetime::error::ParseError;

/// RFC parsing and validation errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error(transparent)]
    CoreError(#[from] koyomi_core::error::CoreError),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
