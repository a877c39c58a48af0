//! Errors raised while reading or writing message cells.

use tonlib_core::cell::TonCellError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CellError {
    /// The cell codec rejected the input (bad BOC, short read, overflow).
    #[error("{0}")]
    Codec(String),

    /// Cell data does not follow the expected TL-B layout.
    #[error("invalid layout: {0}")]
    InvalidLayout(String),
}

impl From<TonCellError> for CellError {
    fn from(err: TonCellError) -> Self {
        Self::Codec(err.to_string())
    }
}
