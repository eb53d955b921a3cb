//! Error types untuk encoding layer.
//!
//! Encoding bersifat deterministik: error yang sama akan muncul lagi
//! untuk input yang sama, jadi tidak ada retry. Caller harus memperbaiki input.

use thiserror::Error;

/// Failure raised when a value cannot be represented on the wire.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// Integer tidak muat di width yang diminta
    #[error("integer {value} does not fit in a signed {width}-bit field")]
    IntegerOutOfRange {
        /// Field width in bits
        width: u8,
        /// Rejected value
        value: i64,
    },

    /// Panjang payload melebihi range positif dari length prefix
    #[error("length {len} exceeds prefix maximum {max}")]
    LengthOverflow {
        /// Actual length in bytes (or elements, for arrays)
        len: usize,
        /// Largest length the prefix can carry
        max: usize,
    },
}

/// Result alias untuk semua operasi encode
pub type Result<T> = std::result::Result<T, EncodingError>;
