//! Protocol Layer: Kafka-style Binary Request Encoding
//!
//! Prinsip desain:
//! - Append-only: Semua write langsung ke satu growable buffer
//! - Backpatch: Length dan CRC-32 prefix diisi setelah nested content ditulis
//! - Big-endian: Semua integer multi-byte, MSB first

mod buffer;
mod checksum;
mod encode;
mod error;

pub use buffer::{
    RequestBuffer, MAX_ARRAY_LEN, MAX_BYTES_LEN, MAX_STRING_LEN, NULL_LENGTH, PREFIX_SIZE,
};
pub use checksum::{crc32, CRC32_SIZE};
pub use encode::{Encode, Nullable};
pub use error::{EncodingError, Result};
