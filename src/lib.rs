//! Wirebuf - Backpatching Request Buffer untuk Kafka-style Wire Protocol
//!
//! Arsitektur:
//! - Primitive writes: int8/16/32/64, string, bytes, array
//! - Backpatch combinators: length prefix dan CRC-32 prefix
//! - Encode trait: seam untuk request encoder level atas
//!
//! Transport, response parsing, dan definisi message spesifik ada di luar crate ini.
//!
//! ```
//! use wirebuf::protocol::RequestBuffer;
//!
//! let mut buf = RequestBuffer::new();
//! buf.with_length_prefix(|b| b.write_int8(5)).unwrap();
//! assert_eq!(&buf.finalize()[..], &[0x00, 0x00, 0x00, 0x01, 0x05]);
//! ```

pub mod protocol;

pub use protocol::{Encode, EncodingError, RequestBuffer};
