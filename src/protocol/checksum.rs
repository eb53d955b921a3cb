//! CRC-32 checksum (IEEE 802.3, varian zlib)
//!
//! Dipakai oleh [`RequestBuffer::with_crc32_prefix`](super::RequestBuffer::with_crc32_prefix)
//! untuk mengisi placeholder setelah nested content selesai ditulis.

use crc32fast::Hasher;

/// Width of the checksum field on the wire
pub const CRC32_SIZE: usize = 4;

/// CRC-32 dari satu byte range
#[inline(always)]
pub fn crc32(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}
