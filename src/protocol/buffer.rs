//! Request Buffer: append-only builder dengan backpatch
//!
//! Semua write di-append ke satu `Vec<u8>`. Dua combinator
//! ([`RequestBuffer::with_length_prefix`] dan [`RequestBuffer::with_crc32_prefix`])
//! me-reserve placeholder 4 byte, menjalankan nested writer, lalu menimpa
//! placeholder dengan panjang atau checksum dari region yang baru ditulis.
//!
//! Layout block:
//! ┌──────────────────┬─────────────────────────────────┐
//! │ prefix (4 bytes) │ nested content (N bytes)        │
//! └──────────────────┴─────────────────────────────────┘
//!
//! Semua integer big-endian, two's complement.

use bytes::Bytes;

use super::checksum::crc32;
use super::error::{EncodingError, Result};

/// Width of a backpatched prefix
pub const PREFIX_SIZE: usize = 4;

/// Length yang dipakai untuk null string/bytes/array
pub const NULL_LENGTH: i64 = -1;

/// Max byte length dari string (int16 prefix)
pub const MAX_STRING_LEN: usize = i16::MAX as usize;

/// Max byte length dari bytes field (int32 prefix)
pub const MAX_BYTES_LEN: usize = i32::MAX as usize;

/// Max element count dari array (int32 prefix)
pub const MAX_ARRAY_LEN: usize = i32::MAX as usize;

// Sentinel, selalu ditimpa sebelum combinator return Ok
const PLACEHOLDER: [u8; PREFIX_SIZE] = [0; PREFIX_SIZE];

/// Growable buffer untuk satu request
///
/// Dibuat kosong, diisi lewat primitive writes dan combinators, lalu
/// dibaca dengan [`finalize`](Self::finalize). Tidak ada reset: satu buffer
/// untuk satu build session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestBuffer {
    buffer: Vec<u8>,
}

impl RequestBuffer {
    /// Membuat buffer kosong
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Membuat buffer kosong dengan capacity awal
    ///
    /// Capacity hanya hint, buffer tetap grow kalau request lebih besar.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Append raw bytes apa adanya
    #[inline(always)]
    pub fn append(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// 1 byte, signed
    #[inline]
    pub fn write_int8(&mut self, v: i64) -> Result<()> {
        let v: i8 = narrow(v, 8)?;
        self.append(&v.to_be_bytes());
        Ok(())
    }

    /// 2 bytes, signed, big-endian
    #[inline]
    pub fn write_int16(&mut self, v: i64) -> Result<()> {
        let v: i16 = narrow(v, 16)?;
        self.append(&v.to_be_bytes());
        Ok(())
    }

    /// 4 bytes, signed, big-endian
    #[inline]
    pub fn write_int32(&mut self, v: i64) -> Result<()> {
        let v: i32 = narrow(v, 32)?;
        self.append(&v.to_be_bytes());
        Ok(())
    }

    /// 8 bytes, signed, big-endian
    #[inline]
    pub fn write_int64(&mut self, v: i64) {
        self.append(&v.to_be_bytes());
    }

    /// String dengan int16 length prefix
    ///
    /// `None` ditulis sebagai `int16(-1)` tanpa payload. Length dihitung
    /// dalam bytes, bukan karakter.
    ///
    /// # Errors
    ///
    /// [`EncodingError::LengthOverflow`] kalau panjang > [`MAX_STRING_LEN`].
    /// Tidak ada yang di-append dalam kasus ini.
    pub fn write_string(&mut self, s: Option<&[u8]>) -> Result<()> {
        match s {
            None => self.write_int16(NULL_LENGTH),
            Some(s) => {
                let len = checked_len(s.len(), MAX_STRING_LEN)?;
                self.write_int16(len)?;
                self.append(s);
                Ok(())
            }
        }
    }

    /// Sama dengan [`write_string`](Self::write_string), dari UTF-8 `str`
    #[inline]
    pub fn write_str(&mut self, s: Option<&str>) -> Result<()> {
        self.write_string(s.map(str::as_bytes))
    }

    /// Bytes dengan int32 length prefix
    ///
    /// `None` ditulis sebagai `int32(-1)` tanpa payload.
    ///
    /// # Errors
    ///
    /// [`EncodingError::LengthOverflow`] kalau panjang > [`MAX_BYTES_LEN`].
    pub fn write_bytes(&mut self, b: Option<&[u8]>) -> Result<()> {
        match b {
            None => self.write_int32(NULL_LENGTH),
            Some(b) => {
                let len = checked_len(b.len(), MAX_BYTES_LEN)?;
                self.write_int32(len)?;
                self.append(b);
                Ok(())
            }
        }
    }

    /// Array: int32 element count, lalu setiap element via `f`
    ///
    /// Element count diambil dari iterator sebelum element pertama ditulis,
    /// jadi iterator harus [`ExactSizeIterator`].
    pub fn write_array<I, F>(&mut self, items: I, mut f: F) -> Result<()>
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
        F: FnMut(&mut Self, I::Item) -> Result<()>,
    {
        let items = items.into_iter();
        let count = checked_len(items.len(), MAX_ARRAY_LEN)?;
        self.write_int32(count)?;
        for item in items {
            f(self, item)?;
        }
        Ok(())
    }

    /// Null array: `int32(-1)`
    #[inline]
    pub fn write_null_array(&mut self) -> Result<()> {
        self.write_int32(NULL_LENGTH)
    }

    /// Tulis block yang di-prefix dengan byte length-nya sendiri
    ///
    /// Placeholder 4 byte di-reserve, `f` menulis nested content ke buffer
    /// yang sama, lalu placeholder ditimpa dengan jumlah byte yang ditulis
    /// `f` (int32, big-endian). Combinator boleh di-nest.
    ///
    /// # Errors
    ///
    /// Error dari `f` diteruskan apa adanya, dan
    /// [`EncodingError::LengthOverflow`] kalau nested content > `i32::MAX`
    /// bytes. Dalam dua kasus itu placeholder tetap berisi sentinel.
    ///
    /// # Panics
    ///
    /// Kalau `f` mengganti buffer dengan buffer yang lebih pendek dari
    /// posisi placeholder.
    pub fn with_length_prefix<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let (offset, value) = self.reserve_and_write(f)?;
        let len = self.buffer.len() - (offset + PREFIX_SIZE);
        let size = i32::try_from(len).map_err(|_| EncodingError::LengthOverflow {
            len,
            max: MAX_BYTES_LEN,
        })?;

        self.patch(offset, size.to_be_bytes());
        tracing::trace!(offset, len, "length prefix patched");
        Ok(value)
    }

    /// Tulis block yang di-prefix dengan CRC-32 dari isinya
    ///
    /// Protokol reserve/invoke sama dengan
    /// [`with_length_prefix`](Self::with_length_prefix), tapi placeholder
    /// diisi CRC-32 (IEEE, unsigned, big-endian) dari tepat bytes yang
    /// ditulis `f`.
    ///
    /// # Errors
    ///
    /// Error dari `f` diteruskan apa adanya; placeholder tetap sentinel.
    pub fn with_crc32_prefix<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let (offset, value) = self.reserve_and_write(f)?;
        let checksum = crc32(&self.buffer[offset + PREFIX_SIZE..]);

        self.patch(offset, checksum.to_be_bytes());
        tracing::trace!(offset, checksum, "crc32 prefix patched");
        Ok(value)
    }

    /// Copy dari isi buffer sebagai immutable bytes
    ///
    /// Tidak me-reset buffer. Panggilan berulang tanpa write di antaranya
    /// menghasilkan isi yang sama.
    pub fn finalize(&self) -> Bytes {
        Bytes::copy_from_slice(&self.buffer)
    }

    /// Consume buffer tanpa copy
    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.buffer)
    }

    /// Get current buffer content
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Jumlah byte yang sudah ditulis
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Reserve placeholder lalu jalankan nested writer
    ///
    /// Returns offset placeholder dan value dari `f`.
    #[inline]
    fn reserve_and_write<T, F>(&mut self, f: F) -> Result<(usize, T)>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let offset = self.buffer.len();
        self.append(&PLACEHOLDER);
        let value = f(self)?;
        Ok((offset, value))
    }

    /// Timpa placeholder di `offset`, length buffer tidak berubah
    #[inline(always)]
    fn patch(&mut self, offset: usize, bytes: [u8; PREFIX_SIZE]) {
        self.buffer[offset..offset + PREFIX_SIZE].copy_from_slice(&bytes);
    }
}

impl AsRef<[u8]> for RequestBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<RequestBuffer> for Bytes {
    fn from(buf: RequestBuffer) -> Self {
        buf.into_bytes()
    }
}

/// Narrow ke width yang lebih kecil, atau IntegerOutOfRange
#[inline(always)]
fn narrow<T: TryFrom<i64>>(value: i64, width: u8) -> Result<T> {
    T::try_from(value).map_err(|_| EncodingError::IntegerOutOfRange { width, value })
}

#[inline(always)]
fn checked_len(len: usize, max: usize) -> Result<i64> {
    if len > max {
        return Err(EncodingError::LengthOverflow { len, max });
    }
    Ok(len as i64)
}
