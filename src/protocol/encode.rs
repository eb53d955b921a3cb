//! Encode trait: value yang tahu cara menulis dirinya ke [`RequestBuffer`]
//!
//! Request encoder level atas menyusun field lewat trait ini, jadi satu
//! struct request cukup implement [`Encode`] dengan memanggil `put` untuk
//! setiap field secara berurutan.
//!
//! Mapping:
//! - `i8`/`i16`/`i32`/`i64` → integer dengan width yang sama
//! - `str`/`String` → string (int16 prefix)
//! - `[u8]`/`Vec<u8>`/`Bytes` → bytes (int32 prefix)
//! - `Option<T>` → null sentinel dari `T` kalau `None`

use bytes::Bytes;

use super::buffer::RequestBuffer;
use super::error::Result;

/// Tipe yang bisa di-encode ke request buffer
pub trait Encode {
    /// Append encoding dari `self` ke `buf`
    fn encode(&self, buf: &mut RequestBuffer) -> Result<()>;
}

/// Tipe yang punya representasi null di wire
///
/// Dipakai oleh `impl Encode for Option<T>`.
pub trait Nullable: Encode {
    /// Tulis null sentinel untuk tipe ini
    fn encode_null(buf: &mut RequestBuffer) -> Result<()>;
}

impl RequestBuffer {
    /// Append satu value lewat [`Encode`]
    #[inline]
    pub fn put<E: Encode + ?Sized>(&mut self, value: &E) -> Result<()> {
        value.encode(self)
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    #[inline]
    fn encode(&self, buf: &mut RequestBuffer) -> Result<()> {
        (**self).encode(buf)
    }
}

impl<T: Nullable + ?Sized> Nullable for &T {
    #[inline]
    fn encode_null(buf: &mut RequestBuffer) -> Result<()> {
        T::encode_null(buf)
    }
}

impl<T: Nullable> Encode for Option<T> {
    fn encode(&self, buf: &mut RequestBuffer) -> Result<()> {
        match self {
            Some(value) => value.encode(buf),
            None => T::encode_null(buf),
        }
    }
}

impl Encode for i8 {
    #[inline]
    fn encode(&self, buf: &mut RequestBuffer) -> Result<()> {
        buf.write_int8(i64::from(*self))
    }
}

impl Encode for i16 {
    #[inline]
    fn encode(&self, buf: &mut RequestBuffer) -> Result<()> {
        buf.write_int16(i64::from(*self))
    }
}

impl Encode for i32 {
    #[inline]
    fn encode(&self, buf: &mut RequestBuffer) -> Result<()> {
        buf.write_int32(i64::from(*self))
    }
}

impl Encode for i64 {
    #[inline]
    fn encode(&self, buf: &mut RequestBuffer) -> Result<()> {
        buf.write_int64(*self);
        Ok(())
    }
}

impl Encode for str {
    fn encode(&self, buf: &mut RequestBuffer) -> Result<()> {
        buf.write_str(Some(self))
    }
}

impl Nullable for str {
    fn encode_null(buf: &mut RequestBuffer) -> Result<()> {
        buf.write_string(None)
    }
}

impl Encode for String {
    fn encode(&self, buf: &mut RequestBuffer) -> Result<()> {
        self.as_str().encode(buf)
    }
}

impl Nullable for String {
    fn encode_null(buf: &mut RequestBuffer) -> Result<()> {
        <str>::encode_null(buf)
    }
}

impl Encode for [u8] {
    fn encode(&self, buf: &mut RequestBuffer) -> Result<()> {
        buf.write_bytes(Some(self))
    }
}

impl Nullable for [u8] {
    fn encode_null(buf: &mut RequestBuffer) -> Result<()> {
        buf.write_bytes(None)
    }
}

impl Encode for Vec<u8> {
    fn encode(&self, buf: &mut RequestBuffer) -> Result<()> {
        self.as_slice().encode(buf)
    }
}

impl Nullable for Vec<u8> {
    fn encode_null(buf: &mut RequestBuffer) -> Result<()> {
        <[u8]>::encode_null(buf)
    }
}

impl Encode for Bytes {
    fn encode(&self, buf: &mut RequestBuffer) -> Result<()> {
        self[..].encode(buf)
    }
}

impl Nullable for Bytes {
    fn encode_null(buf: &mut RequestBuffer) -> Result<()> {
        <[u8]>::encode_null(buf)
    }
}
