//! Request Layout Test - Decode finished buffers by hand
//!
//! Reader di file ini ditulis manual (untuk test independence), jadi
//! layout dicek tanpa memakai kode encoder crate.
//!
//! Usage:
//!   cargo test --test request_layout

use wirebuf::protocol::{crc32, EncodingError, RequestBuffer, Result};

/// Minimal big-endian cursor
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> &'a [u8] {
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        out
    }

    fn i8(&mut self) -> i8 {
        i8::from_be_bytes(self.take(1).try_into().unwrap())
    }

    fn i16(&mut self) -> i16 {
        i16::from_be_bytes(self.take(2).try_into().unwrap())
    }

    fn i32(&mut self) -> i32 {
        i32::from_be_bytes(self.take(4).try_into().unwrap())
    }

    fn u32(&mut self) -> u32 {
        u32::from_be_bytes(self.take(4).try_into().unwrap())
    }

    fn i64(&mut self) -> i64 {
        i64::from_be_bytes(self.take(8).try_into().unwrap())
    }

    fn string(&mut self) -> Option<&'a [u8]> {
        match self.i16() {
            -1 => None,
            n => Some(self.take(n as usize)),
        }
    }

    fn bytes(&mut self) -> Option<&'a [u8]> {
        match self.i32() {
            -1 => None,
            n => Some(self.take(n as usize)),
        }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
}

/// Satu message: crc32 | magic | attributes | key | value
fn write_message(buf: &mut RequestBuffer, key: Option<&[u8]>, value: &[u8]) -> Result<()> {
    buf.with_crc32_prefix(|b| {
        b.write_int8(0)?;
        b.write_int8(0)?;
        b.write_bytes(key)?;
        b.write_bytes(Some(value))
    })
}

fn build_request(messages: &[(Option<&[u8]>, &[u8])]) -> Result<RequestBuffer> {
    let mut buf = RequestBuffer::new();
    buf.with_length_prefix(|b| {
        b.write_int16(0)?;
        b.write_int16(0)?;
        b.write_int32(99)?;
        b.write_str(Some("layout-test"))?;
        b.write_int16(-1)?;
        b.write_int32(5_000)?;
        b.write_array(["alpha"], |b, topic| {
            b.write_str(Some(topic))?;
            b.write_array([3i64], |b, partition| {
                b.write_int32(partition)?;
                b.with_length_prefix(|b| {
                    for (offset, (key, value)) in messages.iter().enumerate() {
                        b.write_int64(offset as i64);
                        b.with_length_prefix(|b| write_message(b, *key, value))?;
                    }
                    Ok(())
                })
            })
        })
    })?;
    Ok(buf)
}

#[test]
fn test_produce_request_decodes() {
    let messages: [(Option<&[u8]>, &[u8]); 3] = [
        (None, &b"first"[..]),
        (Some(&b"k2"[..]), &b"second"[..]),
        (Some(&b""[..]), &b""[..]),
    ];
    let bytes = build_request(&messages).unwrap().finalize();

    let mut r = Reader::new(&bytes);
    let size = r.i32();
    assert_eq!(size as usize, r.remaining());

    assert_eq!(r.i16(), 0);
    assert_eq!(r.i16(), 0);
    assert_eq!(r.i32(), 99);
    assert_eq!(r.string(), Some(&b"layout-test"[..]));
    assert_eq!(r.i16(), -1);
    assert_eq!(r.i32(), 5_000);

    assert_eq!(r.i32(), 1);
    assert_eq!(r.string(), Some(&b"alpha"[..]));
    assert_eq!(r.i32(), 1);
    assert_eq!(r.i32(), 3);

    let set_size = r.i32() as usize;
    assert_eq!(set_size, r.remaining());

    for (expected_offset, (key, value)) in messages.iter().enumerate() {
        assert_eq!(r.i64(), expected_offset as i64);
        let message_size = r.i32() as usize;
        let start = r.pos;

        let checksum = r.u32();
        let body = &bytes[r.pos..start + message_size];
        assert_eq!(checksum, crc32(body));

        assert_eq!(r.i8(), 0);
        assert_eq!(r.i8(), 0);
        assert_eq!(r.bytes(), *key);
        assert_eq!(r.bytes(), Some(*value));
        assert_eq!(r.pos - start, message_size);
    }

    assert_eq!(r.remaining(), 0);
}

#[test]
fn test_sibling_blocks_are_independent() {
    let mut buf = RequestBuffer::new();
    buf.with_length_prefix(|b| {
        b.append(b"abc");
        Ok(())
    })
    .unwrap();
    buf.with_crc32_prefix(|b| {
        b.append(b"defg");
        Ok(())
    })
    .unwrap();

    let bytes = buf.finalize();
    let mut r = Reader::new(&bytes);
    assert_eq!(r.i32(), 3);
    assert_eq!(r.take(3), b"abc");
    assert_eq!(r.u32(), crc32(b"defg"));
    assert_eq!(r.take(4), b"defg");
}

#[test]
fn test_deep_nesting() {
    let mut buf = RequestBuffer::new();
    buf.with_length_prefix(|b| {
        b.with_length_prefix(|b| {
            b.with_crc32_prefix(|b| {
                b.with_length_prefix(|b| b.write_int16(0x0102))
            })
        })
    })
    .unwrap();

    let bytes = buf.finalize();
    let mut r = Reader::new(&bytes);
    assert_eq!(r.i32(), 14);
    assert_eq!(r.i32(), 10);
    let inner = &bytes[12..];
    assert_eq!(r.u32(), crc32(inner));
    assert_eq!(r.i32(), 2);
    assert_eq!(r.i16(), 0x0102);
    assert_eq!(r.remaining(), 0);
}

#[test]
fn test_error_inside_block_keeps_partial_output() {
    let mut buf = RequestBuffer::new();
    buf.write_int8(7).unwrap();

    let result = buf.with_crc32_prefix(|b| {
        b.append(b"xy");
        b.write_int16(70_000)
    });
    assert_eq!(
        result,
        Err(EncodingError::IntegerOutOfRange {
            width: 16,
            value: 70_000
        })
    );

    // Tidak ada rollback: sentinel + nested bytes tetap ada
    assert_eq!(buf.as_bytes(), &[0x07, 0, 0, 0, 0, b'x', b'y']);
}

#[test]
fn test_into_bytes_matches_finalize() {
    let mut buf = RequestBuffer::with_capacity(4);
    buf.write_bytes(Some(&[1, 2, 3, 4, 5, 6, 7, 8][..])).unwrap();

    let finalized = buf.finalize();
    let consumed = buf.into_bytes();
    assert_eq!(finalized, consumed);
    assert_eq!(consumed.len(), 12);
}
