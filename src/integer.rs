//! Fixed-width integer and floating point codecs.
//!
//! All multi-byte numbers are stored little-endian. Signed integers narrower than 8 bytes are
//! sign-extended on read.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// Borrow `len` bytes at `pos`, failing if the buffer ends early.
#[inline]
pub(crate) fn bytes_at(data: &[u8], pos: usize, len: usize) -> Result<&[u8]> {
    pos.checked_add(len)
        .and_then(|end| data.get(pos..end))
        .ok_or_else(|| Error::truncated("value"))
}

/// Append the low `width` bytes of `value`.
pub(crate) fn write_uint(buf: &mut Vec<u8>, value: u64, width: usize) {
    debug_assert!((1..=8).contains(&width));
    buf.extend_from_slice(&value.to_le_bytes()[..width]);
}

/// Overwrite `width` bytes at `pos` with the low bytes of `value`.
pub(crate) fn store_uint(buf: &mut [u8], pos: usize, value: u64, width: usize) {
    LittleEndian::write_uint(&mut buf[pos..pos + width], value, width);
}

pub(crate) fn read_uint(data: &[u8], pos: usize, width: usize) -> Result<u64> {
    let bytes = bytes_at(data, pos, width)?;
    Ok(LittleEndian::read_uint(bytes, width))
}

pub(crate) fn read_int(data: &[u8], pos: usize, width: usize) -> Result<i64> {
    let bytes = bytes_at(data, pos, width)?;
    Ok(LittleEndian::read_int(bytes, width))
}

/// Read a `width`-byte length or offset and make sure it is addressable.
pub(crate) fn read_len(data: &[u8], pos: usize, width: usize) -> Result<usize> {
    let v = read_uint(data, pos, width)?;
    usize::try_from(v).map_err(|_| Error::BadEncode(format!("length {} doesn't fit in memory", v)))
}

pub(crate) fn write_f64(buf: &mut Vec<u8>, value: f64) {
    buf.extend_from_slice(&value.to_bits().to_le_bytes());
}

pub(crate) fn read_f64(data: &[u8], pos: usize) -> Result<f64> {
    let bytes = bytes_at(data, pos, 8)?;
    Ok(LittleEndian::read_f64(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_extension() {
        let mut buf = Vec::new();
        write_uint(&mut buf, (-2i64) as u64, 2);
        assert_eq!(buf, [0xfe, 0xff]);
        assert_eq!(read_int(&buf, 0, 2).unwrap(), -2);
        assert_eq!(read_uint(&buf, 0, 2).unwrap(), 0xfffe);
    }

    #[test]
    fn widths() {
        for width in [1usize, 2, 3, 4, 5, 6, 7, 8] {
            let max = if width == 8 {
                u64::MAX
            } else {
                (1u64 << (8 * width)) - 1
            };
            let mut buf = Vec::new();
            write_uint(&mut buf, max, width);
            assert_eq!(buf.len(), width);
            assert_eq!(read_uint(&buf, 0, width).unwrap(), max);
        }
    }

    #[test]
    fn store_in_place() {
        let mut buf = vec![0u8; 6];
        store_uint(&mut buf, 1, 0x0403_0201, 4);
        assert_eq!(buf, [0, 1, 2, 3, 4, 0]);
    }

    #[test]
    fn doubles() {
        let mut buf = Vec::new();
        write_f64(&mut buf, 1.5);
        assert_eq!(buf, 1.5f64.to_bits().to_le_bytes());
        assert_eq!(read_f64(&buf, 0).unwrap(), 1.5);
    }

    #[test]
    fn not_enough_bytes() {
        assert!(read_uint(&[1, 2, 3], 0, 4).is_err());
        assert!(read_uint(&[1, 2, 3], 2, 2).is_err());
        assert!(read_f64(&[0; 7], 0).is_err());
        assert!(bytes_at(&[0; 4], usize::MAX, 2).is_err());
    }
}
