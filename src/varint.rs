//! Base-128 variable-length integers.
//!
//! Each byte carries 7 bits of the value, least significant group first, with the high bit set on
//! every byte except the last. Compact arrays and objects store their byte length this way right
//! after the head byte (read forward), and their member count in the last bytes of the value
//! (read backward, starting from the final byte).

use crate::error::{Error, Result};

const MAX_VARINT_LEN: usize = 10;

/// Number of bytes needed to encode `value`.
pub fn encoded_len(mut value: u64) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

/// Store `value` in forward order starting at `buf[pos]`.
pub fn store(buf: &mut [u8], mut pos: usize, mut value: u64) {
    while value >= 0x80 {
        buf[pos] = (value as u8 & 0x7f) | 0x80;
        value >>= 7;
        pos += 1;
    }
    buf[pos] = value as u8;
}

/// Store `value` in reverse order, with its first group at `buf[last]` and continuing towards
/// lower indices.
pub fn store_reverse(buf: &mut [u8], mut last: usize, mut value: u64) {
    while value >= 0x80 {
        buf[last] = (value as u8 & 0x7f) | 0x80;
        value >>= 7;
        last -= 1;
    }
    buf[last] = value as u8;
}

/// Read a forward-encoded value starting at `data[pos]`. Returns the value and the number of
/// bytes it took.
pub fn read(data: &[u8], pos: usize) -> Result<(u64, usize)> {
    let mut value = 0u64;
    let mut shift = 0;
    for len in 1..=MAX_VARINT_LEN {
        let b = *data
            .get(pos + len - 1)
            .ok_or_else(|| Error::truncated("variable-length integer"))?;
        value |= ((b & 0x7f) as u64)
            .checked_shl(shift)
            .ok_or_else(|| Error::BadEncode("variable-length integer overflows".into()))?;
        if b & 0x80 == 0 {
            return Ok((value, len));
        }
        shift += 7;
    }
    Err(Error::BadEncode("variable-length integer too long".into()))
}

/// Read a reverse-encoded value whose first group sits at `data[last]`. Returns the value and the
/// number of bytes it took.
pub fn read_reverse(data: &[u8], last: usize) -> Result<(u64, usize)> {
    let mut value = 0u64;
    let mut shift = 0;
    for len in 1..=MAX_VARINT_LEN {
        let idx = last
            .checked_sub(len - 1)
            .ok_or_else(|| Error::truncated("variable-length integer"))?;
        let b = *data
            .get(idx)
            .ok_or_else(|| Error::truncated("variable-length integer"))?;
        value |= ((b & 0x7f) as u64)
            .checked_shl(shift)
            .ok_or_else(|| Error::BadEncode("variable-length integer overflows".into()))?;
        if b & 0x80 == 0 {
            return Ok((value, len));
        }
        shift += 7;
    }
    Err(Error::BadEncode("variable-length integer too long".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode() {
        for s in 0..64 {
            let v = 1u64 << s;
            let mut buf = vec![0u8; encoded_len(v)];
            store(&mut buf, 0, v);
            assert_eq!(buf.last().map(|b| b & 0x80), Some(0));
            let (o, len) = read(&buf, 0).unwrap();
            assert_eq!(o, v, "value should match");
            assert_eq!(len, buf.len());
        }
    }

    #[test]
    fn reverse_layout() {
        // 300 = 0b10_0101100: low group 0x2c with continuation, then 0x02
        let mut buf = vec![0u8; 4];
        store_reverse(&mut buf, 3, 300);
        assert_eq!(buf, [0, 0, 0x02, 0xac]);
        assert_eq!(read_reverse(&buf, 3).unwrap(), (300, 2));

        let mut fwd = vec![0u8; 2];
        store(&mut fwd, 0, 300);
        assert_eq!(fwd, [0xac, 0x02]);
    }

    #[test]
    fn lengths() {
        assert_eq!(encoded_len(0), 1);
        assert_eq!(encoded_len(127), 1);
        assert_eq!(encoded_len(128), 2);
        assert_eq!(encoded_len((1 << 14) - 1), 2);
        assert_eq!(encoded_len(1 << 14), 3);
        assert_eq!(encoded_len((1 << 56) - 1), 8);
        assert_eq!(encoded_len(1 << 56), 9);
        assert_eq!(encoded_len(u64::MAX), 10);
    }

    #[test]
    fn truncated() {
        assert!(read(&[0x80, 0x80], 0).is_err());
        assert!(read_reverse(&[0x80, 0x80], 1).is_err());
        assert!(read(&[0xff; 11], 0).is_err());
    }
}
