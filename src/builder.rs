//! Encoding of VelocyPack values.
//!
//! A [`Builder`] appends values to a single byte buffer. Arrays and objects are opened with
//! [`Item::Array`] / [`Item::Object`] and finished with [`Builder::close`], which picks the
//! smallest encoding that fits the members written in between:
//!
//! - An empty compound collapses to its one-byte head.
//! - A compact compound stores its byte length and member count as variable-length integers and
//!   carries no offset table. It is used when asked for, and for single-member objects.
//! - Everything else gets an offset table of 1, 2, 4 or 8-byte entries, whichever is the smallest
//!   that can address the whole value. Object tables are sorted by key so lookups can binary
//!   search. Arrays whose members all have the same size drop the table entirely.
//!
//! Every compound starts with 9 reserved header bytes. Closing it shifts the members down when
//! the chosen header turns out smaller.

use tracing::trace;

use crate::date::UtcDate;
use crate::error::{Error, Result};
use crate::integer::{store_uint, write_f64, write_uint};
use crate::marker::*;
use crate::slice::Slice;
use crate::translator::AttributeTranslator;
use crate::varint;

/// Header bytes reserved when an array or object is opened.
const RESERVED_HEADER: usize = 9;

/// Layout choices applied when closing arrays and objects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderOptions {
    unindexed_arrays: bool,
    unindexed_objects: bool,
}

impl BuilderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write every array in compact form when its header allows it.
    pub fn unindexed_arrays(mut self, unindexed: bool) -> Self {
        self.unindexed_arrays = unindexed;
        self
    }

    /// Write every object in compact form when its header allows it.
    pub fn unindexed_objects(mut self, unindexed: bool) -> Self {
        self.unindexed_objects = unindexed;
        self
    }
}

/// A single value to append to a [`Builder`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Item<'a> {
    Null,
    Bool(bool),
    Double(f64),
    /// Milliseconds since the Unix epoch.
    UtcDate(i64),
    MinKey,
    MaxKey,
    Illegal,
    /// Signed integer written as 2 bytes, or inline if it is a small int.
    Short(i16),
    /// Signed integer written as 4 bytes, or inline if it is a small int.
    Int(i32),
    /// Signed integer written as 8 bytes, or inline if it is a small int.
    Long(i64),
    /// Unsigned integer written as 8 bytes, or inline if it is a small int.
    UInt(u64),
    /// Integer stored entirely in the head byte. Must be within -6..=9.
    SmallInt(i64),
    Str(&'a str),
    Binary(&'a [u8]),
    /// Opens an array. `unindexed` asks for the compact layout.
    Array { unindexed: bool },
    /// Opens an object. `unindexed` asks for the compact layout.
    Object { unindexed: bool },
}

impl<'a> Item<'a> {
    pub fn array() -> Self {
        Item::Array { unindexed: false }
    }

    pub fn object() -> Self {
        Item::Object { unindexed: false }
    }

    pub fn compact_array() -> Self {
        Item::Array { unindexed: true }
    }

    pub fn compact_object() -> Self {
        Item::Object { unindexed: true }
    }

    /// The item for a value type that carries no payload.
    pub fn typed(ty: ValueType) -> Result<Item<'static>> {
        match ty {
            ValueType::Null => Ok(Item::Null),
            ValueType::Illegal => Ok(Item::Illegal),
            ValueType::MinKey => Ok(Item::MinKey),
            ValueType::MaxKey => Ok(Item::MaxKey),
            ValueType::Array => Ok(Item::array()),
            ValueType::Object => Ok(Item::object()),
            ty => Err(Error::UnexpectedValueType {
                ty,
                repr: "no value",
            }),
        }
    }

    /// The item for an integer declared as type `ty`.
    pub fn integer(ty: ValueType, value: i64) -> Result<Item<'static>> {
        match ty {
            ValueType::Int => Ok(Item::Long(value)),
            ValueType::UInt => u64::try_from(value)
                .map(Item::UInt)
                .map_err(|_| Error::NumberOutOfRange {
                    ty,
                    value: value as i128,
                }),
            ValueType::SmallInt => {
                check_small_int(value)?;
                Ok(Item::SmallInt(value))
            }
            ValueType::Double => Ok(Item::Double(value as f64)),
            ValueType::UtcDate => Ok(Item::UtcDate(value)),
            ty => Err(Error::UnexpectedValueType {
                ty,
                repr: "an integer",
            }),
        }
    }
}

impl<'a> From<bool> for Item<'a> {
    fn from(v: bool) -> Self {
        Item::Bool(v)
    }
}

impl<'a> From<f64> for Item<'a> {
    fn from(v: f64) -> Self {
        Item::Double(v)
    }
}

impl<'a> From<i16> for Item<'a> {
    fn from(v: i16) -> Self {
        Item::Short(v)
    }
}

impl<'a> From<i32> for Item<'a> {
    fn from(v: i32) -> Self {
        Item::Int(v)
    }
}

impl<'a> From<i64> for Item<'a> {
    fn from(v: i64) -> Self {
        Item::Long(v)
    }
}

impl<'a> From<u64> for Item<'a> {
    fn from(v: u64) -> Self {
        Item::UInt(v)
    }
}

impl<'a> From<&'a str> for Item<'a> {
    fn from(v: &'a str) -> Self {
        Item::Str(v)
    }
}

impl<'a> From<&'a [u8]> for Item<'a> {
    fn from(v: &'a [u8]) -> Self {
        Item::Binary(v)
    }
}

impl<'a> From<UtcDate> for Item<'a> {
    fn from(v: UtcDate) -> Self {
        Item::UtcDate(v.millis())
    }
}

/// An object key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key<'a> {
    /// A string key. Written as its integer code if the builder's translator has one.
    Name(&'a str),
    /// An integer key, which must be known to the builder's translator.
    Code(u64),
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(v: &'a str) -> Self {
        Key::Name(v)
    }
}

impl<'a> From<&'a String> for Key<'a> {
    fn from(v: &'a String) -> Self {
        Key::Name(v.as_str())
    }
}

impl<'a> From<u64> for Key<'a> {
    fn from(v: u64) -> Self {
        Key::Code(v)
    }
}

#[derive(Clone, Debug)]
struct Frame {
    start: usize,
    // Member offsets relative to `start`. For objects these point at the keys.
    members: Vec<usize>,
}

/// Encoder for VelocyPack values.
///
/// ```
/// # use velocypack::{Builder, Item};
/// let mut builder = Builder::new();
/// builder.add(Item::object())?;
/// builder.add_entry("a", Item::Long(1))?;
/// builder.close()?;
/// assert_eq!(builder.slice()?.get("a")?.unwrap().as_i64()?, 1);
/// # Ok::<(), velocypack::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Builder<'t> {
    buf: Vec<u8>,
    stack: Vec<Frame>,
    key_written: bool,
    options: BuilderOptions,
    translator: Option<&'t AttributeTranslator>,
}

impl<'t> Builder<'t> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder that writes known attribute names as integer codes.
    pub fn with_translator(translator: &'t AttributeTranslator) -> Self {
        Self {
            translator: Some(translator),
            ..Self::default()
        }
    }

    pub(crate) fn from_parts(
        options: BuilderOptions,
        translator: Option<&'t AttributeTranslator>,
    ) -> Self {
        Self {
            options,
            translator,
            ..Self::default()
        }
    }

    pub fn options(mut self, options: BuilderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn translator(&self) -> Option<&'t AttributeTranslator> {
        self.translator
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// True when no array or object is left open.
    pub fn is_closed(&self) -> bool {
        self.stack.is_empty()
    }

    /// Bytes written from `pos` on.
    pub(crate) fn tail(&self, pos: usize) -> &[u8] {
        &self.buf[pos..]
    }

    /// Discard everything written so far.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.stack.clear();
        self.key_written = false;
    }

    /// The finished value.
    pub fn slice(&self) -> Result<Slice<'_>> {
        if !self.stack.is_empty() {
            return Err(Error::UnclosedCompound(self.stack.len()));
        }
        Ok(self.view(0))
    }

    /// Take the finished buffer.
    pub fn into_vec(self) -> Result<Vec<u8>> {
        if !self.stack.is_empty() {
            return Err(Error::UnclosedCompound(self.stack.len()));
        }
        Ok(self.buf)
    }

    /// Append a value, or open an array or object.
    ///
    /// Inside an object, the value's key must have been written first with
    /// [`add_key`](Builder::add_key).
    pub fn add(&mut self, item: Item<'_>) -> Result<()> {
        check_item(&item)?;
        self.before_value()?;
        self.write_item(item);
        Ok(())
    }

    /// Write an object key. Must be followed by the member's value.
    pub fn add_key<'k>(&mut self, key: impl Into<Key<'k>>) -> Result<()> {
        let key = key.into();
        let start = match self.stack.last() {
            Some(frame) if is_object_head(self.buf[frame.start]) => frame.start,
            _ => return Err(Error::NeedOpenObject),
        };
        if self.key_written {
            return Err(Error::KeyAlreadyWritten);
        }
        let offset = self.buf.len() - start;
        match key {
            Key::Name(name) => match self.translator.and_then(|t| t.translate_name(name)) {
                Some(code) => self.buf.extend_from_slice(code.as_bytes()?),
                None => encode_string(&mut self.buf, name),
            },
            Key::Code(code) => {
                let translator = self.translator.ok_or(Error::NeedAttributeTranslator)?;
                if translator.translate_code(code).is_none() {
                    return Err(Error::KeyType(format!("unknown attribute code {}", code)));
                }
                encode_key_code(&mut self.buf, code);
            }
        }
        if let Some(frame) = self.stack.last_mut() {
            frame.members.push(offset);
        }
        self.key_written = true;
        Ok(())
    }

    /// Write an object member: the key followed by its value.
    pub fn add_entry<'k>(&mut self, key: impl Into<Key<'k>>, item: Item<'_>) -> Result<()> {
        check_item(&item)?;
        self.add_key(key)?;
        self.before_value()?;
        self.write_item(item);
        Ok(())
    }

    /// Append an already encoded value.
    pub fn add_slice(&mut self, slice: Slice<'_>) -> Result<()> {
        let bytes = slice.as_bytes()?;
        self.before_value()?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Remove the last member written to the innermost open compound. For objects this removes
    /// the key along with its value.
    pub fn remove_last(&mut self) -> Result<()> {
        let frame = self.stack.last_mut().ok_or(Error::NeedOpenCompound)?;
        let offset = frame
            .members
            .pop()
            .ok_or(Error::IndexOutOfBounds { index: 0, length: 0 })?;
        self.buf.truncate(frame.start + offset);
        self.key_written = false;
        Ok(())
    }

    /// Finish the innermost open array or object.
    pub fn close(&mut self) -> Result<()> {
        if self.key_written {
            return Err(Error::KeyAlreadyWritten);
        }
        let mut frame = self.stack.pop().ok_or(Error::NeedOpenCompound)?;
        if let Err(e) = self.close_frame(&mut frame) {
            self.stack.push(frame);
            return Err(e);
        }
        Ok(())
    }

    fn before_value(&mut self) -> Result<()> {
        let Some(frame) = self.stack.last_mut() else {
            return Ok(());
        };
        if is_object_head(self.buf[frame.start]) {
            if !self.key_written {
                return Err(Error::NeedOpenObject);
            }
            self.key_written = false;
        } else {
            frame.members.push(self.buf.len() - frame.start);
        }
        Ok(())
    }

    fn write_item(&mut self, item: Item<'_>) {
        let buf = &mut self.buf;
        match item {
            Item::Null => buf.push(NULL),
            Item::Bool(v) => buf.push(if v { TRUE } else { FALSE }),
            Item::Double(v) => {
                buf.push(DOUBLE);
                write_f64(buf, v);
            }
            Item::UtcDate(v) => {
                buf.push(UTC_DATE);
                write_uint(buf, v as u64, 8);
            }
            Item::MinKey => buf.push(MIN_KEY),
            Item::MaxKey => buf.push(MAX_KEY),
            Item::Illegal => buf.push(ILLEGAL),
            Item::Short(v) => write_signed(buf, v as i64, SHORT, 2),
            Item::Int(v) => write_signed(buf, v as i64, INT, 4),
            Item::Long(v) => write_signed(buf, v, LONG, 8),
            Item::UInt(v) => {
                if v <= SMALL_INT_MAX as u64 {
                    buf.push(small_int_head(v as i64));
                } else {
                    buf.push(ULONG);
                    write_uint(buf, v, 8);
                }
            }
            Item::SmallInt(v) => buf.push(small_int_head(v)),
            Item::Str(v) => encode_string(buf, v),
            Item::Binary(v) => {
                buf.push(BINARY_4);
                write_uint(buf, v.len() as u64, 4);
                buf.extend_from_slice(v);
            }
            Item::Array { unindexed } => {
                let head = if unindexed { COMPACT_ARRAY } else { ARRAY_INDEXED };
                self.open(head);
            }
            Item::Object { unindexed } => {
                let head = if unindexed { COMPACT_OBJECT } else { OBJECT_SORTED };
                self.open(head);
            }
        }
    }

    fn open(&mut self, head: u8) {
        let start = self.buf.len();
        self.buf.push(head);
        self.buf.extend_from_slice(&[0u8; RESERVED_HEADER - 1]);
        self.stack.push(Frame {
            start,
            members: Vec::new(),
        });
    }

    fn close_frame(&mut self, frame: &mut Frame) -> Result<()> {
        let start = frame.start;
        let head = self.buf[start];
        let is_array = !is_object_head(head);
        let n = frame.members.len();

        if n == 0 {
            self.buf[start] = if is_array { EMPTY_ARRAY } else { EMPTY_OBJECT };
            self.buf.truncate(start + 1);
            return Ok(());
        }

        let want_compact = is_compact(head)
            || if is_array {
                self.options.unindexed_arrays
            } else {
                self.options.unindexed_objects || n == 1
            };
        if want_compact && self.close_compact(start, n, is_array) {
            return Ok(());
        }

        if is_array {
            self.close_array(start, &frame.members);
        } else {
            // Sorting reads the keys, so it has to happen while the members are still in place.
            // It is also the only step that can fail.
            let sorted = self.sorted_members(start, &frame.members)?;
            frame.members = sorted;
            self.close_object(start, &frame.members);
        }
        Ok(())
    }

    fn close_compact(&mut self, start: usize, n: usize, is_array: bool) -> bool {
        let payload = self.buf.len() - (start + RESERVED_HEADER);
        let Some((byte_size, blen)) = compact_byte_size(payload, n) else {
            trace!(start, members = n, "compact header too large, using offset table");
            return false;
        };
        trace!(start, members = n, byte_size, "closing compact compound");
        self.buf
            .copy_within(start + RESERVED_HEADER.., start + 1 + blen);
        varint::store(&mut self.buf, start + 1, byte_size as u64);
        self.buf.resize(start + byte_size, 0);
        varint::store_reverse(&mut self.buf, start + byte_size - 1, n as u64);
        self.buf[start] = if is_array {
            COMPACT_ARRAY
        } else {
            COMPACT_OBJECT
        };
        true
    }

    fn close_array(&mut self, start: usize, members: &[usize]) {
        let n = members.len();
        let used = self.buf.len() - start;
        let indexed = n > 1 && !is_uniform(members, used);
        let table = if indexed { n } else { 0 };
        // Header bytes saved by the 1-byte layout: head, length and count stay
        let saved = if indexed { 6 } else { 7 };

        let width = if used + table - saved <= 0xff {
            1
        } else if used + 2 * table <= 0xffff {
            2
        } else if used + 4 * table <= 0xffff_ffff {
            4
        } else {
            8
        };
        trace!(start, members = n, width, indexed, "closing array");

        let shift = if width == 1 {
            let target = if indexed { 3 } else { 2 };
            self.shift_members(start, target);
            RESERVED_HEADER - target
        } else {
            0
        };

        let mut head = if indexed {
            for offset in members {
                write_uint(&mut self.buf, (offset - shift) as u64, width);
            }
            ARRAY_INDEXED
        } else {
            ARRAY_NO_INDEX
        };
        head += width_step(width);
        if indexed && width == 8 {
            write_uint(&mut self.buf, n as u64, 8);
        }
        self.finish_header(start, head, width, indexed.then_some(n));
    }

    fn close_object(&mut self, start: usize, members: &[usize]) {
        let n = members.len();
        let used = self.buf.len() - start;
        let width = if used - 6 + n <= 0xff {
            1
        } else if used + 2 * n <= 0xffff {
            2
        } else if used + 4 * n <= 0xffff_ffff {
            4
        } else {
            8
        };
        trace!(start, members = n, width, "closing object");

        let shift = if width == 1 {
            self.shift_members(start, 3);
            RESERVED_HEADER - 3
        } else {
            0
        };
        for offset in members {
            write_uint(&mut self.buf, (offset - shift) as u64, width);
        }
        if width == 8 {
            write_uint(&mut self.buf, n as u64, 8);
        }
        self.finish_header(start, OBJECT_SORTED + width_step(width), width, Some(n));
    }

    // Move the members from just after the reserved header down to `target`.
    fn shift_members(&mut self, start: usize, target: usize) {
        self.buf
            .copy_within(start + RESERVED_HEADER.., start + target);
        let len = self.buf.len() - (RESERVED_HEADER - target);
        self.buf.truncate(len);
    }

    // Write head, byte length and (for widths below 8) the member count.
    fn finish_header(&mut self, start: usize, head: u8, width: usize, count: Option<usize>) {
        let byte_size = (self.buf.len() - start) as u64;
        self.buf[start] = head;
        store_uint(&mut self.buf, start + 1, byte_size, width);
        if let Some(count) = count {
            if width < 8 {
                store_uint(&mut self.buf, start + 1 + width, count as u64, width);
            }
        }
    }

    fn sorted_members(&self, start: usize, members: &[usize]) -> Result<Vec<usize>> {
        if members.len() < 2 {
            return Ok(members.to_vec());
        }
        let mut keyed = Vec::with_capacity(members.len());
        for &offset in members {
            keyed.push((self.view(start + offset).key_bytes()?, offset));
        }
        keyed.sort_by(|a, b| a.0.cmp(b.0));
        Ok(keyed.into_iter().map(|(_, offset)| offset).collect())
    }

    fn view(&self, pos: usize) -> Slice<'_> {
        let data = &self.buf[pos..];
        match self.translator {
            Some(t) => Slice::with_translator(data, t),
            None => Slice::new(data),
        }
    }
}

fn check_small_int(value: i64) -> Result<()> {
    if (SMALL_INT_MIN..=SMALL_INT_MAX).contains(&value) {
        Ok(())
    } else {
        Err(Error::NumberOutOfRange {
            ty: ValueType::SmallInt,
            value: value as i128,
        })
    }
}

// Everything `write_item` can't handle, so callers can fail before touching the buffer.
fn check_item(item: &Item<'_>) -> Result<()> {
    match item {
        Item::SmallInt(v) => check_small_int(*v),
        Item::Binary(v) if v.len() as u64 > u32::MAX as u64 => Err(Error::NumberOutOfRange {
            ty: ValueType::Binary,
            value: v.len() as i128,
        }),
        _ => Ok(()),
    }
}

fn small_int_head(v: i64) -> u8 {
    if v >= 0 {
        SMALL_INT_ZERO + v as u8
    } else {
        (SMALL_INT_NEG_BASE as i64 + v) as u8
    }
}

fn write_signed(buf: &mut Vec<u8>, v: i64, head: u8, width: usize) {
    if (SMALL_INT_MIN..=SMALL_INT_MAX).contains(&v) {
        buf.push(small_int_head(v));
    } else {
        buf.push(head);
        write_uint(buf, v as u64, width);
    }
}

fn width_step(width: usize) -> u8 {
    match width {
        1 => 0,
        2 => 1,
        4 => 2,
        _ => 3,
    }
}

// All members have the same byte size, so they can be addressed without a table.
fn is_uniform(members: &[usize], used: usize) -> bool {
    let size = members[1] - members[0];
    used - members[0] == members.len() * size
        && members.windows(2).all(|w| w[1] - w[0] == size)
}

/// Byte size and length-field size of a compact compound with `payload` member bytes and `count`
/// members, or `None` if the byte length would need more than 8 bytes.
pub(crate) fn compact_byte_size(payload: usize, count: usize) -> Option<(usize, usize)> {
    let nlen = varint::encoded_len(count as u64);
    let mut byte_size = 1 + payload + nlen;
    let mut blen = varint::encoded_len(byte_size as u64);
    byte_size += blen;
    if varint::encoded_len(byte_size as u64) != blen {
        byte_size += 1;
        blen += 1;
    }
    (blen <= 8).then_some((byte_size, blen))
}

/// Append a string value.
pub(crate) fn encode_string(buf: &mut Vec<u8>, v: &str) {
    let len = v.len();
    if len <= MAX_SHORT_STRING {
        buf.push(SHORT_STRING + len as u8);
    } else {
        buf.push(LONG_STRING);
        write_uint(buf, len as u64, 8);
    }
    buf.extend_from_slice(v.as_bytes());
}

/// Append an integer object key in its smallest form.
pub(crate) fn encode_key_code(buf: &mut Vec<u8>, code: u64) {
    if code <= SMALL_INT_MAX as u64 {
        buf.push(small_int_head(code as i64));
    } else {
        let width = (8 - code.leading_zeros() as usize / 8).max(1);
        buf.push(UINT_BASE + width as u8);
        write_uint(buf, code, width);
    }
}
