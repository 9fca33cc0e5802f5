//! Zero-copy access to encoded values.
//!
//! A [`Slice`] is a view of a byte buffer that starts at a value's head byte. Every query is
//! answered straight from the bytes: nothing is decoded up front and child values are new slices
//! into the same buffer. All reads are bounds-checked, so a slice over untrusted or truncated bytes
//! returns [`Error::BadEncode`] instead of panicking.

use std::fmt;
use std::str;

use crate::date::UtcDate;
use crate::error::{Error, Result};
use crate::integer::{bytes_at, read_f64, read_int, read_len, read_uint};
use crate::marker::*;
use crate::translator::AttributeTranslator;
use crate::varint;
use crate::BINARY_SEARCH_THRESHOLD;

static NONE_BYTES: [u8; 1] = [NONE];

/// An immutable view of a single encoded value.
#[derive(Clone, Copy)]
pub struct Slice<'a> {
    data: &'a [u8],
    translator: Option<&'a AttributeTranslator>,
}

// Position of the members and offset table of a non-empty, non-compact array or object.
struct Layout {
    width: usize,
    end: usize,
    count: usize,
    data_offset: usize,
    table: Option<usize>,
}

impl Layout {
    // Members sit between the header and the offset table, or the end of the value.
    fn members_end(&self) -> usize {
        self.table.unwrap_or(self.end)
    }
}

impl<'a> Slice<'a> {
    /// View `data` as a value starting at its first byte. An empty buffer is a `None` value.
    pub fn new(data: &'a [u8]) -> Self {
        let data = if data.is_empty() { &NONE_BYTES[..] } else { data };
        Self {
            data,
            translator: None,
        }
    }

    /// Like [`Slice::new`], resolving integer object keys through `translator`.
    pub fn with_translator(data: &'a [u8], translator: &'a AttributeTranslator) -> Self {
        let mut slice = Self::new(data);
        slice.translator = Some(translator);
        slice
    }

    /// The `None` value.
    pub fn none() -> Slice<'static> {
        Slice {
            data: &NONE_BYTES,
            translator: None,
        }
    }

    pub fn translator(&self) -> Option<&'a AttributeTranslator> {
        self.translator
    }

    /// Use `translator` unless the slice already has one.
    pub(crate) fn or_translator(mut self, translator: Option<&'a AttributeTranslator>) -> Self {
        if self.translator.is_none() {
            self.translator = translator;
        }
        self
    }

    pub fn head(&self) -> u8 {
        self.data[0]
    }

    pub fn value_type(&self) -> ValueType {
        ValueType::from_head(self.head())
    }

    pub fn is_none(&self) -> bool {
        self.value_type() == ValueType::None
    }

    pub fn is_illegal(&self) -> bool {
        self.head() == ILLEGAL
    }

    pub fn is_null(&self) -> bool {
        self.head() == NULL
    }

    pub fn is_bool(&self) -> bool {
        self.value_type() == ValueType::Bool
    }

    pub fn is_true(&self) -> bool {
        self.head() == TRUE
    }

    pub fn is_false(&self) -> bool {
        self.head() == FALSE
    }

    pub fn is_array(&self) -> bool {
        self.value_type() == ValueType::Array
    }

    pub fn is_object(&self) -> bool {
        self.value_type() == ValueType::Object
    }

    pub fn is_double(&self) -> bool {
        self.head() == DOUBLE
    }

    pub fn is_date(&self) -> bool {
        self.head() == UTC_DATE
    }

    pub fn is_external(&self) -> bool {
        self.head() == EXTERNAL
    }

    pub fn is_min_key(&self) -> bool {
        self.head() == MIN_KEY
    }

    pub fn is_max_key(&self) -> bool {
        self.head() == MAX_KEY
    }

    pub fn is_int(&self) -> bool {
        self.value_type() == ValueType::Int
    }

    pub fn is_uint(&self) -> bool {
        self.value_type() == ValueType::UInt
    }

    pub fn is_small_int(&self) -> bool {
        self.value_type() == ValueType::SmallInt
    }

    /// True for any of the three integer types.
    pub fn is_integer(&self) -> bool {
        self.value_type().is_integer()
    }

    pub fn is_number(&self) -> bool {
        self.is_integer() || self.is_double()
    }

    pub fn is_string(&self) -> bool {
        self.value_type() == ValueType::String
    }

    pub fn is_binary(&self) -> bool {
        self.value_type() == ValueType::Binary
    }

    pub fn is_bcd(&self) -> bool {
        self.value_type() == ValueType::BCD
    }

    pub fn is_custom(&self) -> bool {
        self.value_type() == ValueType::Custom
    }

    /// True for an array or object using the compact layout (no offset table).
    pub fn is_compact(&self) -> bool {
        is_compact(self.head())
    }

    /// True for an object whose offset table is sorted by key.
    pub fn is_sorted(&self) -> bool {
        is_sorted_object(self.head())
    }

    /// Total number of bytes this value occupies.
    pub fn byte_size(&self) -> Result<usize> {
        let head = self.head();
        if let Some(len) = fixed_length(head) {
            return Ok(len);
        }
        let size = match self.value_type() {
            ValueType::Array | ValueType::Object => {
                if is_compact(head) {
                    let (end, _) = varint::read(self.data, 1)?;
                    to_usize(end)?
                } else {
                    read_len(self.data, 1, offset_width(head))?
                }
            }
            ValueType::String => read_len(self.data, 1, 8)?.checked_add(9).ok_or_else(too_long)?,
            ValueType::Binary => {
                let width = (head - BINARY_BASE) as usize;
                read_len(self.data, 1, width)?
                    .checked_add(1 + width)
                    .ok_or_else(too_long)?
            }
            ValueType::BCD => {
                let width = (if head <= 0xcf { head - 0xc7 } else { head - 0xcf }) as usize;
                read_len(self.data, 1, width)?
                    .checked_add(1 + width)
                    .ok_or_else(too_long)?
            }
            ValueType::Custom => {
                let width = match head {
                    0xf4..=0xf6 => 1,
                    0xf7..=0xf9 => 2,
                    0xfa..=0xfc => 4,
                    _ => 8,
                };
                read_len(self.data, 1, width)?
                    .checked_add(1 + width)
                    .ok_or_else(too_long)?
            }
            _ => {
                return Err(Error::BadEncode(format!(
                    "reserved head byte 0x{:02x}",
                    head
                )))
            }
        };
        if size == 0 {
            return Err(Error::BadEncode("value claims a byte size of 0".into()));
        }
        Ok(size)
    }

    /// The encoded bytes of this value, and nothing past it.
    pub fn as_bytes(&self) -> Result<&'a [u8]> {
        bytes_at(self.data, 0, self.byte_size()?)
    }

    /// Byte length of a string, or the member count of an array or object.
    pub fn length(&self) -> Result<usize> {
        match self.value_type() {
            ValueType::String => Ok(self.string_bytes()?.len()),
            ValueType::Array | ValueType::Object => self.count(),
            ty => Err(Error::mismatch("String, Array or Object", ty)),
        }
    }

    /// Member count of an array or object.
    fn count(&self) -> Result<usize> {
        let head = self.head();
        if is_empty_compound(head) {
            Ok(0)
        } else if is_compact(head) {
            Ok(self.compact_layout()?.1)
        } else {
            Ok(self.layout()?.count)
        }
    }

    /// Array member at `index`.
    pub fn at(&self, index: usize) -> Result<Slice<'a>> {
        if !self.is_array() {
            return Err(Error::mismatch("Array", self.value_type()));
        }
        self.nth(index)
    }

    /// Key of the object member at `index`, in storage order.
    pub fn key_at(&self, index: usize) -> Result<Slice<'a>> {
        if !self.is_object() {
            return Err(Error::mismatch("Object", self.value_type()));
        }
        self.nth(index)
    }

    /// Value of the object member at `index`. Pairs with [`Slice::key_at`].
    pub fn value_at(&self, index: usize) -> Result<Slice<'a>> {
        if !self.is_object() {
            return Err(Error::mismatch("Object", self.value_type()));
        }
        let head = self.head();
        if is_empty_compound(head) {
            return Err(Error::IndexOutOfBounds { index, length: 0 });
        }
        if is_compact(head) {
            return self.compact_nth(index)?.1.ok_or_else(missing_value);
        }
        let layout = self.layout()?;
        let table = layout.table.ok_or_else(missing_table)?;
        if index >= layout.count {
            return Err(Error::IndexOutOfBounds {
                index,
                length: layout.count,
            });
        }
        let (_, next) = self.table_entry(&layout, table, index)?;
        Ok(self.member(next, layout.members_end())?.0)
    }

    // Array element or object key at `index`. Objects with an offset table return the `index`-th
    // entry of the (possibly sorted) table.
    fn nth(&self, index: usize) -> Result<Slice<'a>> {
        let head = self.head();
        if is_empty_compound(head) {
            return Err(Error::IndexOutOfBounds { index, length: 0 });
        }
        if is_compact(head) {
            return Ok(self.compact_nth(index)?.0);
        }

        let layout = self.layout()?;
        if index >= layout.count {
            return Err(Error::IndexOutOfBounds {
                index,
                length: layout.count,
            });
        }
        match layout.table {
            None => {
                let size = self.child(layout.data_offset)?.byte_size()?;
                Ok(self.member(layout.data_offset + index * size, layout.end)?.0)
            }
            Some(table) => Ok(self.table_entry(&layout, table, index)?.0),
        }
    }

    // Compact compounds have no index, so walk the members up to `index`.
    fn compact_nth(&self, index: usize) -> Result<(Slice<'a>, Option<Slice<'a>>)> {
        let mut iter = self.iter()?;
        let length = iter.remaining;
        if index >= length {
            return Err(Error::IndexOutOfBounds { index, length });
        }
        for _ in 0..index {
            if let Some(member) = iter.advance() {
                member?;
            }
        }
        iter.advance()
            .unwrap_or(Err(Error::IndexOutOfBounds { index, length }))
    }

    // Key or array member referenced by the offset table, along with the offset just past it.
    fn table_entry(&self, layout: &Layout, table: usize, index: usize) -> Result<(Slice<'a>, usize)> {
        let offset = read_len(self.data, table + index * layout.width, layout.width)?;
        if offset < layout.data_offset || offset >= table {
            return Err(Error::BadEncode(format!(
                "offset table entry {} points outside the member data",
                offset
            )));
        }
        self.member(offset, table)
    }

    /// Look up the value stored under `name` in an object. An absent key is `Ok(None)`.
    ///
    /// Integer keys are resolved through the slice's attribute translator; meeting one without a
    /// translator fails with [`Error::NeedAttributeTranslator`].
    pub fn get(&self, name: &str) -> Result<Option<Slice<'a>>> {
        let head = self.head();
        if !is_object_head(head) {
            return Err(Error::mismatch("Object", self.value_type()));
        }
        if head == EMPTY_OBJECT {
            return Ok(None);
        }
        if head == COMPACT_OBJECT {
            return self.search_compact(name.as_bytes());
        }
        let layout = self.layout()?;
        if layout.count == 1 {
            let end = layout.members_end();
            let (key, next) = self.member(layout.data_offset, end)?;
            return if key.key_bytes()? == name.as_bytes() {
                Ok(Some(self.member(next, end)?.0))
            } else {
                Ok(None)
            };
        }
        if is_sorted_object(head) && layout.count >= BINARY_SEARCH_THRESHOLD {
            self.search_binary(&layout, name.as_bytes())
        } else {
            self.search_linear(&layout, name.as_bytes())
        }
    }

    /// Follow a chain of object keys.
    pub fn get_path(&self, path: &[&str]) -> Result<Option<Slice<'a>>> {
        let mut cur = *self;
        for name in path {
            match cur.get(name)? {
                Some(next) => cur = next,
                None => return Ok(None),
            }
        }
        Ok(Some(cur))
    }

    pub fn has_key(&self, name: &str) -> Result<bool> {
        Ok(self.get(name)?.is_some())
    }

    fn search_compact(&self, name: &[u8]) -> Result<Option<Slice<'a>>> {
        let mut iter = self.iter()?;
        while let Some(member) = iter.advance() {
            let (key, value) = member?;
            if key.key_bytes()? == name {
                return Ok(value);
            }
        }
        Ok(None)
    }

    fn search_linear(&self, layout: &Layout, name: &[u8]) -> Result<Option<Slice<'a>>> {
        let table = layout.table.ok_or_else(missing_table)?;
        for index in 0..layout.count {
            let (key, next) = self.table_entry(layout, table, index)?;
            if key.key_bytes()? == name {
                return Ok(Some(self.member(next, table)?.0));
            }
        }
        Ok(None)
    }

    fn search_binary(&self, layout: &Layout, name: &[u8]) -> Result<Option<Slice<'a>>> {
        use std::cmp::Ordering;
        let table = layout.table.ok_or_else(missing_table)?;
        if layout.count == 0 {
            return Ok(None);
        }
        let mut l = 0usize;
        let mut r = layout.count - 1;
        loop {
            let index = l + (r - l) / 2;
            let (key, next) = self.table_entry(layout, table, index)?;
            match key.key_bytes()?.cmp(name) {
                Ordering::Equal => return Ok(Some(self.member(next, table)?.0)),
                Ordering::Greater => {
                    if index == 0 {
                        return Ok(None);
                    }
                    r = index - 1;
                }
                Ordering::Less => l = index + 1,
            }
            if r < l {
                return Ok(None);
            }
        }
    }

    /// Iterate over the members of an array, or the keys of an object, in storage order.
    pub fn iter(&self) -> Result<Iter<'a>> {
        let head = self.head();
        let pairs = match self.value_type() {
            ValueType::Array => false,
            ValueType::Object => true,
            ty => return Err(Error::mismatch("Array or Object", ty)),
        };
        let (offset, end, remaining) = if is_empty_compound(head) {
            (0, 0, 0)
        } else if is_compact(head) {
            let (end, count, data_offset) = self.compact_layout()?;
            (data_offset, end, count)
        } else {
            let layout = self.layout()?;
            (layout.data_offset, layout.members_end(), layout.count)
        };
        Ok(Iter {
            parent: *self,
            offset,
            end,
            remaining,
            pairs,
            errored: false,
        })
    }

    /// Iterate over the `(key, value)` pairs of an object, in storage order.
    pub fn entries(&self) -> Result<ObjectIter<'a>> {
        if !self.is_object() {
            return Err(Error::mismatch("Object", self.value_type()));
        }
        Ok(ObjectIter { members: self.iter()? })
    }

    /// Name of an object key, resolving translated integer keys.
    pub fn key_name(&self) -> Result<&'a str> {
        str::from_utf8(self.key_bytes()?)
            .map_err(|_| Error::BadEncode("object key is not valid UTF-8".into()))
    }

    pub(crate) fn key_bytes(&self) -> Result<&'a [u8]> {
        match self.value_type() {
            ValueType::String => self.string_bytes(),
            ValueType::SmallInt | ValueType::UInt | ValueType::Int => {
                let translator = self.translator.ok_or(Error::NeedAttributeTranslator)?;
                let code = self
                    .as_u64()
                    .map_err(|_| Error::KeyType("negative attribute code".into()))?;
                translator
                    .translate_code(code)
                    .ok_or_else(|| Error::KeyType(format!("unknown attribute code {}", code)))?
                    .string_bytes()
            }
            ty => Err(Error::KeyType(format!("object key of type {}", ty.name()))),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self.head() {
            TRUE => Ok(true),
            FALSE => Ok(false),
            _ => Err(Error::mismatch("Bool", self.value_type())),
        }
    }

    pub fn as_i64(&self) -> Result<i64> {
        let head = self.head();
        match head {
            0x20..=0x27 => read_int(self.data, 1, (head - INT_BASE) as usize),
            0x28..=0x2f => {
                let v = read_uint(self.data, 1, (head - UINT_BASE) as usize)?;
                i64::try_from(v).map_err(|_| Error::NumberOutOfRange {
                    ty: ValueType::Int,
                    value: v as i128,
                })
            }
            0x30..=0x3f => Ok(small_int(head)),
            _ => Err(Error::mismatch("Int", self.value_type())),
        }
    }

    pub fn as_u64(&self) -> Result<u64> {
        let head = self.head();
        match head {
            0x28..=0x2f => read_uint(self.data, 1, (head - UINT_BASE) as usize),
            _ => {
                let v = self
                    .as_i64()
                    .map_err(|_| Error::mismatch("UInt", self.value_type()))?;
                u64::try_from(v).map_err(|_| Error::NumberOutOfRange {
                    ty: ValueType::UInt,
                    value: v as i128,
                })
            }
        }
    }

    /// Any integer type, without range limits.
    pub fn as_big_integer(&self) -> Result<i128> {
        let head = self.head();
        match head {
            0x28..=0x2f => Ok(self.as_u64()? as i128),
            0x20..=0x27 | 0x30..=0x3f => Ok(self.as_i64()? as i128),
            _ => Err(Error::mismatch("Int", self.value_type())),
        }
    }

    pub fn as_f64(&self) -> Result<f64> {
        if self.is_double() {
            read_f64(self.data, 1)
        } else {
            Err(Error::mismatch("Double", self.value_type()))
        }
    }

    pub fn as_date(&self) -> Result<UtcDate> {
        if self.is_date() {
            Ok(UtcDate::from_millis(read_int(self.data, 1, 8)?))
        } else {
            Err(Error::mismatch("UtcDate", self.value_type()))
        }
    }

    pub fn as_str(&self) -> Result<&'a str> {
        str::from_utf8(self.string_bytes()?)
            .map_err(|_| Error::BadEncode("string is not valid UTF-8".into()))
    }

    pub fn as_binary(&self) -> Result<&'a [u8]> {
        let head = self.head();
        if !self.is_binary() {
            return Err(Error::mismatch("Binary", self.value_type()));
        }
        let width = (head - BINARY_BASE) as usize;
        let len = read_len(self.data, 1, width)?;
        bytes_at(self.data, 1 + width, len)
    }

    pub(crate) fn string_bytes(&self) -> Result<&'a [u8]> {
        let head = self.head();
        match head {
            SHORT_STRING..=0xbe => bytes_at(self.data, 1, (head - SHORT_STRING) as usize),
            LONG_STRING => {
                let len = read_len(self.data, 1, 8)?;
                bytes_at(self.data, 9, len)
            }
            _ => Err(Error::mismatch("String", self.value_type())),
        }
    }

    // Member starting at `offset`, which must lie entirely before `end`, and the offset just past
    // it.
    fn member(&self, offset: usize, end: usize) -> Result<(Slice<'a>, usize)> {
        if offset >= end {
            return Err(Error::BadEncode(
                "member starts past the end of its array or object".into(),
            ));
        }
        let member = self.child(offset)?;
        let next = offset
            .checked_add(member.byte_size()?)
            .filter(|next| *next <= end)
            .ok_or_else(|| {
                Error::BadEncode("member runs past the end of its array or object".into())
            })?;
        Ok((member, next))
    }

    fn child(&self, offset: usize) -> Result<Slice<'a>> {
        match self.data.get(offset..) {
            Some(data) if !data.is_empty() => Ok(Slice {
                data,
                translator: self.translator,
            }),
            _ => Err(Error::truncated("array or object")),
        }
    }

    // End of the member data, member count and offset of the first member of a compact array or
    // object.
    fn compact_layout(&self) -> Result<(usize, usize, usize)> {
        let (end, len) = varint::read(self.data, 1)?;
        let end = to_usize(end)?;
        if end > self.data.len() {
            return Err(Error::truncated("compact array or object"));
        }
        if end < len + 2 {
            return Err(Error::BadEncode("compact array or object too short".into()));
        }
        let (count, count_len) = varint::read_reverse(self.data, end - 1)?;
        let members_end = end
            .checked_sub(count_len)
            .filter(|members_end| *members_end >= 1 + len)
            .ok_or_else(|| Error::BadEncode("compact member count overlaps the header".into()))?;
        Ok((members_end, to_usize(count)?, 1 + len))
    }

    fn layout(&self) -> Result<Layout> {
        let head = self.head();
        let width = offset_width(head);
        let end = read_len(self.data, 1, width)?;
        if end > self.data.len() {
            return Err(Error::truncated("array or object"));
        }
        let data_offset = self.find_data_offset(head);
        if data_offset >= end {
            return Err(Error::BadEncode("array or object has no room for members".into()));
        }
        if is_table_free_array(head) {
            let size = self.child(data_offset)?.byte_size()?;
            return Ok(Layout {
                width,
                end,
                count: (end - data_offset) / size,
                data_offset,
                table: None,
            });
        }
        let count = if width < 8 {
            read_len(self.data, 1 + width, width)?
        } else {
            read_len(self.data, end - width, width)?
        };
        let table = count
            .checked_mul(width)
            .and_then(|len| len.checked_add(if width == 8 { 8 } else { 0 }))
            .and_then(|len| end.checked_sub(len))
            .filter(|table| *table >= data_offset)
            .ok_or_else(|| Error::BadEncode("offset table doesn't fit the value".into()))?;
        Ok(Layout {
            width,
            end,
            count,
            data_offset,
            table: Some(table),
        })
    }

    // Builders reserve a full 9-byte header and only move the members down for the 1-byte
    // layout, so the first member starts at the first non-zero byte among the candidates.
    fn find_data_offset(&self, head: u8) -> usize {
        let first = first_sub_offset(head);
        let nonzero = |i: usize| self.data.get(i).map_or(false, |b| *b != 0);
        if first <= 2 && nonzero(2) {
            2
        } else if first <= 3 && nonzero(3) {
            3
        } else if first <= 5 && nonzero(5) {
            5
        } else {
            9
        }
    }
}

fn small_int(head: u8) -> i64 {
    if head < SMALL_INT_ZERO + 10 {
        (head - SMALL_INT_ZERO) as i64
    } else {
        head as i64 - SMALL_INT_NEG_BASE as i64
    }
}

fn to_usize(v: u64) -> Result<usize> {
    usize::try_from(v).map_err(|_| too_long())
}

fn too_long() -> Error {
    Error::BadEncode("value length doesn't fit in memory".into())
}

fn missing_table() -> Error {
    Error::BadEncode("object has no offset table".into())
}

fn missing_value() -> Error {
    Error::BadEncode("object key without a value".into())
}

impl<'a> fmt::Debug for Slice<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_bytes() {
            Ok(bytes) => write!(f, "Slice({:?}, {:02x?})", self.value_type(), bytes),
            Err(_) => write!(f, "Slice({:?}, <malformed>)", self.value_type()),
        }
    }
}

/// Iterator over array members or object keys. See [`Slice::iter`].
///
/// Every member must lie inside its array or object. Stops after the first error.
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    parent: Slice<'a>,
    offset: usize,
    end: usize,
    remaining: usize,
    pairs: bool,
    errored: bool,
}

impl<'a> Iter<'a> {
    // Next array member, or next object key together with its value.
    fn advance(&mut self) -> Option<Result<(Slice<'a>, Option<Slice<'a>>)>> {
        if self.errored || self.remaining == 0 {
            return None;
        }
        match self.step() {
            Ok((member, value, next)) => {
                self.offset = next;
                self.remaining -= 1;
                Some(Ok((member, value)))
            }
            Err(e) => {
                self.errored = true;
                Some(Err(e))
            }
        }
    }

    fn step(&self) -> Result<(Slice<'a>, Option<Slice<'a>>, usize)> {
        let (member, next) = self.parent.member(self.offset, self.end)?;
        if self.pairs {
            let (value, next) = self.parent.member(next, self.end)?;
            Ok((member, Some(value), next))
        } else {
            Ok((member, None, next))
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = Result<Slice<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().map(|member| member.map(|(member, _)| member))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.errored {
            (0, Some(0))
        } else {
            (0, Some(self.remaining))
        }
    }
}

/// Iterator over the `(key, value)` pairs of an object. See [`Slice::entries`].
#[derive(Clone, Debug)]
pub struct ObjectIter<'a> {
    members: Iter<'a>,
}

impl<'a> Iterator for ObjectIter<'a> {
    type Item = Result<(&'a str, Slice<'a>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = match self.members.advance()? {
            Ok(member) => member,
            Err(e) => return Some(Err(e)),
        };
        let entry = key
            .key_name()
            .and_then(|name| Ok((name, value.ok_or_else(missing_value)?)));
        if entry.is_err() {
            self.members.errored = true;
        }
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.members.size_hint()
    }
}
