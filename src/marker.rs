//! Head byte tables.
//!
//! Every VelocyPack value starts with a single head byte which alone determines the value's type
//! and, for most scalars, its total size.

pub(crate) const NONE: u8 = 0x00;
pub(crate) const EMPTY_ARRAY: u8 = 0x01;
pub(crate) const ARRAY_NO_INDEX: u8 = 0x02;
pub(crate) const ARRAY_INDEXED: u8 = 0x06;
pub(crate) const EMPTY_OBJECT: u8 = 0x0a;
pub(crate) const OBJECT_SORTED: u8 = 0x0b;
pub(crate) const OBJECT_UNSORTED: u8 = 0x0f;
pub(crate) const COMPACT_ARRAY: u8 = 0x13;
pub(crate) const COMPACT_OBJECT: u8 = 0x14;
pub(crate) const ILLEGAL: u8 = 0x17;
pub(crate) const NULL: u8 = 0x18;
pub(crate) const FALSE: u8 = 0x19;
pub(crate) const TRUE: u8 = 0x1a;
pub(crate) const DOUBLE: u8 = 0x1b;
pub(crate) const UTC_DATE: u8 = 0x1c;
pub(crate) const EXTERNAL: u8 = 0x1d;
pub(crate) const MIN_KEY: u8 = 0x1e;
pub(crate) const MAX_KEY: u8 = 0x1f;
pub(crate) const INT_BASE: u8 = 0x1f;
pub(crate) const SHORT: u8 = 0x21;
pub(crate) const INT: u8 = 0x23;
pub(crate) const LONG: u8 = 0x27;
pub(crate) const UINT_BASE: u8 = 0x27;
pub(crate) const ULONG: u8 = 0x2f;
pub(crate) const SMALL_INT_ZERO: u8 = 0x30;
pub(crate) const SMALL_INT_NEG_BASE: u8 = 0x40;
pub(crate) const SHORT_STRING: u8 = 0x40;
pub(crate) const LONG_STRING: u8 = 0xbf;
pub(crate) const BINARY_BASE: u8 = 0xbf;
pub(crate) const BINARY_4: u8 = 0xc3;

/// Longest string that still fits its length into the head byte.
pub(crate) const MAX_SHORT_STRING: usize = 126;

/// Smallest and largest integer packed entirely into the head byte.
pub const SMALL_INT_MIN: i64 = -6;
pub const SMALL_INT_MAX: i64 = 9;

/// The type of a VelocyPack value, derived purely from its head byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    None,
    Illegal,
    Null,
    Bool,
    Array,
    Object,
    Double,
    UtcDate,
    External,
    MinKey,
    MaxKey,
    Int,
    UInt,
    SmallInt,
    String,
    Binary,
    BCD,
    Custom,
}

impl ValueType {
    /// Look up the type of a head byte.
    pub fn from_head(head: u8) -> ValueType {
        TYPE_MAP[head as usize]
    }

    pub fn name(&self) -> &'static str {
        use self::ValueType::*;
        match self {
            None => "None",
            Illegal => "Illegal",
            Null => "Null",
            Bool => "Bool",
            Array => "Array",
            Object => "Object",
            Double => "Double",
            UtcDate => "UtcDate",
            External => "External",
            MinKey => "MinKey",
            MaxKey => "MaxKey",
            Int => "Int",
            UInt => "UInt",
            SmallInt => "SmallInt",
            String => "String",
            Binary => "Binary",
            BCD => "BCD",
            Custom => "Custom",
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, ValueType::Int | ValueType::UInt | ValueType::SmallInt)
    }
}

const fn build_type_map() -> [ValueType; 256] {
    let mut map = [ValueType::None; 256];
    let mut i = 0usize;
    while i < 256 {
        let h = i as u8;
        map[i] = match h {
            0x01..=0x09 | 0x13 => ValueType::Array,
            0x0a..=0x12 | 0x14 => ValueType::Object,
            0x17 => ValueType::Illegal,
            0x18 => ValueType::Null,
            0x19 | 0x1a => ValueType::Bool,
            0x1b => ValueType::Double,
            0x1c => ValueType::UtcDate,
            0x1d => ValueType::External,
            0x1e => ValueType::MinKey,
            0x1f => ValueType::MaxKey,
            0x20..=0x27 => ValueType::Int,
            0x28..=0x2f => ValueType::UInt,
            0x30..=0x3f => ValueType::SmallInt,
            0x40..=0xbf => ValueType::String,
            0xc0..=0xc7 => ValueType::Binary,
            0xc8..=0xd7 => ValueType::BCD,
            0xf0..=0xff => ValueType::Custom,
            _ => ValueType::None,
        };
        i += 1;
    }
    map
}

// Total byte length of values whose size is implied by the head byte. Zero means the length is
// stored in the value itself (or the head byte is reserved).
const fn build_fixed_length_map() -> [u8; 256] {
    let mut map = [0u8; 256];
    let mut i = 0usize;
    while i < 256 {
        let h = i as u8;
        map[i] = match h {
            0x00 | 0x01 | 0x0a => 1,
            0x17..=0x1a => 1,
            0x1b..=0x1d => 9,
            0x1e | 0x1f => 1,
            0x20..=0x27 => h - INT_BASE + 1,
            0x28..=0x2f => h - UINT_BASE + 1,
            0x30..=0x3f => 1,
            0x40..=0xbe => h - SHORT_STRING + 1,
            0xf0 => 2,
            0xf1 => 3,
            0xf2 => 5,
            0xf3 => 9,
            _ => 0,
        };
        i += 1;
    }
    map
}

static TYPE_MAP: [ValueType; 256] = build_type_map();
static FIXED_LENGTH_MAP: [u8; 256] = build_fixed_length_map();

/// Byte size of a value implied by its head byte alone, or `None` if it must be read from the
/// value.
pub(crate) fn fixed_length(head: u8) -> Option<usize> {
    match FIXED_LENGTH_MAP[head as usize] {
        0 => None,
        n => Some(n as usize),
    }
}

/// Width of the byte-length, count and offset-table fields of an array or object that isn't
/// empty or compact.
pub(crate) fn offset_width(head: u8) -> usize {
    match head {
        0x02 | 0x06 | 0x0b | 0x0f => 1,
        0x03 | 0x07 | 0x0c | 0x10 => 2,
        0x04 | 0x08 | 0x0d | 0x11 => 4,
        _ => 8,
    }
}

/// Smallest possible offset of the first member for an array or object head.
pub(crate) fn first_sub_offset(head: u8) -> usize {
    match head {
        0x02 => 2,
        0x03 | 0x06 | 0x0b | 0x0f => 3,
        0x04 | 0x07 | 0x0c | 0x10 => 5,
        0x13 | 0x14 => 2,
        _ => 9,
    }
}

pub(crate) fn is_compact(head: u8) -> bool {
    head == COMPACT_ARRAY || head == COMPACT_OBJECT
}

pub(crate) fn is_empty_compound(head: u8) -> bool {
    head == EMPTY_ARRAY || head == EMPTY_OBJECT
}

pub(crate) fn is_object_head(head: u8) -> bool {
    (EMPTY_OBJECT..=0x12).contains(&head) || head == COMPACT_OBJECT
}

pub(crate) fn is_sorted_object(head: u8) -> bool {
    (OBJECT_SORTED..OBJECT_UNSORTED).contains(&head)
}

/// Arrays that store neither a member count nor an offset table.
pub(crate) fn is_table_free_array(head: u8) -> bool {
    (ARRAY_NO_INDEX..ARRAY_INDEXED).contains(&head)
}
