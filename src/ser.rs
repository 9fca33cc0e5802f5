//! Serialization.
//!
//! Values are written straight into a [`Builder`], which takes care of picking the layout of
//! every array and object. Rust integer types map onto fixed VelocyPack widths:
//!
//! - `i8`, `i16` - 2-byte signed int
//! - `i32`, `u8`, `u16` - 4-byte signed int
//! - `i64`, `u32` - 8-byte signed int
//! - `u64` - 8-byte unsigned int
//!
//! Any of them that falls within -6..=9 is written as a one-byte small int instead.
//!
//! Enum variants, when mapped, are:
//! - Unit - Just the variant name as a string
//! - Newtype - Object with one member. Key is variant name, content is the value
//! - Tuple - Object with one member. Key is variant name, content is the tuple as an array
//! - Struct - Object with one member. Key is variant name, content is the struct
//!
//! Map keys must serialize as strings, chars, unit variants or integers. Integer keys are written
//! as their decimal string.

use serde::ser::*;

use crate::builder::{Builder, Item};
use crate::date::DATE_TOKEN;
use crate::depth_tracking::DepthTracker;
use crate::error::{Error, Result};
use crate::marker::NULL;

pub(crate) struct VPackSerializer<'t> {
    builder: Builder<'t>,
    serialize_nulls: bool,
    depth_tracking: DepthTracker,
}

impl<'t> VPackSerializer<'t> {
    pub(crate) fn new(builder: Builder<'t>, serialize_nulls: bool) -> Self {
        Self {
            builder,
            serialize_nulls,
            depth_tracking: DepthTracker::new(),
        }
    }

    pub(crate) fn into_builder(self) -> Builder<'t> {
        self.builder
    }

    fn add(&mut self, item: Item<'_>) -> Result<()> {
        self.builder.add(item)
    }

    fn open(&mut self, item: Item<'_>) -> Result<()> {
        self.depth_tracking.enter()?;
        self.builder.add(item)
    }

    fn close(&mut self) -> Result<()> {
        self.builder.close()?;
        self.depth_tracking.leave();
        Ok(())
    }

    // Wrap a variant's content in a single-member object.
    fn open_variant(&mut self, variant: &'static str) -> Result<()> {
        self.open(Item::object())?;
        self.builder.add_key(variant)
    }

    // Write the value of an object member whose key was just written. Drops the whole member if
    // the value came out null and nulls are being skipped.
    fn member_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let pos = self.builder.len();
        value.serialize(&mut *self)?;
        if !self.serialize_nulls && self.builder.tail(pos) == &[NULL][..] {
            self.builder.remove_last()?;
        }
        Ok(())
    }
}

impl<'a, 't> Serializer for &'a mut VPackSerializer<'t> {
    type Ok = ();
    type Error = Error;
    type SerializeSeq = Compound<'a, 't>;
    type SerializeTuple = Compound<'a, 't>;
    type SerializeTupleStruct = Compound<'a, 't>;
    type SerializeTupleVariant = Compound<'a, 't>;
    type SerializeMap = Compound<'a, 't>;
    type SerializeStruct = Compound<'a, 't>;
    type SerializeStructVariant = Compound<'a, 't>;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.add(Item::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.add(Item::Short(v as i16))
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.add(Item::Short(v))
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.add(Item::Int(v))
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.add(Item::Long(v))
    }

    fn serialize_i128(self, v: i128) -> Result<()> {
        if let Ok(v) = i64::try_from(v) {
            self.add(Item::Long(v))
        } else if let Ok(v) = u64::try_from(v) {
            self.add(Item::UInt(v))
        } else {
            Err(Error::NumberOutOfRange {
                ty: crate::ValueType::Int,
                value: v,
            })
        }
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.add(Item::Int(v as i32))
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.add(Item::Int(v as i32))
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.add(Item::Long(v as i64))
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.add(Item::UInt(v))
    }

    fn serialize_u128(self, v: u128) -> Result<()> {
        let v = u64::try_from(v).map_err(|_| Error::NumberOutOfRange {
            ty: crate::ValueType::UInt,
            value: i128::try_from(v).unwrap_or(i128::MAX),
        })?;
        self.add(Item::UInt(v))
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.add(Item::Double(v as f64))
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        self.add(Item::Double(v))
    }

    fn serialize_char(self, v: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.add(Item::Str(v.encode_utf8(&mut buf)))
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.add(Item::Str(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        self.add(Item::Binary(v))
    }

    fn serialize_none(self) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_some<T: Serialize + ?Sized>(self, v: &T) -> Result<()> {
        v.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        self.add(Item::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        v: &T,
    ) -> Result<()> {
        if name == DATE_TOKEN {
            v.serialize(DateSerializer { se: self })
        } else {
            v.serialize(self)
        }
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<()> {
        self.open_variant(variant)?;
        value.serialize(&mut *self)?;
        self.close()
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        self.open(Item::array())?;
        Ok(Compound::new(self, false))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        self.open(Item::array())?;
        Ok(Compound::new(self, false))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        // Tuple structs usually just discard the name
        self.open(Item::array())?;
        Ok(Compound::new(self, false))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        self.open_variant(variant)?;
        self.open(Item::array())?;
        Ok(Compound::new(self, true))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        self.open(Item::object())?;
        Ok(Compound::new(self, false))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        self.open(Item::object())?;
        Ok(Compound::new(self, false))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        self.open_variant(variant)?;
        self.open(Item::object())?;
        Ok(Compound::new(self, true))
    }
}

/// An open array or object. Key order doesn't matter here: the builder sorts object members when
/// the object is closed.
pub(crate) struct Compound<'a, 't> {
    se: &'a mut VPackSerializer<'t>,
    key: String,
    // Also close the object wrapping an enum variant
    variant: bool,
}

impl<'a, 't> Compound<'a, 't> {
    fn new(se: &'a mut VPackSerializer<'t>, variant: bool) -> Self {
        Self {
            se,
            key: String::new(),
            variant,
        }
    }

    fn end_inner(self) -> Result<()> {
        self.se.close()?;
        if self.variant {
            self.se.close()?;
        }
        Ok(())
    }

    fn field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.se.builder.add_key(key)?;
        self.se.member_value(value)
    }
}

impl<'a, 't> SerializeSeq for Compound<'a, 't> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut *self.se)
    }

    fn end(self) -> Result<()> {
        self.end_inner()
    }
}

impl<'a, 't> SerializeTuple for Compound<'a, 't> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut *self.se)
    }

    fn end(self) -> Result<()> {
        self.end_inner()
    }
}

impl<'a, 't> SerializeTupleStruct for Compound<'a, 't> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut *self.se)
    }

    fn end(self) -> Result<()> {
        self.end_inner()
    }
}

impl<'a, 't> SerializeTupleVariant for Compound<'a, 't> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut *self.se)
    }

    fn end(self) -> Result<()> {
        self.end_inner()
    }
}

impl<'a, 't> SerializeMap for Compound<'a, 't> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        // Turn the key into a String or fail (this clears out the string before serializing)
        value.serialize(KeySerializer::new(&mut self.key))?;
        self.se.builder.add_key(self.key.as_str())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.se.member_value(value)
    }

    fn end(self) -> Result<()> {
        self.end_inner()
    }
}

impl<'a, 't> SerializeStruct for Compound<'a, 't> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        field: &'static str,
        value: &T,
    ) -> Result<()> {
        self.field(field, value)
    }

    fn end(self) -> Result<()> {
        self.end_inner()
    }
}

impl<'a, 't> SerializeStructVariant for Compound<'a, 't> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        field: &'static str,
        value: &T,
    ) -> Result<()> {
        self.field(field, value)
    }

    fn end(self) -> Result<()> {
        self.end_inner()
    }
}

/// Writes the milliseconds carried by a `UtcDate` as a date value.
struct DateSerializer<'a, 't> {
    se: &'a mut VPackSerializer<'t>,
}

impl<'a, 't> DateSerializer<'a, 't> {
    fn ser_fail(&self, received: &'static str) -> Error {
        let s = format!("expected date milliseconds, received {}", received);
        Error::SerdeFail(s)
    }
}

impl<'a, 't> Serializer for DateSerializer<'a, 't> {
    type Ok = ();
    type Error = Error;

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.se.add(Item::UtcDate(v))
    }

    type SerializeSeq = Impossible<(), Error>;
    type SerializeTuple = Impossible<(), Error>;
    type SerializeTupleStruct = Impossible<(), Error>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = Impossible<(), Error>;
    type SerializeStruct = Impossible<(), Error>;
    type SerializeStructVariant = Impossible<(), Error>;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn serialize_bool(self, _: bool) -> Result<()> {
        Err(self.ser_fail("bool"))
    }

    fn serialize_i8(self, _: i8) -> Result<()> {
        Err(self.ser_fail("i8"))
    }

    fn serialize_i16(self, _: i16) -> Result<()> {
        Err(self.ser_fail("i16"))
    }

    fn serialize_i32(self, _: i32) -> Result<()> {
        Err(self.ser_fail("i32"))
    }

    fn serialize_u8(self, _: u8) -> Result<()> {
        Err(self.ser_fail("u8"))
    }

    fn serialize_u16(self, _: u16) -> Result<()> {
        Err(self.ser_fail("u16"))
    }

    fn serialize_u32(self, _: u32) -> Result<()> {
        Err(self.ser_fail("u32"))
    }

    fn serialize_u64(self, _: u64) -> Result<()> {
        Err(self.ser_fail("u64"))
    }

    fn serialize_f32(self, _: f32) -> Result<()> {
        Err(self.ser_fail("f32"))
    }

    fn serialize_f64(self, _: f64) -> Result<()> {
        Err(self.ser_fail("f64"))
    }

    fn serialize_char(self, _: char) -> Result<()> {
        Err(self.ser_fail("char"))
    }

    fn serialize_str(self, _: &str) -> Result<()> {
        Err(self.ser_fail("str"))
    }

    fn serialize_bytes(self, _: &[u8]) -> Result<()> {
        Err(self.ser_fail("bytes"))
    }

    fn serialize_none(self) -> Result<()> {
        Err(self.ser_fail("None"))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, _: &T) -> Result<()> {
        Err(self.ser_fail("Some"))
    }

    fn serialize_unit(self) -> Result<()> {
        Err(self.ser_fail("unit"))
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<()> {
        Err(self.ser_fail("unit_struct"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<()> {
        Err(self.ser_fail("unit_variant"))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _v: &T,
    ) -> Result<()> {
        Err(self.ser_fail("newtype_struct"))
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<()> {
        Err(self.ser_fail("newtype_variant"))
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(self.ser_fail("seq"))
    }

    fn serialize_tuple(self, _: usize) -> Result<Self::SerializeTuple> {
        Err(self.ser_fail("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(self.ser_fail("tuple_struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(self.ser_fail("tuple_variant"))
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self::SerializeMap> {
        Err(self.ser_fail("map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(self.ser_fail("struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(self.ser_fail("struct_variant"))
    }
}

struct KeySerializer<'a> {
    s: &'a mut String,
}

impl<'a> KeySerializer<'a> {
    fn new(s: &'a mut String) -> Self {
        s.clear();
        Self { s }
    }

    fn ser_fail(&self, received: &'static str) -> Error {
        let s = format!("expected string, received {}", received);
        Error::SerdeFail(s)
    }

    fn number(self, v: impl std::fmt::Display) -> Result<()> {
        use std::fmt::Write;
        write!(self.s, "{}", v).map_err(|e| Error::SerdeFail(e.to_string()))
    }
}

impl<'a> Serializer for KeySerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_char(self, v: char) -> Result<()> {
        self.s.push(v);
        Ok(())
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.s.push_str(v);
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.s.push_str(variant);
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        v: &T,
    ) -> Result<()> {
        v.serialize(self)
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.number(v)
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.number(v)
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.number(v)
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.number(v)
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.number(v)
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.number(v)
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.number(v)
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.number(v)
    }

    type SerializeSeq = Impossible<(), Error>;
    type SerializeTuple = Impossible<(), Error>;
    type SerializeTupleStruct = Impossible<(), Error>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = Impossible<(), Error>;
    type SerializeStruct = Impossible<(), Error>;
    type SerializeStructVariant = Impossible<(), Error>;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn serialize_bool(self, _: bool) -> Result<()> {
        Err(self.ser_fail("bool"))
    }

    fn serialize_f32(self, _: f32) -> Result<()> {
        Err(self.ser_fail("f32"))
    }

    fn serialize_f64(self, _: f64) -> Result<()> {
        Err(self.ser_fail("f64"))
    }

    fn serialize_bytes(self, _: &[u8]) -> Result<()> {
        Err(self.ser_fail("bytes"))
    }

    fn serialize_none(self) -> Result<()> {
        Err(self.ser_fail("None"))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, _: &T) -> Result<()> {
        Err(self.ser_fail("Some"))
    }

    fn serialize_unit(self) -> Result<()> {
        Err(self.ser_fail("unit"))
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<()> {
        Err(self.ser_fail("unit_struct"))
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<()> {
        Err(self.ser_fail("newtype_variant"))
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(self.ser_fail("seq"))
    }

    fn serialize_tuple(self, _: usize) -> Result<Self::SerializeTuple> {
        Err(self.ser_fail("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(self.ser_fail("tuple_struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(self.ser_fail("tuple_variant"))
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self::SerializeMap> {
        Err(self.ser_fail("map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(self.ser_fail("struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(self.ser_fail("struct_variant"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Slice, UtcDate};
    use serde::Serialize;
    use std::collections::{BTreeMap, HashMap};

    fn encode<T: Serialize + ?Sized>(value: &T) -> Vec<u8> {
        crate::to_vec(value).unwrap()
    }

    fn encode_skipping_nulls<T: Serialize + ?Sized>(value: &T) -> Vec<u8> {
        let mut se = VPackSerializer::new(Builder::new(), false);
        value.serialize(&mut se).unwrap();
        se.into_builder().into_vec().unwrap()
    }

    #[test]
    fn integer_widths() {
        assert_eq!(encode(&3i8), [0x33]);
        assert_eq!(encode(&-100i8), [0x21, 0x9c, 0xff]);
        assert_eq!(encode(&1000i16), [0x21, 0xe8, 0x03]);
        assert_eq!(encode(&1000i32), [0x23, 0xe8, 0x03, 0, 0]);
        assert_eq!(encode(&200u8), [0x23, 200, 0, 0, 0]);
        assert_eq!(encode(&1000u16), [0x23, 0xe8, 0x03, 0, 0]);
        assert_eq!(encode(&1000u32), [0x27, 0xe8, 0x03, 0, 0, 0, 0, 0, 0]);
        assert_eq!(encode(&-1000i64), [0x27, 0x18, 0xfc, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
        assert_eq!(encode(&1000u64), [0x2f, 0xe8, 0x03, 0, 0, 0, 0, 0, 0]);
        assert_eq!(encode(&9u64), [0x39]);
        assert_eq!(encode(&-6i32), [0x3a]);
        assert_eq!(encode(&-7i32), [0x23, 0xf9, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn scalars() {
        assert_eq!(encode(&()), [0x18]);
        assert_eq!(encode(&Option::<u8>::None), [0x18]);
        assert_eq!(encode(&Some(true)), [0x1a]);
        assert_eq!(encode(&'x'), [0x41, b'x']);
        assert_eq!(encode("hi"), [0x42, b'h', b'i']);
        assert_eq!(
            encode(&serde_bytes::Bytes::new(&[7, 8])),
            [0xc3, 2, 0, 0, 0, 7, 8]
        );
        let buf = encode(&1.5f32);
        assert_eq!(Slice::new(&buf).as_f64().unwrap(), 1.5);
        let buf = encode(&UtcDate::from_millis(99));
        assert_eq!(buf[0], 0x1c);
        assert_eq!(Slice::new(&buf).as_date().unwrap().millis(), 99);
    }

    #[derive(Serialize)]
    struct Doc {
        name: String,
        tags: Vec<&'static str>,
        parent: Option<u32>,
        kind: Kind,
    }

    #[derive(Serialize)]
    enum Kind {
        Plain,
        Sized(u32),
        Pair(u8, u8),
        Shape { w: u8, h: u8 },
    }

    #[test]
    fn structs() {
        let doc = Doc {
            name: "a".into(),
            tags: vec!["x", "y"],
            parent: None,
            kind: Kind::Plain,
        };
        let buf = encode(&doc);
        let s = Slice::new(&buf);
        assert!(s.is_object());
        assert_eq!(s.length().unwrap(), 4);
        assert_eq!(s.get("name").unwrap().unwrap().as_str().unwrap(), "a");
        assert!(s.get("parent").unwrap().unwrap().is_null());
        assert_eq!(s.get("kind").unwrap().unwrap().as_str().unwrap(), "Plain");
        let tags = s.get("tags").unwrap().unwrap();
        assert_eq!(tags.at(1).unwrap().as_str().unwrap(), "y");

        let buf = encode_skipping_nulls(&doc);
        let s = Slice::new(&buf);
        assert_eq!(s.length().unwrap(), 3);
        assert!(s.get("parent").unwrap().is_none());
    }

    #[test]
    fn variants() {
        let buf = encode(&Kind::Sized(12));
        let s = Slice::new(&buf);
        assert_eq!(s.get("Sized").unwrap().unwrap().as_i64().unwrap(), 12);

        let buf = encode(&Kind::Pair(1, 2));
        let s = Slice::new(&buf);
        let pair = s.get("Pair").unwrap().unwrap();
        assert_eq!(pair.length().unwrap(), 2);
        assert_eq!(pair.at(1).unwrap().as_i64().unwrap(), 2);

        let buf = encode(&Kind::Shape { w: 3, h: 4 });
        let s = Slice::new(&buf);
        assert_eq!(
            s.get_path(&["Shape", "h"]).unwrap().unwrap().as_i64().unwrap(),
            4
        );
    }

    #[test]
    fn maps() {
        let mut map = HashMap::new();
        map.insert(10u32, "ten");
        map.insert(2u32, "two");
        let buf = encode(&map);
        let s = Slice::new(&buf);
        assert_eq!(s.get("10").unwrap().unwrap().as_str().unwrap(), "ten");
        assert_eq!(s.get("2").unwrap().unwrap().as_str().unwrap(), "two");

        let mut map: BTreeMap<&str, Option<u8>> = BTreeMap::new();
        map.insert("a", Some(1));
        map.insert("b", None);
        let s_buf = encode_skipping_nulls(&map);
        assert_eq!(Slice::new(&s_buf).length().unwrap(), 1);

        let mut bad = BTreeMap::new();
        bad.insert(vec![1u8], 1u8);
        assert!(matches!(crate::to_vec(&bad), Err(Error::SerdeFail(_))));
    }

    #[test]
    fn sequences() {
        let buf = encode(&vec![1u8, 1, 1, 1, 1]);
        // Five 0x31 members, no table
        assert_eq!(buf, [0x02, 0x07, 0x31, 0x31, 0x31, 0x31, 0x31]);
        let buf = encode(&(1u8, "two", 3.0f64));
        let s = Slice::new(&buf);
        assert_eq!(s.length().unwrap(), 3);
        assert_eq!(s.at(1).unwrap().as_str().unwrap(), "two");
    }

    #[test]
    fn depth_limit() {
        let mut value = crate::Value::Null;
        for _ in 0..=crate::MAX_DEPTH {
            value = crate::Value::Array(vec![value]);
        }
        assert!(matches!(crate::to_vec(&value), Err(Error::ParseLimit(_))));
    }
}
