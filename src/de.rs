//! Deserialization.
//!
//! Reads straight out of a [`Slice`] without copying: strings, binary blobs and object keys can be
//! borrowed for as long as the underlying buffer lives. Translated integer keys are resolved
//! through the slice's attribute translator, so a translator used for deserialization must live as
//! long as the buffer.
//!
//! Integer values are range checked against the requested Rust type. Floating point targets accept
//! integers as well as doubles.

use serde::de::value::BorrowedStrDeserializer;
use serde::de::Error as DeError;
use serde::de::*;

use crate::date::DATE_TOKEN;
use crate::depth_tracking::DepthTracker;
use crate::error::{Error, Result};
use crate::marker::ValueType;
use crate::slice::{Iter, ObjectIter, Slice};

/// Decode a value of type `T` from an encoded slice.
pub(crate) fn from_slice<'de, T: Deserialize<'de>>(slice: Slice<'de>) -> Result<T> {
    let mut depth = DepthTracker::new();
    T::deserialize(SliceDeserializer::new(slice, &mut depth))
}

struct SliceDeserializer<'a, 'de> {
    slice: Slice<'de>,
    depth: &'a mut DepthTracker,
}

impl<'a, 'de> SliceDeserializer<'a, 'de> {
    fn new(slice: Slice<'de>, depth: &'a mut DepthTracker) -> Self {
        Self { slice, depth }
    }

    fn integer(&self) -> Result<i128> {
        self.slice.as_big_integer()
    }

    fn float(&self) -> Result<f64> {
        match self.slice.value_type() {
            ValueType::Double => self.slice.as_f64(),
            ValueType::Int | ValueType::UInt | ValueType::SmallInt => {
                Ok(self.slice.as_big_integer()? as f64)
            }
            ty => Err(Error::mismatch("Double", ty)),
        }
    }

    fn visit_date<V: Visitor<'de>>(&self, visitor: V) -> Result<V::Value> {
        let millis = self.slice.as_date()?.millis();
        visitor.visit_newtype_struct(IntoDeserializer::<'de, Error>::into_deserializer(millis))
    }

    fn visit_array<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.depth.enter()?;
        let value = {
            let mut access = ArrayAccess {
                iter: self.slice.iter()?,
                depth: &mut *self.depth,
            };
            let value = visitor.visit_seq(&mut access)?;
            access.finish()?;
            value
        };
        self.depth.leave();
        Ok(value)
    }

    fn visit_object<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.depth.enter()?;
        let value = {
            let mut access = ObjectAccess {
                entries: self.slice.entries()?,
                value: None,
                depth: &mut *self.depth,
            };
            visitor.visit_map(&mut access)?
        };
        self.depth.leave();
        Ok(value)
    }
}

macro_rules! deserialize_integer {
    ($method:ident, $ty:ty, $visit:ident) => {
        fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
            let v = self.integer()?;
            let v = <$ty>::try_from(v).map_err(|_| Error::NumberOutOfRange {
                ty: self.slice.value_type(),
                value: v,
            })?;
            visitor.$visit(v)
        }
    };
}

impl<'a, 'de> Deserializer<'de> for SliceDeserializer<'a, 'de> {
    type Error = Error;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.slice.value_type() {
            ValueType::Null => visitor.visit_unit(),
            ValueType::Bool => visitor.visit_bool(self.slice.as_bool()?),
            ValueType::Double => visitor.visit_f64(self.slice.as_f64()?),
            ValueType::UtcDate => self.visit_date(visitor),
            ValueType::Int | ValueType::SmallInt => visitor.visit_i64(self.slice.as_i64()?),
            ValueType::UInt => visitor.visit_u64(self.slice.as_u64()?),
            ValueType::String => visitor.visit_borrowed_str(self.slice.as_str()?),
            ValueType::Binary => visitor.visit_borrowed_bytes(self.slice.as_binary()?),
            ValueType::Array => self.visit_array(visitor),
            ValueType::Object => self.visit_object(visitor),
            ty => Err(Error::mismatch("a value with a serde mapping", ty)),
        }
    }

    deserialize_integer!(deserialize_i8, i8, visit_i8);
    deserialize_integer!(deserialize_i16, i16, visit_i16);
    deserialize_integer!(deserialize_i32, i32, visit_i32);
    deserialize_integer!(deserialize_i64, i64, visit_i64);
    deserialize_integer!(deserialize_i128, i128, visit_i128);
    deserialize_integer!(deserialize_u8, u8, visit_u8);
    deserialize_integer!(deserialize_u16, u16, visit_u16);
    deserialize_integer!(deserialize_u32, u32, visit_u32);
    deserialize_integer!(deserialize_u64, u64, visit_u64);
    deserialize_integer!(deserialize_u128, u128, visit_u128);

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f32(self.float()? as f32)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f64(self.float()?)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if self.slice.is_null() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if self.slice.is_null() {
            visitor.visit_unit()
        } else {
            Err(Error::mismatch("Null", self.slice.value_type()))
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        if name == DATE_TOKEN {
            self.visit_date(visitor)
        } else {
            visitor.visit_newtype_struct(self)
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self.slice.value_type() {
            ValueType::String => visitor.visit_enum(VariantDeserializer {
                name: self.slice.as_str()?,
                value: None,
                depth: self.depth,
            }),
            ValueType::Object if self.slice.length()? == 1 => {
                let name = self.slice.key_at(0)?.key_name()?;
                let value = self.slice.value_at(0)?;
                visitor.visit_enum(VariantDeserializer {
                    name,
                    value: Some(value),
                    depth: self.depth,
                })
            }
            _ => Err(Error::SerdeFail(
                "expected a size-1 object or a string".to_string(),
            )),
        }
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        // The slice already knows its extent, so there is nothing to walk
        visitor.visit_unit()
    }

    serde::forward_to_deserialize_any! {
        bool char str string bytes byte_buf seq tuple
        tuple_struct map struct identifier
    }
}

struct ArrayAccess<'a, 'de> {
    iter: Iter<'de>,
    depth: &'a mut DepthTracker,
}

impl<'a, 'de> ArrayAccess<'a, 'de> {
    /// Fail if the visitor stopped before the end of the array.
    fn finish(&mut self) -> Result<()> {
        match self.iter.size_hint() {
            (_, Some(0)) => Ok(()),
            (_, Some(left)) => Err(Error::invalid_length(
                left,
                &"no elements left over in the array",
            )),
            (_, None) => Ok(()),
        }
    }
}

impl<'a, 'de> SeqAccess<'de> for ArrayAccess<'a, 'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(member) => {
                let member = member?;
                seed.deserialize(SliceDeserializer::new(member, &mut *self.depth))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        self.iter.size_hint().1
    }
}

struct ObjectAccess<'a, 'de> {
    entries: ObjectIter<'de>,
    value: Option<Slice<'de>>,
    depth: &'a mut DepthTracker,
}

impl<'a, 'de> MapAccess<'de> for ObjectAccess<'a, 'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        match self.entries.next() {
            Some(entry) => {
                let (name, value) = entry?;
                self.value = Some(value);
                seed.deserialize(KeyDeserializer { name }).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        let value = self
            .value
            .take()
            .ok_or_else(|| Error::SerdeFail("object value requested before its key".to_string()))?;
        seed.deserialize(SliceDeserializer::new(value, &mut *self.depth))
    }

    fn size_hint(&self) -> Option<usize> {
        self.entries.size_hint().1
    }
}

/// Object keys. Always strings on the wire (after translation), but integer map keys are parsed
/// back out of their decimal form.
struct KeyDeserializer<'de> {
    name: &'de str,
}

macro_rules! deserialize_key_integer {
    ($method:ident, $visit:ident) => {
        fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
            let v = self.name.parse().map_err(|_| {
                Error::KeyType(format!("expected an integer key, got {:?}", self.name))
            })?;
            visitor.$visit(v)
        }
    };
}

impl<'de> Deserializer<'de> for KeyDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_borrowed_str(self.name)
    }

    deserialize_key_integer!(deserialize_i8, visit_i8);
    deserialize_key_integer!(deserialize_i16, visit_i16);
    deserialize_key_integer!(deserialize_i32, visit_i32);
    deserialize_key_integer!(deserialize_i64, visit_i64);
    deserialize_key_integer!(deserialize_u8, visit_u8);
    deserialize_key_integer!(deserialize_u16, visit_u16);
    deserialize_key_integer!(deserialize_u32, visit_u32);
    deserialize_key_integer!(deserialize_u64, visit_u64);

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_enum(BorrowedStrDeserializer::<Error>::new(self.name))
    }

    serde::forward_to_deserialize_any! {
        bool i128 u128 f32 f64 char str string bytes byte_buf option
        unit unit_struct seq tuple tuple_struct map struct identifier ignored_any
    }
}

/// An enum variant: either a bare string (unit variant) or a single-member object holding the
/// variant's content.
struct VariantDeserializer<'a, 'de> {
    name: &'de str,
    value: Option<Slice<'de>>,
    depth: &'a mut DepthTracker,
}

impl<'a, 'de> EnumAccess<'de> for VariantDeserializer<'a, 'de> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: DeserializeSeed<'de>,
    {
        let val = seed.deserialize(BorrowedStrDeserializer::<Error>::new(self.name))?;
        Ok((val, self))
    }
}

impl<'a, 'de> VariantAccess<'de> for VariantDeserializer<'a, 'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            None => Ok(()),
            Some(v) if v.is_null() => Ok(()),
            Some(_) => Err(Error::SerdeFail(
                "invalid type: non-unit variant, expected unit variant".to_string(),
            )),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        match self.value {
            Some(v) => seed.deserialize(SliceDeserializer::new(v, self.depth)),
            None => Err(Error::SerdeFail(
                "invalid type: unit variant, expected newtype variant".to_string(),
            )),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(v) if v.is_array() => SliceDeserializer::new(v, self.depth).visit_array(visitor),
            Some(v) => Err(Error::mismatch("Array", v.value_type())),
            None => Err(Error::SerdeFail(
                "invalid type: unit variant, expected tuple variant".to_string(),
            )),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(v) if v.is_object() => {
                SliceDeserializer::new(v, self.depth).visit_object(visitor)
            }
            Some(v) => Err(Error::mismatch("Object", v.value_type())),
            None => Err(Error::SerdeFail(
                "invalid type: unit variant, expected struct variant".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AttributeTranslator, Builder, Item, UtcDate};
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;

    fn decode<'de, T: Deserialize<'de>>(buf: &'de [u8]) -> Result<T> {
        from_slice(Slice::new(buf))
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Doc<'a> {
        name: &'a str,
        count: u16,
        ratio: f64,
        parent: Option<i64>,
        #[serde(with = "serde_bytes")]
        blob: Vec<u8>,
        tags: Vec<String>,
        kind: Kind,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    enum Kind {
        Plain,
        Sized(u32),
        Pair(u8, u8),
        Shape { w: u8, h: u8 },
    }

    #[test]
    fn structs() {
        let doc = Doc {
            name: "first",
            count: 300,
            ratio: 0.25,
            parent: None,
            blob: vec![1, 2, 3],
            tags: vec!["x".into(), "y".into()],
            kind: Kind::Plain,
        };
        let buf = crate::to_vec(&doc).unwrap();
        let back: Doc = decode(&buf).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn variants() {
        for kind in [
            Kind::Plain,
            Kind::Sized(70_000),
            Kind::Pair(1, 2),
            Kind::Shape { w: 3, h: 4 },
        ] {
            let buf = crate::to_vec(&kind).unwrap();
            let back: Kind = decode(&buf).unwrap();
            assert_eq!(back, kind);
        }
        // Neither a string nor a single-member object
        let buf = crate::to_vec(&[1u8, 2]).unwrap();
        assert!(decode::<Kind>(&buf).is_err());
    }

    #[test]
    fn integers() {
        let buf = crate::to_vec(&300u64).unwrap();
        assert_eq!(decode::<u16>(&buf).unwrap(), 300);
        assert_eq!(decode::<i64>(&buf).unwrap(), 300);
        assert!(matches!(
            decode::<u8>(&buf),
            Err(Error::NumberOutOfRange { value: 300, .. })
        ));
        let buf = crate::to_vec(&-3i64).unwrap();
        assert_eq!(decode::<i8>(&buf).unwrap(), -3);
        assert!(decode::<u32>(&buf).is_err());
        let buf = crate::to_vec(&u64::MAX).unwrap();
        assert_eq!(decode::<u64>(&buf).unwrap(), u64::MAX);
        assert!(decode::<i64>(&buf).is_err());
        // Floats take integers too
        let buf = crate::to_vec(&7u8).unwrap();
        assert_eq!(decode::<f64>(&buf).unwrap(), 7.0);
        let buf = crate::to_vec("7").unwrap();
        assert!(matches!(
            decode::<f64>(&buf),
            Err(Error::ValueTypeMismatch { .. })
        ));
    }

    #[test]
    fn dates() {
        let date = UtcDate::from_millis(1_600_000_000_000);
        let buf = crate::to_vec(&date).unwrap();
        assert_eq!(decode::<UtcDate>(&buf).unwrap(), date);
        let buf = crate::to_vec(&5i64).unwrap();
        assert!(decode::<UtcDate>(&buf).is_err());
    }

    #[test]
    fn maps() {
        let mut map = HashMap::new();
        map.insert(12u32, "twelve".to_string());
        map.insert(3u32, "three".to_string());
        let buf = crate::to_vec(&map).unwrap();
        let back: HashMap<u32, String> = decode(&buf).unwrap();
        assert_eq!(back, map);

        let mut map = HashMap::new();
        map.insert("not a number", 1u8);
        let buf = crate::to_vec(&map).unwrap();
        assert!(matches!(
            decode::<HashMap<u32, u8>>(&buf),
            Err(Error::KeyType(_))
        ));
    }

    #[test]
    fn tuples() {
        let buf = crate::to_vec(&(1u8, "a", true)).unwrap();
        let back: (u8, &str, bool) = decode(&buf).unwrap();
        assert_eq!(back, (1, "a", true));
        // Leftover members are an error for fixed-size targets
        assert!(decode::<(u8, &str)>(&buf).is_err());
    }

    #[test]
    fn translated_keys() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Entry<'a> {
            _key: &'a str,
            n: i64,
        }

        let mut translator = AttributeTranslator::new();
        translator.add("_key", 1).unwrap();
        translator.seal();

        let mut builder = Builder::with_translator(&translator);
        builder.add(Item::object()).unwrap();
        builder.add_entry("_key", Item::Str("k1")).unwrap();
        builder.add_entry("n", Item::Long(5)).unwrap();
        builder.close().unwrap();
        let buf = builder.into_vec().unwrap();

        let entry: Entry = from_slice(Slice::with_translator(&buf, &translator)).unwrap();
        assert_eq!(entry, Entry { _key: "k1", n: 5 });
        assert!(matches!(
            decode::<Entry>(&buf),
            Err(Error::NeedAttributeTranslator)
        ));
    }

    #[test]
    fn ignored_fields() {
        #[derive(Deserialize)]
        struct Small {
            b: u8,
        }
        let mut builder = Builder::new();
        builder.add(Item::object()).unwrap();
        builder.add_entry("a", Item::array()).unwrap();
        builder.add(Item::Long(1)).unwrap();
        builder.close().unwrap();
        builder.add_entry("b", Item::Long(2)).unwrap();
        builder.close().unwrap();
        let buf = builder.into_vec().unwrap();
        let small: Small = decode(&buf).unwrap();
        assert_eq!(small.b, 2);
    }

    #[test]
    fn unsupported_types() {
        assert!(decode::<crate::Value>(&[0x1e]).is_err());
        assert!(decode::<crate::Value>(&[0x17]).is_err());
        assert!(decode::<()>(&[0x18]).is_ok());
        assert!(decode::<()>(&[0x19]).is_err());
    }

    #[test]
    fn depth_limit() {
        let mut buf = vec![0x18];
        for _ in 0..=crate::MAX_DEPTH {
            let mut builder = Builder::new();
            builder.add(Item::array()).unwrap();
            builder.add_slice(Slice::new(&buf)).unwrap();
            builder.close().unwrap();
            buf = builder.into_vec().unwrap();
        }
        assert!(matches!(
            decode::<crate::Value>(&buf),
            Err(Error::ParseLimit(_))
        ));
    }
}
