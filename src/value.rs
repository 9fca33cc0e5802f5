use std::borrow::Cow;
use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::ops::Index;

use crate::builder::{Builder, Item};
use crate::date::UtcDate;
use crate::depth_tracking::DepthTracker;
use crate::error::{Error, Result};
use crate::marker::ValueType;
use crate::slice::Slice;

/// An owned, fully decoded VelocyPack value.
///
/// Integers that fit in an `i64` are always held as [`Value::Int`]; [`Value::UInt`] is only used
/// for values above `i64::MAX`.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Double(f64),
    UtcDate(UtcDate),
    Str(String),
    Binary(Vec<u8>),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Decode a slice and everything nested in it.
    ///
    /// Fails on types without an owned representation: `None`, `Illegal`, `External`, `MinKey`,
    /// `MaxKey`, `BCD` and `Custom`.
    pub fn from_slice(slice: Slice<'_>) -> Result<Value> {
        let mut depth = DepthTracker::new();
        Self::decode(slice, &mut depth)
    }

    fn decode(slice: Slice<'_>, depth: &mut DepthTracker) -> Result<Value> {
        let value = match slice.value_type() {
            ValueType::Null => Value::Null,
            ValueType::Bool => Value::Bool(slice.as_bool()?),
            ValueType::Double => Value::Double(slice.as_f64()?),
            ValueType::UtcDate => Value::UtcDate(slice.as_date()?),
            ValueType::Int | ValueType::SmallInt | ValueType::UInt => {
                let v = slice.as_big_integer()?;
                match i64::try_from(v) {
                    Ok(v) => Value::Int(v),
                    Err(_) => Value::UInt(v as u64),
                }
            }
            ValueType::String => Value::Str(slice.as_str()?.to_owned()),
            ValueType::Binary => Value::Binary(slice.as_binary()?.to_vec()),
            ValueType::Array => {
                depth.enter()?;
                let mut seq = Vec::with_capacity(slice.length()?.min(4096));
                for item in slice.iter()? {
                    seq.push(Self::decode(item?, depth)?);
                }
                depth.leave();
                Value::Array(seq)
            }
            ValueType::Object => {
                depth.enter()?;
                let mut map = BTreeMap::new();
                for entry in slice.entries()? {
                    let (key, val) = entry?;
                    map.insert(key.to_owned(), Self::decode(val, depth)?);
                }
                depth.leave();
                Value::Object(map)
            }
            ty => return Err(Error::mismatch("a value with an owned representation", ty)),
        };
        Ok(value)
    }

    /// Append this value to a builder.
    pub fn build(&self, builder: &mut Builder<'_>) -> Result<()> {
        match self {
            Value::Null => builder.add(Item::Null),
            Value::Bool(v) => builder.add(Item::Bool(*v)),
            Value::Int(v) => builder.add(Item::Long(*v)),
            Value::UInt(v) => builder.add(Item::UInt(*v)),
            Value::Double(v) => builder.add(Item::Double(*v)),
            Value::UtcDate(v) => builder.add(Item::UtcDate(v.millis())),
            Value::Str(v) => builder.add(Item::Str(v)),
            Value::Binary(v) => builder.add(Item::Binary(v)),
            Value::Array(v) => {
                builder.add(Item::array())?;
                for item in v {
                    item.build(builder)?;
                }
                builder.close()
            }
            Value::Object(v) => {
                builder.add(Item::object())?;
                for (key, val) in v {
                    builder.add_key(key)?;
                    val.build(builder)?;
                }
                builder.close()
            }
        }
    }

    /// Encode this value on its own.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        let mut builder = Builder::new();
        self.build(&mut builder)?;
        builder.into_vec()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Int(_) | Value::UInt(_))
    }

    pub fn is_double(&self) -> bool {
        matches!(self, Value::Double(_))
    }

    pub fn is_date(&self) -> bool {
        matches!(self, Value::UtcDate(_))
    }

    pub fn is_str(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Value::Binary(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Bool(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Int(v) => u64::try_from(*v).ok(),
            Value::UInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        if let Value::Double(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    pub fn as_date(&self) -> Option<UtcDate> {
        if let Value::UtcDate(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Value::Str(v) = self {
            Some(v.as_ref())
        } else {
            None
        }
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        if let Value::Binary(v) = self {
            Some(v.as_ref())
        } else {
            None
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        if let Value::Array(v) = self {
            Some(v.as_ref())
        } else {
            None
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        if let Value::Array(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        if let Value::Object(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut BTreeMap<String, Value>> {
        if let Value::Object(v) = self {
            Some(v)
        } else {
            None
        }
    }
}

impl std::default::Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

static NULL: Value = Value::Null;

impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Self::Output {
        self.as_array().and_then(|v| v.get(index)).unwrap_or(&NULL)
    }
}

impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, index: &str) -> &Self::Output {
        self.as_object().and_then(|v| v.get(index)).unwrap_or(&NULL)
    }
}

impl<'a> TryFrom<Slice<'a>> for Value {
    type Error = Error;

    fn try_from(slice: Slice<'a>) -> Result<Self> {
        Value::from_slice(slice)
    }
}

macro_rules! impl_value_from_signed {
    ($t: ty) => {
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(v as i64)
            }
        }
    };
}

macro_rules! impl_value_from_unsigned {
    ($t: ty) => {
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                let v = v as u64;
                match i64::try_from(v) {
                    Ok(v) => Value::Int(v),
                    Err(_) => Value::UInt(v),
                }
            }
        }
    };
}

macro_rules! impl_value_from {
    ($t: ty, $p: ident) => {
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::$p(v)
            }
        }
    };
}

impl_value_from!(bool, Bool);
impl_value_from!(f64, Double);
impl_value_from!(UtcDate, UtcDate);
impl_value_from!(String, Str);
impl_value_from!(Vec<u8>, Binary);
impl_value_from!(Vec<Value>, Array);
impl_value_from!(BTreeMap<String, Value>, Object);
impl_value_from_unsigned!(u8);
impl_value_from_unsigned!(u16);
impl_value_from_unsigned!(u32);
impl_value_from_unsigned!(u64);
impl_value_from_unsigned!(usize);
impl_value_from_signed!(i8);
impl_value_from_signed!(i16);
impl_value_from_signed!(i32);
impl_value_from_signed!(i64);
impl_value_from_signed!(isize);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Double(v as f64)
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Null
    }
}

impl<'a> From<&'a str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl<'a> From<Cow<'a, str>> for Value {
    fn from(v: Cow<'a, str>) -> Self {
        Value::Str(v.into_owned())
    }
}

impl<'a> From<&'a [u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Binary(v.into())
    }
}

impl<V: Into<Value>> std::iter::FromIterator<V> for Value {
    fn from_iter<T: IntoIterator<Item = V>>(iter: T) -> Self {
        let v: Vec<Value> = iter.into_iter().map(Into::into).collect();
        Value::Array(v)
    }
}

macro_rules! impl_try_from_value {
    ($t: ty, $p: ident) => {
        impl TryFrom<Value> for $t {
            type Error = Value;
            fn try_from(v: Value) -> Result<Self, Self::Error> {
                match v {
                    Value::$p(v) => Ok(v),
                    _ => Err(v),
                }
            }
        }
    };
}

macro_rules! impl_try_from_value_integer {
    ($t: ty) => {
        impl TryFrom<Value> for $t {
            type Error = Value;
            fn try_from(v: Value) -> Result<Self, Self::Error> {
                match v {
                    Value::Int(i) => TryFrom::try_from(i).map_err(|_| v),
                    Value::UInt(i) => TryFrom::try_from(i).map_err(|_| v),
                    _ => Err(v),
                }
            }
        }
    };
}

impl_try_from_value!(bool, Bool);
impl_try_from_value!(String, Str);
impl_try_from_value!(f64, Double);
impl_try_from_value!(UtcDate, UtcDate);
impl_try_from_value!(Vec<u8>, Binary);
impl_try_from_value!(Vec<Value>, Array);
impl_try_from_value!(BTreeMap<String, Value>, Object);
impl_try_from_value_integer!(u8);
impl_try_from_value_integer!(u16);
impl_try_from_value_integer!(u32);
impl_try_from_value_integer!(u64);
impl_try_from_value_integer!(usize);
impl_try_from_value_integer!(i8);
impl_try_from_value_integer!(i16);
impl_try_from_value_integer!(i32);
impl_try_from_value_integer!(i64);
impl_try_from_value_integer!(isize);

impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::UInt(v) => serializer.serialize_u64(*v),
            Value::Double(v) => serializer.serialize_f64(*v),
            Value::UtcDate(v) => v.serialize(serializer),
            Value::Str(v) => serializer.serialize_str(v),
            Value::Binary(v) => serializer.serialize_bytes(v),
            Value::Array(v) => v.serialize(serializer),
            Value::Object(v) => v.serialize(serializer),
        }
    }
}

impl<'de> serde::Deserialize<'de> for Value {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::*;
        use std::fmt;

        struct ValueVisitor;
        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
                fmt.write_str("any valid VelocyPack Value")
            }

            fn visit_bool<E: Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(v))
            }

            fn visit_i64<E: Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Value::Int(v))
            }

            fn visit_u64<E: Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Value::from(v))
            }

            fn visit_f64<E: Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(Value::Double(v))
            }

            fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(Value::Str(v.into()))
            }

            fn visit_string<E: Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(Value::Str(v))
            }

            fn visit_bytes<E: Error>(self, v: &[u8]) -> Result<Self::Value, E> {
                Ok(Value::Binary(v.into()))
            }

            fn visit_byte_buf<E: Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
                Ok(Value::Binary(v))
            }

            fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
                Value::deserialize(d)
            }

            /// Only called for dates: the VelocyPack deserializer hands them over as a newtype
            /// holding the milliseconds.
            fn visit_newtype_struct<D: Deserializer<'de>>(
                self,
                d: D,
            ) -> Result<Self::Value, D::Error> {
                i64::deserialize(d).map(|v| Value::UtcDate(UtcDate::from_millis(v)))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                // Allocate with the size hint, but be conservative. 4096 is what serde uses
                // internally for collections, so we'll do likewise.
                let mut seq = match access.size_hint() {
                    Some(size) => Vec::with_capacity(size.min(4096)),
                    None => Vec::new(),
                };
                while let Some(elem) = access.next_element()? {
                    seq.push(elem);
                }
                Ok(Value::Array(seq))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = BTreeMap::new();
                while let Some((key, val)) = access.next_entry()? {
                    map.insert(key, val);
                }
                Ok(Value::Object(map))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        let mut inner = BTreeMap::new();
        inner.insert("when".to_string(), Value::from(UtcDate::from_millis(-42)));
        inner.insert("blob".to_string(), Value::from(vec![0u8, 1, 255]));
        inner.insert("big".to_string(), Value::from(u64::MAX));
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), Value::from("velocy"));
        map.insert("count".to_string(), Value::from(-300i32));
        map.insert("ratio".to_string(), Value::from(0.25));
        map.insert("flag".to_string(), Value::from(true));
        map.insert("nothing".to_string(), Value::Null);
        map.insert("nested".to_string(), Value::Object(inner));
        map.insert(
            "list".to_string(),
            vec![1u8, 2, 3].into_iter().collect::<Value>(),
        );
        Value::Object(map)
    }

    #[test]
    fn build_and_decode() {
        let value = sample();
        let buf = value.to_vec().unwrap();
        let decoded = Value::from_slice(Slice::new(&buf)).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn serde_roundtrip() {
        let value = sample();
        let buf = crate::to_vec(&value).unwrap();
        assert_eq!(buf, value.to_vec().unwrap());
        let decoded: Value = crate::from_slice(Slice::new(&buf)).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn index() {
        let value = sample();
        assert_eq!(value["name"].as_str(), Some("velocy"));
        assert_eq!(value["list"][2].as_i64(), Some(3));
        assert_eq!(value["nested"]["big"].as_u64(), Some(u64::MAX));
        assert!(value["missing"][7].is_null());
    }

    #[test]
    fn integer_normalization() {
        assert_eq!(Value::from(5u64), Value::Int(5));
        assert_eq!(Value::from(u64::MAX), Value::UInt(u64::MAX));
        assert_eq!(u8::try_from(Value::Int(200)), Ok(200u8));
        assert!(i8::try_from(Value::Int(200)).is_err());
    }

    #[test]
    fn unsupported_types() {
        assert!(Value::from_slice(Slice::new(&[0x1e])).is_err());
        assert!(Value::from_slice(Slice::new(&[0x17])).is_err());
    }

    mod random {
        use super::*;
        use crate::BuilderOptions;
        use rand::rngs::StdRng;
        use rand::seq::SliceRandom;
        use rand::{Rng, SeedableRng};

        const CHARS: [char; 10] = ['a', 'q', 'Z', '3', ' ', '"', 'é', 'Ж', '猫', '🦀'];

        fn random_string(rng: &mut StdRng, max: usize) -> String {
            let len = rng.gen_range(0..=max);
            (0..len)
                .filter_map(|_| CHARS.choose(rng).copied())
                .collect()
        }

        fn random_value(rng: &mut StdRng, depth: usize) -> Value {
            let kinds = if depth == 0 { 8 } else { 10 };
            match rng.gen_range(0..kinds) {
                0 => Value::Null,
                1 => Value::Bool(rng.gen()),
                2 => match rng.gen_range(0..4) {
                    0 => Value::Int(rng.gen_range(-6..10)),
                    1 => Value::Int(rng.gen_range(-70_000..70_000)),
                    2 => Value::Int(rng.gen()),
                    _ => Value::UInt(rng.gen_range(i64::MAX as u64 + 1..=u64::MAX)),
                },
                3 => Value::Double(rng.gen_range(-1e9..1e9)),
                4 => Value::UtcDate(UtcDate::from_millis(rng.gen())),
                // Long enough to need the 0xbf head now and then
                5 | 6 => Value::Str(random_string(rng, 200)),
                7 => {
                    let len = rng.gen_range(0..300);
                    Value::Binary((0..len).map(|_| rng.gen()).collect())
                }
                8 => {
                    let len = rng.gen_range(0..12);
                    Value::Array((0..len).map(|_| random_value(rng, depth - 1)).collect())
                }
                _ => {
                    let len = rng.gen_range(0..12);
                    Value::Object(
                        (0..len)
                            .map(|_| (random_string(rng, 8), random_value(rng, depth - 1)))
                            .collect(),
                    )
                }
            }
        }

        fn build_with(value: &Value, options: BuilderOptions) -> Vec<u8> {
            let mut builder = Builder::new().options(options);
            value.build(&mut builder).unwrap();
            builder.into_vec().unwrap()
        }

        // Check every member is reachable through the lookup API and decodes to what was built.
        fn assert_reachable(slice: Slice<'_>, value: &Value) {
            assert_eq!(Value::from_slice(slice).unwrap(), *value);
            match value {
                Value::Array(items) => {
                    assert_eq!(slice.length().unwrap(), items.len());
                    for (i, item) in items.iter().enumerate() {
                        assert_reachable(slice.at(i).unwrap(), item);
                    }
                    assert!(slice.at(items.len()).is_err());
                }
                Value::Object(map) => {
                    assert_eq!(slice.length().unwrap(), map.len());
                    for (key, item) in map {
                        assert_reachable(slice.get(key).unwrap().unwrap(), item);
                    }
                    assert!(slice.get("no such key, ever").unwrap().is_none());
                }
                Value::Str(v) => assert_eq!(slice.length().unwrap(), v.len()),
                _ => (),
            }
        }

        fn assert_roundtrip(value: &Value) {
            let options = [
                BuilderOptions::new(),
                BuilderOptions::new().unindexed_arrays(true),
                BuilderOptions::new().unindexed_objects(true),
                BuilderOptions::new()
                    .unindexed_arrays(true)
                    .unindexed_objects(true),
            ];
            for options in options {
                let buf = build_with(value, options);
                let slice = Slice::new(&buf);
                assert_eq!(slice.byte_size().unwrap(), buf.len(), "{:?}", options);
                assert_reachable(slice, value);
            }
        }

        #[test]
        fn nested_trees() {
            let mut rng = StdRng::seed_from_u64(0x7670_6163_6b);
            for _ in 0..300 {
                let depth = rng.gen_range(1..5);
                assert_roundtrip(&random_value(&mut rng, depth));
            }
        }

        #[test]
        fn wide_offsets() {
            let mut rng = StdRng::seed_from_u64(0xfeed);
            for _ in 0..10 {
                let filler = random_value(&mut rng, 2);
                // Past 255 bytes, so the tables need 2-byte offsets
                let medium: Vec<Value> = (0..40)
                    .map(|i| Value::Str(format!("{:>8}{}", i, random_string(&mut rng, 20))))
                    .chain(std::iter::once(filler.clone()))
                    .collect();
                let medium = Value::Array(medium);
                let buf = build_with(&medium, BuilderOptions::new());
                assert!(Slice::new(&buf).byte_size().unwrap() > 0xff);
                assert_roundtrip(&medium);

                // Past 65535 bytes, so the tables need 4-byte offsets
                let mut map = BTreeMap::new();
                map.insert("big".to_string(), Value::Binary(vec![7; 70_000]));
                map.insert("filler".to_string(), filler);
                map.insert("medium".to_string(), medium);
                let large = Value::Object(map);
                let buf = build_with(&large, BuilderOptions::new());
                assert_eq!(buf[0], 0x0d);
                assert_roundtrip(&large);
            }
        }
    }

    #[test]
    fn depth_limit() {
        let mut builder = Builder::new();
        for _ in 0..=crate::MAX_DEPTH {
            builder.add(Item::array()).unwrap();
        }
        for _ in 0..=crate::MAX_DEPTH {
            builder.close().unwrap();
        }
        let buf = builder.into_vec().unwrap();
        assert!(matches!(
            Value::from_slice(Slice::new(&buf)),
            Err(Error::ParseLimit(_))
        ));
    }
}
