//! Configured serde entry points.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builder::{Builder, BuilderOptions, Item};
use crate::error::{Error, Result};
use crate::ser::VPackSerializer;
use crate::slice::Slice;
use crate::translator::AttributeTranslator;
use crate::value::Value;

/// Serializes and deserializes Rust values with a fixed configuration.
///
/// ```
/// # use std::sync::Arc;
/// # use velocypack::{AttributeTranslator, VPack};
/// #[derive(serde::Serialize, serde::Deserialize)]
/// struct Doc {
///     _key: String,
///     size: Option<u32>,
/// }
///
/// let vpack = VPack::new()
///     .serialize_nulls(false)
///     .translator(Arc::new(AttributeTranslator::arangodb()));
/// let encoded = vpack.serialize(&Doc { _key: "a".into(), size: None })?;
/// let doc: Doc = vpack.deserialize(&encoded)?;
/// assert_eq!(doc._key, "a");
/// assert!(doc.size.is_none());
/// # Ok::<(), velocypack::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct VPack {
    serialize_nulls: bool,
    translator: Option<Arc<AttributeTranslator>>,
    options: BuilderOptions,
}

impl Default for VPack {
    fn default() -> Self {
        Self {
            serialize_nulls: true,
            translator: None,
            options: BuilderOptions::default(),
        }
    }
}

impl VPack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether struct fields and map entries holding null are written at all. Defaults to true.
    pub fn serialize_nulls(mut self, serialize_nulls: bool) -> Self {
        self.serialize_nulls = serialize_nulls;
        self
    }

    /// Translate known attribute names to integer codes when writing, and back when reading.
    pub fn translator(mut self, translator: Arc<AttributeTranslator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn builder_options(mut self, options: BuilderOptions) -> Self {
        self.options = options;
        self
    }

    /// A fresh builder using this configuration's options and translator.
    pub fn builder(&self) -> Builder<'_> {
        Builder::from_parts(self.options, self.translator.as_deref())
    }

    /// View encoded bytes, resolving translated keys with this configuration's translator.
    pub fn slice<'a>(&'a self, data: &'a [u8]) -> Slice<'a> {
        Slice::new(data).or_translator(self.translator.as_deref())
    }

    pub fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        let mut se = VPackSerializer::new(self.builder(), self.serialize_nulls);
        value.serialize(&mut se)?;
        se.into_builder().into_vec()
    }

    /// Serialize `value`, which must come out as an object, and add `fields` as extra members.
    /// Members of `value` win over fields with the same key.
    pub fn serialize_with_fields<T: Serialize + ?Sized>(
        &self,
        value: &T,
        fields: &BTreeMap<String, Value>,
    ) -> Result<Vec<u8>> {
        let encoded = self.serialize(value)?;
        let root = self.slice(&encoded);
        if !root.is_object() {
            return Err(Error::mismatch("Object", root.value_type()));
        }

        let mut builder = self.builder();
        builder.add(Item::object())?;
        for entry in root.entries()? {
            let (key, member) = entry?;
            builder.add_key(key)?;
            builder.add_slice(member)?;
        }
        for (key, field) in fields {
            if root.has_key(key)? {
                debug!(key = key.as_str(), "additional field shadowed by a serialized member");
                continue;
            }
            if field.is_null() && !self.serialize_nulls {
                continue;
            }
            builder.add_key(key)?;
            field.build(&mut builder)?;
        }
        builder.close()?;
        builder.into_vec()
    }

    /// Decode a value from `data`. Strings and byte arrays may borrow from it.
    pub fn deserialize<'de, T: Deserialize<'de>>(&'de self, data: &'de [u8]) -> Result<T> {
        crate::de::from_slice(self.slice(data))
    }

    /// Decode a value from an existing slice. The slice's own translator takes precedence over
    /// this configuration's.
    pub fn deserialize_slice<'de, T: Deserialize<'de>>(&'de self, slice: Slice<'de>) -> Result<T> {
        crate::de::from_slice(slice.or_translator(self.translator.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Doc {
        _key: String,
        _rev: Option<String>,
        count: u32,
    }

    fn doc() -> Doc {
        Doc {
            _key: "k".into(),
            _rev: None,
            count: 12,
        }
    }

    #[test]
    fn defaults() {
        let vpack = VPack::new();
        let encoded = vpack.serialize(&doc()).unwrap();
        let root = vpack.slice(&encoded);
        assert!(root.get("_rev").unwrap().unwrap().is_null());
        assert_eq!(vpack.deserialize::<Doc>(&encoded).unwrap(), doc());
        assert_eq!(encoded, crate::to_vec(&doc()).unwrap());
    }

    #[test]
    fn skip_nulls() {
        let vpack = VPack::new().serialize_nulls(false);
        let encoded = vpack.serialize(&doc()).unwrap();
        let root = vpack.slice(&encoded);
        assert_eq!(root.length().unwrap(), 2);
        assert!(!root.has_key("_rev").unwrap());
        assert_eq!(vpack.deserialize::<Doc>(&encoded).unwrap(), doc());
    }

    #[test]
    fn translated() {
        let vpack = VPack::new().translator(Arc::new(AttributeTranslator::arangodb()));
        let encoded = vpack.serialize(&doc()).unwrap();
        // "_key" is written as its code
        assert!(encoded.windows(3).any(|w| w == [0x31, 0x41, b'k']));
        assert_eq!(vpack.deserialize::<Doc>(&encoded).unwrap(), doc());
        assert_eq!(
            vpack.deserialize_slice::<Doc>(Slice::new(&encoded)).unwrap(),
            doc()
        );
        assert!(matches!(
            VPack::new().deserialize::<Doc>(&encoded),
            Err(Error::NeedAttributeTranslator)
        ));
    }

    #[test]
    fn unindexed() {
        let vpack = VPack::new().builder_options(
            BuilderOptions::new()
                .unindexed_arrays(true)
                .unindexed_objects(true),
        );
        let encoded = vpack.serialize(&doc()).unwrap();
        assert_eq!(encoded[0], 0x14);
        let nested = vpack.serialize(&vec![vec![1u8, 200], vec![3]]).unwrap();
        assert_eq!(nested[0], 0x13);
        assert_eq!(
            vpack.deserialize::<Vec<Vec<u8>>>(&nested).unwrap(),
            vec![vec![1, 200], vec![3]]
        );
    }

    #[test]
    fn additional_fields() {
        let vpack = VPack::new().serialize_nulls(false);
        let mut fields = BTreeMap::new();
        fields.insert("_key".to_string(), Value::from("ignored"));
        fields.insert("extra".to_string(), Value::from(5u8));
        fields.insert("gone".to_string(), Value::Null);
        let encoded = vpack.serialize_with_fields(&doc(), &fields).unwrap();
        let root = vpack.slice(&encoded);
        assert_eq!(root.length().unwrap(), 3);
        assert_eq!(root.get("_key").unwrap().unwrap().as_str().unwrap(), "k");
        assert_eq!(root.get("extra").unwrap().unwrap().as_i64().unwrap(), 5);
        assert!(!root.has_key("gone").unwrap());

        assert!(matches!(
            vpack.serialize_with_fields(&[1u8], &fields),
            Err(Error::ValueTypeMismatch { .. })
        ));
    }
}
