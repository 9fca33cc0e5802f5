//! A Rust implementation of VelocyPack, the compact, self-describing binary format used by
//! ArangoDB.
//!
//! Every encoded value starts with a single head byte that names its type and, for most types,
//! how its length is stored. Values can be inspected in place without any parsing step:
//!
//! - [`Builder`] writes values, choosing the most compact layout for each array and object as it
//!   is closed.
//! - [`Slice`] is a read-only view over encoded bytes. Arrays are indexed in constant time,
//!   sorted objects are searched by binary search, and nothing is copied.
//! - [`AttributeTranslator`] maps frequently used attribute names to small integer codes, so
//!   object keys like `_key` take a single byte.
//! - [`Value`] is an owned tree of decoded values.
//! - [`VPack`], [`to_vec`] and [`from_slice`] connect the format to serde.
//!
//! ```
//! # use velocypack::{Builder, Item, Slice};
//! let mut builder = Builder::new();
//! builder.add(Item::array())?;
//! builder.add(Item::Long(1))?;
//! builder.add(Item::Long(2))?;
//! builder.add(Item::Long(3))?;
//! builder.close()?;
//! let encoded = builder.into_vec()?;
//! assert_eq!(encoded, [0x02, 0x05, 0x31, 0x32, 0x33]);
//!
//! let slice = Slice::new(&encoded);
//! assert_eq!(slice.length()?, 3);
//! assert_eq!(slice.at(2)?.as_i64()?, 3);
//! # Ok::<(), velocypack::Error>(())
//! ```
//!
//! Reading never panics: a truncated or inconsistent buffer produces [`Error::BadEncode`].

mod builder;
mod date;
mod de;
mod depth_tracking;
mod error;
mod integer;
mod json;
mod marker;
mod ser;
mod slice;
mod translator;
mod value;
mod varint;
mod vpack;

pub use builder::{Builder, BuilderOptions, Item, Key};
pub use date::UtcDate;
pub use error::{Error, Result};
pub use marker::ValueType;
pub use slice::{Iter, ObjectIter, Slice};
pub use translator::AttributeTranslator;
pub use value::Value;
pub use vpack::VPack;

/// Maximum nesting depth of arrays and objects when decoding or serializing.
pub const MAX_DEPTH: usize = 100;

/// Sorted objects with at least this many members are searched with binary search instead of a
/// linear scan.
pub const BINARY_SEARCH_THRESHOLD: usize = 4;

/// Serialize a value with the default configuration: nulls are kept, arrays and objects are
/// indexed, and no attribute translation happens.
pub fn to_vec<T: serde::Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    VPack::new().serialize(value)
}

/// Deserialize a value from a slice. Integer keys are resolved with the slice's translator, if
/// it has one.
pub fn from_slice<'de, T: serde::Deserialize<'de>>(slice: Slice<'de>) -> Result<T> {
    de::from_slice(slice)
}
