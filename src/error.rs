use std::fmt;

use serde::{de, ser};

use crate::marker::ValueType;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// `close` was called with no open array or object.
    #[error("no open array or object to close")]
    NeedOpenCompound,
    /// The finished buffer was requested while a compound was still open.
    #[error("builder still has {0} open compound value(s)")]
    UnclosedCompound(usize),
    /// A key was written outside of an object, or an object member was added without a key.
    #[error("need an open object with a pending key")]
    NeedOpenObject,
    /// A key was written while another key was still waiting for its value.
    #[error("a key was already written and is waiting for its value")]
    KeyAlreadyWritten,
    /// A number doesn't fit the type it was declared as.
    #[error("number {value} is out of range for {ty:?}")]
    NumberOutOfRange { ty: ValueType, value: i128 },
    /// The declared value type can't carry the supplied representation.
    #[error("value type {ty:?} can't be built from {repr}")]
    UnexpectedValueType { ty: ValueType, repr: &'static str },
    /// An object key was neither a string nor a translated integer.
    #[error("invalid object key: {0}")]
    KeyType(String),
    /// An integer object key was met without an attribute translator to resolve it.
    #[error("integer object key needs an attribute translator")]
    NeedAttributeTranslator,
    /// Array access past the last member.
    #[error("index {index} out of bounds for length {length}")]
    IndexOutOfBounds { index: usize, length: usize },
    /// An accessor was used on a value of a different type.
    #[error("expected {expected}, found {actual:?}")]
    ValueTypeMismatch {
        expected: &'static str,
        actual: ValueType,
    },
    /// Mappings were added to an attribute translator after it was sealed.
    #[error("attribute translator is sealed")]
    TranslatorSealed,
    /// The bytes don't form a valid VelocyPack value.
    #[error("Basic VelocyPack encoding failure: {0}")]
    BadEncode(String),
    /// Decoding hit a nesting or size limit.
    #[error("Hit parsing limit: {0}")]
    ParseLimit(String),
    /// Occurs when serde serialization or deserialization fails
    #[error("{0}")]
    SerdeFail(String),
}

impl Error {
    pub(crate) fn mismatch(expected: &'static str, actual: ValueType) -> Self {
        Error::ValueTypeMismatch { expected, actual }
    }

    pub(crate) fn truncated(what: &str) -> Self {
        Error::BadEncode(format!("buffer ends inside {}", what))
    }
}

impl ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::SerdeFail(msg.to_string())
    }
}

impl de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::SerdeFail(msg.to_string())
    }
}
