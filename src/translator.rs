//! Attribute name compression.
//!
//! Frequently used object keys can be stored as small integers instead of strings. An
//! [`AttributeTranslator`] holds the two-way mapping between names and codes, keeping both sides
//! pre-encoded so lookups hand back ready-to-use [`Slice`]s without allocating.

use std::collections::HashMap;

use tracing::debug;

use crate::builder::{encode_key_code, encode_string};
use crate::error::{Error, Result};
use crate::slice::Slice;

/// A two-way mapping between attribute names and integer codes.
///
/// Mappings can be added until [`seal`](AttributeTranslator::seal) is called; after that the
/// translator is read-only and can be shared between builders and slices.
#[derive(Clone, Debug, Default)]
pub struct AttributeTranslator {
    buf: Vec<u8>,
    // name -> position of the encoded code in `buf`
    by_name: HashMap<String, usize>,
    // code -> position of the encoded name in `buf`
    by_code: HashMap<u64, usize>,
    sealed: bool,
}

impl AttributeTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mapping used by ArangoDB for its system attributes, already sealed.
    pub fn arangodb() -> Self {
        let mut translator = Self::new();
        for (name, code) in [("_key", 1), ("_rev", 2), ("_id", 3), ("_from", 4), ("_to", 5)] {
            translator.insert(name, code);
        }
        translator.seal();
        translator
    }

    /// Add a mapping between `name` and `code`. Re-adding a name or code replaces its lookup.
    pub fn add(&mut self, name: &str, code: u64) -> Result<()> {
        if self.sealed {
            return Err(Error::TranslatorSealed);
        }
        self.insert(name, code);
        Ok(())
    }

    fn insert(&mut self, name: &str, code: u64) {
        let name_pos = self.buf.len();
        encode_string(&mut self.buf, name);
        let code_pos = self.buf.len();
        encode_key_code(&mut self.buf, code);
        self.by_name.insert(name.to_owned(), code_pos);
        self.by_code.insert(code, name_pos);
    }

    /// Stop accepting new mappings.
    pub fn seal(&mut self) {
        debug!(mappings = self.by_name.len(), "sealing attribute translator");
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Number of mappings.
    pub fn count(&self) -> usize {
        self.by_name.len()
    }

    /// The encoded integer key standing in for `name`, if there is one.
    pub fn translate_name(&self, name: &str) -> Option<Slice<'_>> {
        self.by_name
            .get(name)
            .map(|pos| Slice::new(&self.buf[*pos..]))
    }

    /// The encoded string key `code` stands for, if there is one.
    pub fn translate_code(&self, code: u64) -> Option<Slice<'_>> {
        self.by_code
            .get(&code)
            .map(|pos| Slice::new(&self.buf[*pos..]))
    }

    /// Convenience lookup of the code for `name`.
    pub fn code_of(&self, name: &str) -> Option<u64> {
        self.translate_name(name).and_then(|s| s.as_u64().ok())
    }
}
