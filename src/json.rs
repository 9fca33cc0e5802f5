//! JSON text rendering of slices.
//!
//! Mostly meant for debugging and logging. Types that JSON can't express are mapped as follows:
//!
//! - Binary - base64 string (standard alphabet, padded)
//! - UtcDate - integer milliseconds since the epoch
//! - MinKey/MaxKey - the strings `"MinKey"` and `"MaxKey"`
//! - NaN and infinite doubles - `null`
//! - None, Illegal, External, BCD, Custom - `null`

use std::fmt::{self, Write};

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::depth_tracking::DepthTracker;
use crate::error::Result;
use crate::marker::ValueType;
use crate::slice::Slice;

impl<'a> Slice<'a> {
    /// Render the slice as JSON text. Fails if the encoding is malformed or nested too deeply.
    pub fn to_json(&self) -> Result<String> {
        let mut out = String::new();
        let mut depth = DepthTracker::new();
        write_value(&mut out, *self, &mut depth)?;
        Ok(out)
    }
}

impl<'a> fmt::Display for Slice<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_json() {
            Ok(s) => f.write_str(&s),
            Err(e) => write!(f, "<invalid: {}>", e),
        }
    }
}

fn write_value(out: &mut String, slice: Slice<'_>, depth: &mut DepthTracker) -> Result<()> {
    match slice.value_type() {
        ValueType::Null => out.push_str("null"),
        ValueType::Bool => out.push_str(if slice.as_bool()? { "true" } else { "false" }),
        ValueType::Double => {
            let v = slice.as_f64()?;
            if v.is_finite() {
                // Writing to a String can't fail
                let _ = write!(out, "{}", v);
            } else {
                out.push_str("null");
            }
        }
        ValueType::UtcDate => {
            let _ = write!(out, "{}", slice.as_date()?.millis());
        }
        ValueType::Int | ValueType::SmallInt | ValueType::UInt => {
            let _ = write!(out, "{}", slice.as_big_integer()?);
        }
        ValueType::String => write_string(out, slice.as_str()?),
        ValueType::Binary => {
            out.push('"');
            out.push_str(&STANDARD.encode(slice.as_binary()?));
            out.push('"');
        }
        ValueType::MinKey => out.push_str("\"MinKey\""),
        ValueType::MaxKey => out.push_str("\"MaxKey\""),
        ValueType::Array => {
            depth.enter()?;
            out.push('[');
            for (i, member) in slice.iter()?.enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, member?, depth)?;
            }
            out.push(']');
            depth.leave();
        }
        ValueType::Object => {
            depth.enter()?;
            out.push('{');
            for (i, entry) in slice.entries()?.enumerate() {
                let (key, value) = entry?;
                if i > 0 {
                    out.push(',');
                }
                write_string(out, key);
                out.push(':');
                write_value(out, value, depth)?;
            }
            out.push('}');
            depth.leave();
        }
        ValueType::None
        | ValueType::Illegal
        | ValueType::External
        | ValueType::BCD
        | ValueType::Custom => out.push_str("null"),
    }
    Ok(())
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Builder, Item};

    fn render(build: impl FnOnce(&mut Builder<'_>)) -> String {
        let mut builder = Builder::new();
        build(&mut builder);
        let buf = builder.into_vec().unwrap();
        Slice::new(&buf).to_string()
    }

    #[test]
    fn scalars() {
        assert_eq!(render(|b| b.add(Item::Null).unwrap()), "null");
        assert_eq!(render(|b| b.add(Item::Bool(true)).unwrap()), "true");
        assert_eq!(render(|b| b.add(Item::Long(-1234)).unwrap()), "-1234");
        assert_eq!(render(|b| b.add(Item::UInt(u64::MAX)).unwrap()), u64::MAX.to_string());
        assert_eq!(render(|b| b.add(Item::Double(2.5)).unwrap()), "2.5");
        assert_eq!(render(|b| b.add(Item::Double(f64::NAN)).unwrap()), "null");
        assert_eq!(render(|b| b.add(Item::UtcDate(86_400_000)).unwrap()), "86400000");
        assert_eq!(render(|b| b.add(Item::Binary(b"hi!")).unwrap()), "\"aGkh\"");
        assert_eq!(render(|b| b.add(Item::MinKey).unwrap()), "\"MinKey\"");
    }

    #[test]
    fn escapes() {
        let s = render(|b| b.add(Item::Str("a\"b\\c\nd\u{01}é")).unwrap());
        assert_eq!(s, "\"a\\\"b\\\\c\\nd\\u0001é\"");
    }

    #[test]
    fn compounds() {
        let s = render(|b| {
            b.add(Item::object()).unwrap();
            b.add_entry("b", Item::array()).unwrap();
            b.add(Item::Long(1)).unwrap();
            b.add(Item::Str("x")).unwrap();
            b.close().unwrap();
            b.add_entry("a", Item::object()).unwrap();
            b.close().unwrap();
            b.close().unwrap();
        });
        // Members come out in storage order, which is the order they were written in
        assert_eq!(s, "{\"b\":[1,\"x\"],\"a\":{}}");
    }

    #[test]
    fn malformed() {
        // Array claiming 5 bytes with only 3 present
        let s = Slice::new(&[0x02, 0x05, 0x31]).to_string();
        assert!(s.starts_with("<invalid"));
        assert!(Slice::new(&[0x02, 0x05, 0x31]).to_json().is_err());
    }
}
