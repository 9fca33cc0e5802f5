use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::de::{Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};

/// Newtype struct name that marks a [`UtcDate`] passing through serde. The VelocyPack serializer
/// and deserializer recognize it and use the date head byte; every other format just sees an
/// `i64` of milliseconds.
pub(crate) const DATE_TOKEN: &str = "$velocypack::private::UtcDate";

/// A point in time, as milliseconds since the Unix epoch (UTC).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDate(i64);

impl UtcDate {
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub fn millis(&self) -> i64 {
        self.0
    }

    /// The current time. Clamps to the representable range.
    pub fn now() -> Self {
        Self::from(SystemTime::now())
    }

    pub fn min_value() -> Self {
        Self(i64::MIN)
    }

    pub fn max_value() -> Self {
        Self(i64::MAX)
    }
}

impl From<SystemTime> for UtcDate {
    fn from(t: SystemTime) -> Self {
        let millis = match t.duration_since(UNIX_EPOCH) {
            Ok(d) => i64::try_from(d.as_millis()).unwrap_or(i64::MAX),
            Err(e) => i64::try_from(e.duration().as_millis())
                .map(|m| -m)
                .unwrap_or(i64::MIN),
        };
        Self(millis)
    }
}

impl From<UtcDate> for SystemTime {
    fn from(d: UtcDate) -> Self {
        let offset = Duration::from_millis(d.0.unsigned_abs());
        if d.0 >= 0 {
            UNIX_EPOCH + offset
        } else {
            UNIX_EPOCH - offset
        }
    }
}

impl fmt::Display for UtcDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

impl Serialize for UtcDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(DATE_TOKEN, &self.0)
    }
}

impl<'de> Deserialize<'de> for UtcDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DateVisitor;

        impl<'de> Visitor<'de> for DateVisitor {
            type Value = UtcDate;

            fn expecting(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt.write_str("a UTC date in milliseconds")
            }

            fn visit_newtype_struct<D: Deserializer<'de>>(
                self,
                deserializer: D,
            ) -> Result<UtcDate, D::Error> {
                i64::deserialize(deserializer).map(UtcDate)
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<UtcDate, E> {
                Ok(UtcDate(v))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<UtcDate, E> {
                i64::try_from(v)
                    .map(UtcDate)
                    .map_err(|_| E::custom("date out of range"))
            }
        }

        deserializer.deserialize_newtype_struct(DATE_TOKEN, DateVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_time() {
        let d = UtcDate::from_millis(-1500);
        let t: SystemTime = d.into();
        assert_eq!(UtcDate::from(t), d);
        let d = UtcDate::from_millis(1_700_000_000_123);
        let t: SystemTime = d.into();
        assert_eq!(UtcDate::from(t), d);
    }

    #[test]
    fn ordering() {
        assert!(UtcDate::min_value() < UtcDate::from_millis(0));
        assert!(UtcDate::from_millis(0) < UtcDate::max_value());
        assert!(UtcDate::now() > UtcDate::from_millis(0));
    }
}
