//! Calendar-day handling. Meals, goals and activity are all keyed on the
//! `YYYY-MM-DD` day a thing happened, never on full timestamps.

use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};

pub const DAY_FMT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

pub fn format_day(d: Date) -> String {
    // formatting with a literal-only description cannot fail
    d.format(DAY_FMT).unwrap_or_else(|_| d.to_string())
}

/// serde adapter: `#[serde(with = "crate::dates::day")]`
pub mod day {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
    use time::Date;

    use super::{format_day, DAY_FMT};

    pub fn serialize<S: Serializer>(d: &Date, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&format_day(*d))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Date, D::Error> {
        let s = String::deserialize(de)?;
        Date::parse(&s, DAY_FMT).map_err(D::Error::custom)
    }

    /// `#[serde(default, with = "crate::dates::day::option")]`
    pub mod option {
        use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
        use time::Date;

        use super::super::{format_day, DAY_FMT};

        pub fn serialize<S: Serializer>(d: &Option<Date>, ser: S) -> Result<S::Ok, S::Error> {
            match d {
                Some(d) => ser.serialize_some(&format_day(*d)),
                None => ser.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Date>, D::Error> {
            let s = Option::<String>::deserialize(de)?;
            s.map(|s| Date::parse(&s, DAY_FMT).map_err(D::Error::custom))
                .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn formats_iso_day() {
        assert_eq!(format_day(date!(2025 - 01 - 09)), "2025-01-09");
    }

    #[test]
    fn day_roundtrip_through_serde() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Wrap {
            #[serde(with = "crate::dates::day")]
            d: Date,
        }

        let json = serde_json::to_string(&Wrap { d: date!(2024 - 12 - 31) }).unwrap();
        assert_eq!(json, r#"{"d":"2024-12-31"}"#);
        let back: Wrap = serde_json::from_str(&json).unwrap();
        assert_eq!(back.d, date!(2024 - 12 - 31));
    }

    #[test]
    fn option_day_accepts_null_and_value() {
        #[derive(serde::Deserialize)]
        struct Wrap {
            #[serde(default, with = "crate::dates::day::option")]
            d: Option<Date>,
        }

        let some: Wrap = serde_json::from_str(r#"{"d":"2023-06-01"}"#).unwrap();
        assert_eq!(some.d, Some(date!(2023 - 06 - 01)));
        let none: Wrap = serde_json::from_str(r#"{}"#).unwrap();
        assert!(none.d.is_none());
        let bad = serde_json::from_str::<Wrap>(r#"{"d":"June 1st"}"#);
        assert!(bad.is_err());
    }
}
