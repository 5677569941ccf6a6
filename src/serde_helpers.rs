//! Serde adapters for the structural conventions of SIRI feeds.
//!
//! Both wire formats are mapped through a [`serde_json::Value`] tree, so these
//! helpers can rely on a self-describing deserializer.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::de::{self, Deserialize, Deserializer, IntoDeserializer, MapAccess, SeqAccess, Visitor};
use serde_json::Value;

/// Deserializes a list field that the producer may have flattened to a single
/// element when only one item was present.
///
/// `null` or a missing field gives `None`, an explicit array gives its items and
/// any other value is promoted to a one-element list.
pub fn one_or_many<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct OneOrMany<T>(PhantomData<T>);

    impl<'de, T> Visitor<'de> for OneOrMany<T>
    where
        T: Deserialize<'de>,
    {
        type Value = Option<Vec<T>>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a list or a single element")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_any(self)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(item) = seq.next_element()? {
                items.push(item);
            }
            Ok(Some(items))
        }

        fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            T::deserialize(de::value::MapAccessDeserializer::new(map)).map(|item| Some(vec![item]))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            T::deserialize(v.into_deserializer()).map(|item| Some(vec![item]))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            T::deserialize(v.into_deserializer()).map(|item| Some(vec![item]))
        }
    }

    deserializer.deserialize_option(OneOrMany(PhantomData))
}

/// Deserializes an optional scalar given either natively (`true`, `40.5`) or in
/// its text form (`"true"`, `"40.5"`), as XML carries every scalar as text.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let text = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => {
            return Err(de::Error::custom(format!(
                "expected a scalar value, found {other}"
            )));
        }
    };

    text.trim()
        .parse()
        .map(Some)
        .map_err(|e| de::Error::custom(format!("invalid value {text:?}: {e}")))
}

/// Same as [`lenient`], for fields that must be present.
pub fn lenient_required<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    lenient(deserializer)?.ok_or_else(|| de::Error::custom("value must not be empty"))
}

/// Deserializes an optional `xsd:dateTime`.
///
/// Accepts RFC 3339 text, text without an offset (taken as UTC) and epoch
/// milliseconds.
pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => parse_timestamp(s.trim()).map(Some).map_err(de::Error::custom),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|t| Some(t.fixed_offset()))
            .ok_or_else(|| de::Error::custom(format!("invalid epoch milliseconds {n}"))),
        Some(other) => Err(de::Error::custom(format!(
            "expected a timestamp, found {other}"
        ))),
    }
}

/// Same as [`timestamp`], for fields that must be present.
pub fn timestamp_required<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    timestamp(deserializer)?.ok_or_else(|| de::Error::custom("timestamp must not be empty"))
}

fn parse_timestamp(text: &str) -> Result<DateTime<FixedOffset>, String> {
    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Ok(time);
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc().fixed_offset())
        .map_err(|e| format!("invalid timestamp {text:?}: {e}"))
}
