use std::fmt;

use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Free text with an optional language tag, e.g.
/// `<Description xml:lang="EN">Buses are detoured</Description>`.
///
/// Decodes from a plain string or from an object carrying `Lang` and `Value`
/// (the XML text node). Lower-case `lang`/`value` keys are accepted as well.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NaturalLanguageString {
    pub lang: Option<String>,
    pub value: String,
}

impl NaturalLanguageString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            lang: None,
            value: value.into(),
        }
    }

    pub fn with_lang(lang: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            lang: Some(lang.into()),
            value: value.into(),
        }
    }
}

impl fmt::Display for NaturalLanguageString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.lang {
            Some(lang) if self.value.is_empty() => write!(f, "[{lang}]"),
            Some(lang) => write!(f, "[{lang}] {}", self.value),
            None => f.write_str(&self.value),
        }
    }
}

impl Serialize for NaturalLanguageString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.lang {
            None => serializer.serialize_str(&self.value),
            Some(lang) => {
                let mut state = serializer.serialize_struct("NaturalLanguageString", 2)?;
                state.serialize_field("Lang", lang)?;
                state.serialize_field("Value", &self.value)?;
                state.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for NaturalLanguageString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TextVisitor;

        impl<'de> Visitor<'de> for TextVisitor {
            type Value = NaturalLanguageString;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string or an object with Lang and Value")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(NaturalLanguageString::new(v))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(NaturalLanguageString::new(v))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut text = NaturalLanguageString::default();
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "Lang" | "lang" => text.lang = map.next_value()?,
                        "Value" | "value" => {
                            text.value = map.next_value::<Option<String>>()?.unwrap_or_default()
                        }
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                Ok(text)
            }
        }

        deserializer.deserialize_any(TextVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_string() {
        let text: NaturalLanguageString = serde_json::from_value(json!("Broadway")).unwrap();
        assert_eq!(text, NaturalLanguageString::new("Broadway"));
        assert_eq!(text.to_string(), "Broadway");
    }

    #[test]
    fn test_lang_and_value() {
        let text: NaturalLanguageString =
            serde_json::from_value(json!({ "Lang": "EN", "Value": "Detour" })).unwrap();
        assert_eq!(text, NaturalLanguageString::with_lang("EN", "Detour"));
        assert_eq!(text.to_string(), "[EN] Detour");
    }

    #[test]
    fn test_lower_case_keys_and_extra_fields() {
        let text: NaturalLanguageString =
            serde_json::from_value(json!({ "lang": "NO", "value": "Buss", "Other": 1 })).unwrap();
        assert_eq!(text, NaturalLanguageString::with_lang("NO", "Buss"));
    }

    #[test]
    fn test_serializes_to_plain_string_without_lang() {
        let value = serde_json::to_value(NaturalLanguageString::new("M15")).unwrap();
        assert_eq!(value, json!("M15"));

        let value = serde_json::to_value(NaturalLanguageString::with_lang("EN", "x")).unwrap();
        assert_eq!(value, json!({ "Lang": "EN", "Value": "x" }));
    }

    #[test]
    fn test_lang_without_text() {
        let text: NaturalLanguageString = serde_json::from_value(json!({ "Lang": "EN" })).unwrap();
        assert_eq!(text.value, "");
        assert_eq!(text.to_string(), "[EN]");
    }
}
