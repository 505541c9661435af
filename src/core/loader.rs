//! Reads a stack outputs file into an [`OutputSet`].

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::path::Path;

use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::utils::io;

/// Parsed input: group name to its raw outputs value.
///
/// Groups are kept as raw values; the collector decides which of them are
/// usable and reports the rest.
pub type OutputSet = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
}

impl InputFormat {
    /// YAML for `.yaml`/`.yml`, JSON for everything else.
    pub fn from_path(path: &Path) -> InputFormat {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => InputFormat::Yaml,
            _ => InputFormat::Json,
        }
    }
}

/// Human-readable name of a JSON value's type, used in diagnostics.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub fn load(path: &Path, diagnostics: &mut Diagnostics) -> Result<OutputSet> {
    let content = io::read_file(path)?;
    let format = InputFormat::from_path(path);
    diagnostics.debug(format!("Loaded {} ({:?})", path.display(), format));
    parse(&content, format, path)
}

/// YAML document read into the same value model JSON input uses.
///
/// Integers wider than 64 bits become floats, as they do in JSON. `.inf`
/// and `.nan` have no JSON form and are rejected.
struct YamlValue(Value);

impl<'de> Deserialize<'de> for YamlValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(YamlValueVisitor)
    }
}

struct YamlValueVisitor;

impl YamlValueVisitor {
    fn float<E: de::Error>(value: f64) -> std::result::Result<YamlValue, E> {
        Number::from_f64(value)
            .map(|n| YamlValue(Value::Number(n)))
            .ok_or_else(|| E::custom(format!("non-finite number {} is not supported", value)))
    }
}

impl<'de> Visitor<'de> for YamlValueVisitor {
    type Value = YamlValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a YAML value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<YamlValue, E> {
        Ok(YamlValue(Value::Bool(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<YamlValue, E> {
        Ok(YamlValue(Value::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<YamlValue, E> {
        Ok(YamlValue(Value::from(v)))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> std::result::Result<YamlValue, E> {
        match i64::try_from(v) {
            Ok(small) => self.visit_i64(small),
            Err(_) => Self::float(v as f64),
        }
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> std::result::Result<YamlValue, E> {
        match u64::try_from(v) {
            Ok(small) => self.visit_u64(small),
            Err(_) => Self::float(v as f64),
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<YamlValue, E> {
        Self::float(v)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<YamlValue, E> {
        Ok(YamlValue(Value::String(v.to_owned())))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<YamlValue, E> {
        Ok(YamlValue(Value::String(v)))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<YamlValue, E> {
        Ok(YamlValue(Value::Null))
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<YamlValue, E> {
        Ok(YamlValue(Value::Null))
    }

    fn visit_some<D>(self, deserializer: D) -> std::result::Result<YamlValue, D::Error>
    where
        D: Deserializer<'de>,
    {
        YamlValue::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<YamlValue, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::new();
        while let Some(YamlValue(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(YamlValue(Value::Array(items)))
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<YamlValue, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Map::new();
        while let Some((key, YamlValue(value))) = map.next_entry::<String, YamlValue>()? {
            entries.insert(key, value);
        }
        Ok(YamlValue(Value::Object(entries)))
    }
}

/// Parse already-read content. `path` is only used in error messages.
pub fn parse(content: &str, format: InputFormat, path: &Path) -> Result<OutputSet> {
    let value: Value = match format {
        InputFormat::Json => serde_json::from_str(content)
            .map_err(|e| Error::input_parse_failed(path.display().to_string(), e.to_string()))?,
        InputFormat::Yaml => serde_yml::from_str::<YamlValue>(content)
            .map(|yaml| yaml.0)
            .map_err(|e| Error::input_parse_failed(path.display().to_string(), e.to_string()))?,
    };

    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::input_shape_invalid(
            path.display().to_string(),
            type_name(&other),
        )),
    }
}
