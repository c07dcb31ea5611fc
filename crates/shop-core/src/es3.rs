//! Reader for "Easy Save 3" documents.
//!
//! ES3 writes JSON but leaves integer object keys unquoted (`{12:"Apple"}`),
//! which no JSON parser accepts. JSON is nearly a subset of YAML, and YAML
//! accepts bare keys once each `key:` is followed by a space, so documents are
//! normalized and handed to `serde_yaml`.
//!
//! Known limitation: string values containing tabs or `<digit>:` are altered.

use crate::LoadError;
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// ES3 top-level entry: `{"__type": "...", "value": ...}`.
#[derive(Clone, Debug, Deserialize)]
pub struct Wrapped<T> {
    pub value: T,
}

/// Rewrite ES3 text so a YAML parser accepts it.
///
/// Tabs become spaces and every `:` directly preceded by an ASCII digit gets
/// a trailing space.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + raw.len() / 16);
    let mut prev_digit = false;
    for ch in raw.chars() {
        match ch {
            '\t' => out.push(' '),
            ':' if prev_digit => out.push_str(": "),
            _ => out.push(ch),
        }
        prev_digit = ch.is_ascii_digit();
    }
    out
}

/// Parse ES3 text into a typed record.
pub fn from_str<T: DeserializeOwned>(raw: &str) -> Result<T, LoadError> {
    let text = normalize(raw);
    Ok(serde_yaml::from_str(&text)?)
}

/// Read and parse an ES3 file.
pub fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = raw.len(), "parsing ES3 document");
    from_str(&raw)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Integer field that ES3 may have written as a number or a numeric string
/// (asset references are the usual case).
pub(crate) fn lenient_i64<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    match Scalar::deserialize(d)? {
        Scalar::Int(v) => Ok(v),
        Scalar::Float(v) if v.fract() == 0.0 && v.is_finite() => Ok(v as i64),
        Scalar::Float(v) => Err(D::Error::custom(format!("expected integer, got {v}"))),
        Scalar::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("expected integer, got {s:?}"))),
    }
}

/// Enum name table: either names listed in ordinal order or a name → ordinal
/// map.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum RawEnum {
    List(Vec<String>),
    Map(std::collections::BTreeMap<String, u32>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn normalize_spaces_integer_keys() {
        assert_eq!(normalize("{12:\"Apple\",3:\"Pear\"}"), "{12: \"Apple\",3: \"Pear\"}");
        assert_eq!(normalize("{\t\"a\":1}"), "{ \"a\":1}");
        // quoted keys are untouched
        assert_eq!(normalize("{\"ID\":5}"), "{\"ID\":5}");
    }

    #[test]
    fn bare_integer_keys_parse() {
        let doc: Wrapped<BTreeMap<u32, String>> =
            from_str("{\"__type\":\"x\",\"value\":{12:\"Apple\",3:\"Pear\"}}").unwrap();
        assert_eq!(doc.value.get(&12).map(String::as_str), Some("Apple"));
        assert_eq!(doc.value.len(), 2);
    }

    #[test]
    fn lenient_accepts_strings_and_numbers() {
        #[derive(Deserialize)]
        struct R {
            #[serde(deserialize_with = "lenient_i64")]
            a: i64,
            #[serde(deserialize_with = "lenient_i64")]
            b: i64,
        }
        let r: R = from_str("{\"a\":\"8812345678\",\"b\":42}").unwrap();
        assert_eq!(r.a, 8_812_345_678);
        assert_eq!(r.b, 42);
        assert!(from_str::<R>("{\"a\":\"x\",\"b\":1}").is_err());
    }

    #[test]
    fn raw_enum_both_shapes() {
        let l: RawEnum = from_str("[\"Small\",\"Big\"]").unwrap();
        assert!(matches!(l, RawEnum::List(v) if v.len() == 2));
        let m: RawEnum = from_str("{\"Small\":0,\"Big\":1}").unwrap();
        assert!(matches!(m, RawEnum::Map(v) if v["Big"] == 1));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_file::<Wrapped<i32>>(Path::new("/nonexistent/SaveFile.es3")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
