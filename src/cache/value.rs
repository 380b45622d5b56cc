//! Stored Value Module
//!
//! The scalar payload kinds accepted by `InstrumentedCache::store`.

use serde::Deserialize;

// == Stored Value ==
/// A payload to store: text, raw bytes, an integer or a float.
///
/// Deserializes untagged from JSON: integers, then floats, then strings, then
/// arrays of bytes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl StoredValue {
    // == Encode ==
    /// Byte representation written to the store.
    ///
    /// Numbers are written as their decimal text so the store can read them
    /// back as counters.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            StoredValue::Text(text) => text.as_bytes().to_vec(),
            StoredValue::Bytes(bytes) => bytes.clone(),
            StoredValue::Int(n) => n.to_string().into_bytes(),
            StoredValue::Float(f) => f.to_string().into_bytes(),
        }
    }

    // == Repr ==
    /// Human-readable representation used in call history.
    ///
    /// Text renders as `'foo'` and bytes as `b'foo'`. Double quotes are used
    /// instead when the value holds a single quote and no double quote.
    pub fn repr(&self) -> String {
        match self {
            StoredValue::Text(text) => quoted("", text.chars(), false),
            StoredValue::Bytes(bytes) => quoted("b", bytes.iter().map(|&b| char::from(b)), true),
            StoredValue::Int(n) => n.to_string(),
            StoredValue::Float(f) => format!("{:?}", f),
        }
    }
}

/// Quotes `chars` after `prefix`, escaping backslashes, the quote character
/// and unprintable characters. With `ascii_only`, everything outside
/// printable ASCII is escaped as `\xNN`.
fn quoted<I>(prefix: &str, chars: I, ascii_only: bool) -> String
where
    I: Iterator<Item = char> + Clone,
{
    let (has_single, has_double) = chars
        .clone()
        .fold((false, false), |(s, d), c| (s || c == '\'', d || c == '"'));
    let quote = if has_single && !has_double { '"' } else { '\'' };

    let mut out = String::from(prefix);
    out.push(quote);
    for c in chars {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if ascii_only && !(' '..='~').contains(&c) => {
                out.push_str(&format!("\\x{:02x}", u32::from(c)));
            }
            c if c.is_control() => {
                let code = u32::from(c);
                if code < 0x100 {
                    out.push_str(&format!("\\x{:02x}", code));
                } else {
                    out.push_str(&format!("\\u{:04x}", code));
                }
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

impl From<&str> for StoredValue {
    fn from(value: &str) -> Self {
        StoredValue::Text(value.to_string())
    }
}

impl From<String> for StoredValue {
    fn from(value: String) -> Self {
        StoredValue::Text(value)
    }
}

impl From<Vec<u8>> for StoredValue {
    fn from(value: Vec<u8>) -> Self {
        StoredValue::Bytes(value)
    }
}

impl From<&[u8]> for StoredValue {
    fn from(value: &[u8]) -> Self {
        StoredValue::Bytes(value.to_vec())
    }
}

impl From<i64> for StoredValue {
    fn from(value: i64) -> Self {
        StoredValue::Int(value)
    }
}

impl From<f64> for StoredValue {
    fn from(value: f64) -> Self {
        StoredValue::Float(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(StoredValue::from("foo").encode(), b"foo".to_vec());
        assert_eq!(StoredValue::from(vec![0u8, 255]).encode(), vec![0u8, 255]);
        assert_eq!(StoredValue::from(42i64).encode(), b"42".to_vec());
        assert_eq!(StoredValue::from(-7i64).encode(), b"-7".to_vec());
        assert_eq!(StoredValue::from(3.5f64).encode(), b"3.5".to_vec());
    }

    #[test]
    fn test_repr() {
        assert_eq!(StoredValue::from("foo").repr(), "'foo'");
        assert_eq!(StoredValue::from(&b"a\n"[..]).repr(), "b'a\\n'");
        assert_eq!(StoredValue::from(42i64).repr(), "42");
        assert_eq!(StoredValue::from(1.0f64).repr(), "1.0");
    }

    #[test]
    fn test_repr_quoting() {
        assert_eq!(StoredValue::from("it's").repr(), "\"it's\"");
        assert_eq!(StoredValue::from("say \"hi\"").repr(), "'say \"hi\"'");
        assert_eq!(StoredValue::from("'\"").repr(), "'\\'\"'");
        assert_eq!(StoredValue::from("a\\b").repr(), "'a\\\\b'");
        assert_eq!(StoredValue::from("caf\u{e9}\u{1}").repr(), "'caf\u{e9}\\x01'");
        assert_eq!(StoredValue::from(vec![0u8, 0xff, b'\'']).repr(), "b\"\\x00\\xff'\"");
        assert_eq!(StoredValue::from("").repr(), "''");
    }

    #[test]
    fn test_deserialize_untagged() {
        let int: StoredValue = serde_json::from_str("42").unwrap();
        assert_eq!(int, StoredValue::Int(42));

        let float: StoredValue = serde_json::from_str("4.25").unwrap();
        assert_eq!(float, StoredValue::Float(4.25));

        let text: StoredValue = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(text, StoredValue::Text("hello".to_string()));

        let bytes: StoredValue = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(bytes, StoredValue::Bytes(vec![1, 2, 3]));
    }
}
