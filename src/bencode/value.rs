use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;

/// Represents a value in the Bencode format.
///
/// Dictionaries are stored in a `BTreeMap` so their keys stay in ascending
/// byte order; re-encoding a decoded value is therefore canonical without
/// any extra sorting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BencodedValue {
    /// Represents a Bencoded dictionary (key-value pairs).
    Dict(BTreeMap<Vec<u8>, BencodedValue>),

    /// Represents a Bencoded list of values.
    List(Vec<BencodedValue>),

    /// Represents a Bencoded integer.
    Integer(i64),

    /// Represents a Bencoded byte string, not necessarily valid UTF-8.
    ByteString(Vec<u8>),
}

impl BencodedValue {
    pub fn try_into_dict(&self) -> Option<&BTreeMap<Vec<u8>, BencodedValue>> {
        match self {
            BencodedValue::Dict(d) => Some(d),
            _ => None,
        }
    }

    pub fn try_into_list(&self) -> Option<&Vec<BencodedValue>> {
        match self {
            BencodedValue::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn try_into_integer(&self) -> Option<i64> {
        match self {
            BencodedValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn try_into_byte_string(&self) -> Option<&Vec<u8>> {
        match self {
            BencodedValue::ByteString(b) => Some(b),
            _ => None,
        }
    }

    pub fn get_from_dict(&self, key: &[u8]) -> Option<&BencodedValue> {
        self.try_into_dict().and_then(|dict| dict.get(key))
    }

    /// Reads a dictionary entry as an owned UTF-8 string.
    pub fn get_string_from_dict(&self, key: &[u8]) -> Option<String> {
        self.get_from_dict(key)
            .and_then(BencodedValue::try_into_byte_string)
            .and_then(|bytes| String::from_utf8(bytes.clone()).ok())
    }
}
