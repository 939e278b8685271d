//! Header fields of a response or of a multipart body part.
//!
//! Names are kept exactly as given (no case folding) and iterate in ascending
//! bytewise order, which makes the emitted header block reproducible.

use std::collections::BTreeMap;
use std::collections::btree_map;

pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const LOCATION: &str = "Location";
pub const SET_COOKIE: &str = "Set-Cookie";
pub const TRANSFER_ENCODING: &str = "Transfer-Encoding";

/// The value stored under one header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A header sent as a single line
    Single(String),
    /// A header sent as one line per value, in order
    List(Vec<String>),
}

impl FieldValue {
    /// Iterates the values this field emits, one per header line.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let values: &[String] = match self {
            FieldValue::Single(value) => std::slice::from_ref(value),
            FieldValue::List(values) => values,
        };
        values.iter().map(String::as_str)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_owned())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

/// An ordered, case-preserving header map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderFields {
    fields: BTreeMap<String, FieldValue>,
}

impl HeaderFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to a single value, replacing whatever was stored before.
    pub fn insert<N, V>(&mut self, name: N, value: V) -> Option<FieldValue>
    where
        N: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns the value of a single-valued header.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.fields.get(name)? {
            FieldValue::Single(value) => Some(value.as_str()),
            FieldValue::List(_) => None,
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Returns the list stored under `name`, creating an empty one if absent.
    ///
    /// A single value already stored there becomes the first list entry.
    pub fn list_mut(&mut self, name: &str) -> &mut Vec<String> {
        let field = self
            .fields
            .entry(name.to_owned())
            .or_insert_with(|| FieldValue::List(Vec::new()));

        if let FieldValue::Single(value) = field {
            let value = std::mem::take(value);
            *field = FieldValue::List(vec![value]);
        }

        match field {
            FieldValue::List(values) => values,
            FieldValue::Single(_) => unreachable!("single value was converted to a list above"),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates fields in ascending name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldValue> {
        self.fields.iter()
    }

    /// Iterates `(name, value)` pairs in emission order, one per header line.
    pub fn lines(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .flat_map(|(name, value)| value.iter().map(move |v| (name.as_str(), v)))
    }
}

impl<N, V> FromIterator<(N, V)> for HeaderFields
where
    N: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut fields = HeaderFields::new();
        for (name, value) in iter {
            fields.insert(name, value);
        }
        fields
    }
}

impl<'a> IntoIterator for &'a HeaderFields {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = btree_map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
