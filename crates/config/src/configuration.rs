use crate::error::{ConfigError, ConfigResult};
use crate::time::TimeData;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Multimap from key to the values inserted under it, in insertion order.
///
/// Keys iterate in sorted order so exports are deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Configuration {
    properties: BTreeMap<String, Vec<String>>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the values stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.properties
            .entry(key.into())
            .or_default()
            .push(value.to_string());
    }

    pub fn insert_time(&mut self, key: impl Into<String>, data: TimeData) {
        self.insert(key, data);
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Every key with all of its values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.properties
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// First value stored under `key`.
    pub fn string_value(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn string_values(&self, key: &str) -> Option<&[String]> {
        self.properties.get(key).map(Vec::as_slice)
    }

    /// First value parsed as `T`. `Ok(None)` when the key is absent.
    pub fn value<T>(&self, key: &str) -> ConfigResult<Option<T>>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.string_value(key)
            .map(|raw| parse_value::<T>(key, raw))
            .transpose()
    }

    /// All values parsed as `T`; the first failure is returned.
    pub fn values<T>(&self, key: &str) -> ConfigResult<Option<Vec<T>>>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.string_values(key)
            .map(|raws| {
                raws.iter()
                    .map(|raw| parse_value::<T>(key, raw))
                    .collect::<ConfigResult<Vec<T>>>()
            })
            .transpose()
    }

    /// `true` only for `"true"` in any ASCII case; every other value is
    /// `false`.
    pub fn bool_value(&self, key: &str) -> Option<bool> {
        self.string_value(key).map(parse_bool)
    }

    pub fn bool_values(&self, key: &str) -> Option<Vec<bool>> {
        self.string_values(key)
            .map(|raws| raws.iter().map(|raw| parse_bool(raw)).collect())
    }

    pub fn time_value(&self, key: &str) -> ConfigResult<Option<TimeData>> {
        self.value(key)
    }

    pub fn time_values(&self, key: &str) -> ConfigResult<Option<Vec<TimeData>>> {
        self.values(key)
    }
}

fn parse_value<T>(key: &str, raw: &str) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.parse::<T>()
        .map_err(|err| ConfigError::invalid_value(key, raw, err))
}

fn parse_bool(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true")
}
