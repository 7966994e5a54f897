use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON object edited in place.
///
/// Keys nobody touches keep their position and value, `null`s included.
/// Replacing a key keeps its position; new keys go at the end.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Missing, `null` and non-string values are all `None`.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// An id written as a string or a number.
    pub fn id(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(crate::de::id_of)
    }

    /// The value under `key` if it reads as a `T`.
    pub fn parse<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        T::deserialize(self.0.get(key)?).ok()
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    /// Rewrites a non-empty string under `key`; anything else is left alone.
    pub fn update_str(&mut self, key: &str, f: impl FnOnce(&str) -> String) {
        if let Some(Value::String(x)) = self.0.get_mut(key) {
            if !x.is_empty() {
                *x = f(x);
            }
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
