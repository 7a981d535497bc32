use indexmap::map::{IndexMap, IntoIter};

use super::Value;

/// An insertion-ordered map of response keys to [`Value`]s.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Object {
    key_value_list: IndexMap<String, Value>,
}

impl Object {
    /// Creates a new [`Object`] with a fixed number of preallocated slots for
    /// field-value pairs.
    pub fn with_capacity(size: usize) -> Self {
        Self {
            key_value_list: IndexMap::with_capacity(size),
        }
    }

    /// Adds a new field with a value.
    ///
    /// If there is already a field for the given key and both values are
    /// objects, they are merged. Otherwise the existing value is replaced and
    /// returned.
    pub fn add_field<K: Into<String>>(&mut self, k: K, value: Value) -> Option<Value> {
        let key = k.into();
        match (value, self.key_value_list.get_mut(&key)) {
            (Value::Object(obj), Some(Value::Object(existing))) => {
                for (k, v) in obj {
                    existing.add_field(k, v);
                }
                None
            }
            (value, _) => self.key_value_list.insert(key, value),
        }
    }

    /// Checks if this [`Object`] already contains a field with the given key.
    pub fn contains_field(&self, key: &str) -> bool {
        self.key_value_list.contains_key(key)
    }

    /// Returns an iterator over all field-value pairs, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.key_value_list.iter()
    }

    /// Returns an iterator over all mutable field-value pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Value)> {
        self.key_value_list.iter_mut()
    }

    /// Returns the current number of fields.
    pub fn field_count(&self) -> usize {
        self.key_value_list.len()
    }

    /// Returns the value of the field with the given key, if present.
    pub fn get_field_value(&self, key: &str) -> Option<&Value> {
        self.key_value_list.get(key)
    }

    /// Returns a mutable reference to the value of the field with the given
    /// key, if present.
    pub fn get_mut_field_value(&mut self, key: &str) -> Option<&mut Value> {
        self.key_value_list.get_mut(key)
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.key_value_list.into_iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut obj = Self {
            key_value_list: IndexMap::with_capacity(iter.size_hint().0),
        };
        for (k, v) in iter {
            obj.add_field(k, v);
        }
        obj
    }
}
