//! [`serde`] serialization for the response surface.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::{
    executor::{ExecutionError, PathSegment},
    value::{Object, ScalarValue, Value},
};

impl Serialize for ScalarValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(i) => serializer.serialize_i32(*i),
            Self::Float(n) => serializer.serialize_f64(*n),
            Self::String(s) => serializer.serialize_str(s),
            Self::Boolean(b) => serializer.serialize_bool(*b),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Scalar(s) => s.serialize(serializer),
            Self::List(l) => l.serialize(serializer),
            Self::Object(o) => o.serialize(serializer),
        }
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.field_count()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for PathSegment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Key(key) => serializer.serialize_str(key),
            Self::Index(index) => serializer.serialize_u64(*index as u64),
        }
    }
}

impl Serialize for ExecutionError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(serde::Serialize)]
        struct Location {
            line: usize,
            column: usize,
        }

        struct Locations<'a>(&'a ExecutionError);

        impl Serialize for Locations<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(&Location {
                    line: self.0.location().line,
                    column: self.0.location().column,
                })?;
                seq.end()
            }
        }

        let field_count = 2 + usize::from(!self.path().is_empty());
        let mut map = serializer.serialize_map(Some(field_count))?;
        map.serialize_entry("message", self.error().message())?;
        map.serialize_entry("locations", &Locations(self))?;
        if !self.path().is_empty() {
            map.serialize_entry("path", self.path())?;
        }
        map.end()
    }
}
