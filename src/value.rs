//! Generated Values
//!
//! Dynamic value model produced by every generator. Container values keep
//! their components in generation order; `Map` keeps unique keys.

use crate::types::RawType;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A synthesized value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Char(char),
    Int(i128),
    Float(f64),
    Str(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Seq(Vec<Value>),
    Set(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Array(Vec<Value>),
    Enum(EnumValue),
    Object(ObjectValue),
}

/// Variant of a registered enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub ty: RawType,
    pub variant: Arc<str>,
}

/// Opaque instance built by a constructor or factory.
#[derive(Clone)]
pub struct ObjectValue {
    ty: RawType,
    inner: Arc<dyn Any + Send + Sync>,
}

impl ObjectValue {
    pub fn new<T: Any + Send + Sync>(ty: RawType, value: T) -> Self {
        Self {
            ty,
            inner: Arc::new(value),
        }
    }

    pub fn ty(&self) -> &RawType {
        &self.ty
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectValue").field("ty", &self.ty).finish()
    }
}

impl PartialEq for ObjectValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i128> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Components of a sequence, set or array.
    pub fn as_elements(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) | Value::Set(items) | Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_entries(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Value::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Downcast an object value to its concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Object(object) => object.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Number of components for container values.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Seq(items) | Value::Set(items) | Value::Array(items) => Some(items.len()),
            Value::Map(entries) => Some(entries.len()),
            Value::Str(s) => Some(s.chars().count()),
            _ => None,
        }
    }

    /// JSON rendering for diagnostics and snapshots.
    ///
    /// Map keys are rendered with their JSON text; objects render as their
    /// type name.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => json!(b),
            Value::Char(c) => json!(c.to_string()),
            Value::Int(i) => match i64::try_from(*i) {
                Ok(small) => json!(small),
                Err(_) => json!(i.to_string()),
            },
            Value::Float(f) => json!(f),
            Value::Str(s) => json!(s),
            Value::Uuid(u) => json!(u.to_string()),
            Value::Timestamp(t) => json!(t.to_rfc3339()),
            Value::Seq(items) | Value::Set(items) | Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map(entries) => {
                let mut object = serde_json::Map::new();
                for (key, value) in entries {
                    let key = match key {
                        Value::Str(s) => s.clone(),
                        other => other.to_json().to_string(),
                    };
                    object.insert(key, value.to_json());
                }
                serde_json::Value::Object(object)
            }
            Value::Enum(e) => json!(format!("{}::{}", e.ty, e.variant)),
            Value::Object(o) => json!({ "object": o.ty.to_string() }),
        }
    }
}
