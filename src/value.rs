//! Dynamically typed elements for sequences that mix types.
//!
//! Most pipelines are generic over one element type. When a sequence has to
//! carry several (zipping counters with labels, say), wrap elements in a
//! [`Value`] and read them back with [`Value::get`] or
//! [`Value::downcast_ref`], which report a wrong guess as
//! [`Error::TypeMismatch`] instead of panicking.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};

#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// An ordered group of values, as produced by zipping.
    pub fn group(values: Vec<Value>) -> Self {
        Self::new(values)
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Result<&T> {
        self.inner
            .downcast_ref::<T>()
            .ok_or_else(|| Error::type_mismatch::<T>(self.type_name))
    }

    pub fn get<T: Any + Clone>(&self) -> Result<T> {
        self.downcast_ref::<T>().cloned()
    }

    /// Borrow a string stored either as `String` or `&'static str`.
    pub fn as_str(&self) -> Result<&str> {
        if let Some(owned) = self.inner.downcast_ref::<String>() {
            return Ok(owned.as_str());
        }
        self.inner
            .downcast_ref::<&'static str>()
            .copied()
            .ok_or_else(|| Error::type_mismatch::<str>(self.type_name))
    }

    pub fn as_group(&self) -> Option<&[Value]> {
        self.inner.downcast_ref::<Vec<Value>>().map(Vec::as_slice)
    }

    /// Take the group out of a group value, or hand the value back.
    pub fn into_group(self) -> std::result::Result<Vec<Value>, Value> {
        let type_name = self.type_name;
        match Arc::downcast::<Vec<Value>>(self.inner) {
            Ok(group) => Ok(Arc::try_unwrap(group).unwrap_or_else(|shared| (*shared).clone())),
            Err(inner) => Err(Value { inner, type_name }),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        macro_rules! show {
            ($($ty:ty),*) => {
                $(
                    if let Some(value) = self.inner.downcast_ref::<$ty>() {
                        return fmt::Debug::fmt(value, f);
                    }
                )*
            };
        }
        show!(i32, i64, u32, u64, usize, f32, f64, bool, char, String, &'static str, Vec<Value>);
        write!(f, "Value<{}>", self.type_name)
    }
}

macro_rules! impl_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::new(value)
                }
            }
        )*
    };
}

impl_from!(
    i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64, bool, char, String,
    &'static str
);

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::group(values)
    }
}
