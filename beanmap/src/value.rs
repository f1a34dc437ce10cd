use std::{
    any::{Any, TypeId},
    fmt,
};

use crate::{PropertyType, TypeDescriptor};

/// Dynamically typed property value.
///
/// Every value read from or written to a [`BeanMap`](crate::BeanMap) travels
/// as a `Value`. Primitive kinds and `String` get their own variants so that
/// coercion can inspect them cheaply; any other [`PropertyType`] is carried
/// type-erased in [`Value::Object`].
///
/// An absent value is expressed with `Option<Value>::None`; there is no null
/// variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Object(Object),
}

impl Value {
    /// Wraps any property type, normalising primitives into their own variant.
    pub fn from_property<T: PropertyType>(value: T) -> Self {
        value.into_value()
    }

    /// Runtime type of the payload, as used by the assignability check.
    pub fn type_id(&self) -> TypeId {
        match self {
            Value::Bool(_) => TypeId::of::<bool>(),
            Value::Char(_) => TypeId::of::<char>(),
            Value::I8(_) => TypeId::of::<i8>(),
            Value::I16(_) => TypeId::of::<i16>(),
            Value::I32(_) => TypeId::of::<i32>(),
            Value::I64(_) => TypeId::of::<i64>(),
            Value::U8(_) => TypeId::of::<u8>(),
            Value::U16(_) => TypeId::of::<u16>(),
            Value::U32(_) => TypeId::of::<u32>(),
            Value::U64(_) => TypeId::of::<u64>(),
            Value::F32(_) => TypeId::of::<f32>(),
            Value::F64(_) => TypeId::of::<f64>(),
            Value::String(_) => TypeId::of::<String>(),
            Value::Object(o) => o.payload_type_id(),
        }
    }

    /// Human-readable name of the payload type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::String(_) => "String",
            Value::Object(o) => o.type_name(),
        }
    }

    /// Default textual form of the value.
    ///
    /// This is what the transformer fallback of coercion parses.
    pub fn to_text(&self) -> String {
        match self {
            Value::Bool(v) => v.to_string(),
            Value::Char(v) => v.to_string(),
            Value::I8(v) => v.to_string(),
            Value::I16(v) => v.to_string(),
            Value::I32(v) => v.to_string(),
            Value::I64(v) => v.to_string(),
            Value::U8(v) => v.to_string(),
            Value::U16(v) => v.to_string(),
            Value::U32(v) => v.to_string(),
            Value::U64(v) => v.to_string(),
            Value::F32(v) => v.to_string(),
            Value::F64(v) => v.to_string(),
            Value::String(v) => v.clone(),
            Value::Object(o) => o.to_text(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Converts the value back into a concrete property type.
    ///
    /// Returns the value unchanged when it does not hold a `T`.
    pub fn into_property<T: PropertyType>(self) -> Result<T, Value> {
        T::from_value(self)
    }

    /// Borrowing variant of [`Value::into_property`] for object payloads.
    pub fn downcast_ref<T: PropertyType>(&self) -> Option<&T> {
        self.as_object().and_then(Object::downcast_ref)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

/// Type-erased payload of a [`Value::Object`].
pub struct Object(Box<dyn ErasedProperty>);

impl Object {
    pub(crate) fn new<T: PropertyType>(value: T) -> Self {
        Self(Box::new(value))
    }

    pub fn is<T: PropertyType>(&self) -> bool {
        self.payload_type_id() == TypeId::of::<T>()
    }

    pub fn downcast_ref<T: PropertyType>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Takes the payload out, or hands the object back on a type mismatch.
    pub fn downcast<T: PropertyType>(self) -> Result<T, Object> {
        if self.is::<T>() {
            match self.0.into_any().downcast::<T>() {
                Ok(boxed) => Ok(*boxed),
                Err(_) => unreachable!("type id checked above"),
            }
        } else {
            Err(self)
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    pub fn descriptor(&self) -> TypeDescriptor {
        self.0.descriptor()
    }

    pub fn to_text(&self) -> String {
        self.0.to_text()
    }

    fn payload_type_id(&self) -> TypeId {
        self.0.as_any().type_id()
    }
}

impl Clone for Object {
    fn clone(&self) -> Self {
        Self(self.0.clone_box())
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_dyn(other.0.as_any())
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_dyn(f)
    }
}

trait ErasedProperty: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn clone_box(&self) -> Box<dyn ErasedProperty>;
    fn eq_dyn(&self, other: &dyn Any) -> bool;
    fn fmt_dyn(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
    fn type_name(&self) -> &'static str;
    fn descriptor(&self) -> TypeDescriptor;
    fn to_text(&self) -> String;
}

impl<T: PropertyType> ErasedProperty for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn clone_box(&self) -> Box<dyn ErasedProperty> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>() == Some(self)
    }

    fn fmt_dyn(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }

    fn type_name(&self) -> &'static str {
        T::type_name()
    }

    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<T>()
    }

    fn to_text(&self) -> String {
        PropertyType::to_text(self)
    }
}
