use std::{any::TypeId, fmt, sync::Arc};

use crate::{CoercionError, Value, value::Object};

/// Primitive kinds known to the [`TransformerRegistry`](crate::TransformerRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Primitive {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl Primitive {
    pub const ALL: [Primitive; 12] = [
        Primitive::Bool,
        Primitive::Char,
        Primitive::I8,
        Primitive::I16,
        Primitive::I32,
        Primitive::I64,
        Primitive::U8,
        Primitive::U16,
        Primitive::U32,
        Primitive::U64,
        Primitive::F32,
        Primitive::F64,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Char => "char",
            Primitive::I8 => "i8",
            Primitive::I16 => "i16",
            Primitive::I32 => "i32",
            Primitive::I64 => "i64",
            Primitive::U8 => "u8",
            Primitive::U16 => "u16",
            Primitive::U32 => "u32",
            Primitive::U64 => "u64",
            Primitive::F32 => "f32",
            Primitive::F64 => "f64",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A type that can be stored in a bean property.
///
/// Implemented for every primitive and `String`. Custom value types opt in
/// with an empty impl; they are then carried inside [`Value::Object`]:
///
/// ```rust
/// use beanmap::{Constructor, PropertyType, Value};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Email(String);
///
/// impl From<String> for Email {
///     fn from(s: String) -> Self {
///         Email(s)
///     }
/// }
///
/// impl PropertyType for Email {
///     fn constructors() -> Vec<Constructor> {
///         vec![Constructor::from_into::<String, Email>()]
///     }
/// }
///
/// let v = Value::from_property(Email("a@b.c".into()));
/// assert!(v.downcast_ref::<Email>().is_some());
/// ```
///
/// # Coercion hooks
///
/// - [`constructors`](PropertyType::constructors) lists single-argument
///   constructors, tried first when a written value has the wrong type.
/// - [`primitive`](PropertyType::primitive) names the transformer used as the
///   textual fallback.
/// - [`to_text`](PropertyType::to_text) is the default string conversion used
///   when this type is the *source* of a textual fallback.
///
/// Property values are plain data and must be `Send + Sync`, so [`Value`]s
/// can be handed to other threads.
pub trait PropertyType: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    fn primitive() -> Option<Primitive> {
        None
    }

    fn constructors() -> Vec<Constructor> {
        Vec::new()
    }

    fn to_text(&self) -> String {
        format!("{self:?}")
    }

    fn into_value(self) -> Value {
        Value::Object(Object::new(self))
    }

    /// Extracts `Self` from a value, handing the value back on mismatch.
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Object(o) => o.downcast::<Self>().map_err(Value::Object),
            other => Err(other),
        }
    }
}

macro_rules! primitive_property {
    ($($ty:ty => $variant:ident, $kind:expr, $name:literal;)*) => {
        $(
            impl PropertyType for $ty {
                fn type_name() -> &'static str {
                    $name
                }

                fn primitive() -> Option<Primitive> {
                    $kind
                }

                fn to_text(&self) -> String {
                    self.to_string()
                }

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn from_value(value: Value) -> Result<Self, Value> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

primitive_property! {
    bool => Bool, Some(Primitive::Bool), "bool";
    char => Char, Some(Primitive::Char), "char";
    i8 => I8, Some(Primitive::I8), "i8";
    i16 => I16, Some(Primitive::I16), "i16";
    i32 => I32, Some(Primitive::I32), "i32";
    i64 => I64, Some(Primitive::I64), "i64";
    u8 => U8, Some(Primitive::U8), "u8";
    u16 => U16, Some(Primitive::U16), "u16";
    u32 => U32, Some(Primitive::U32), "u32";
    u64 => U64, Some(Primitive::U64), "u64";
    f32 => F32, Some(Primitive::F32), "f32";
    f64 => F64, Some(Primitive::F64), "f64";
    String => String, None, "String";
}

type ConstructFn = dyn Fn(Value) -> Result<Value, CoercionError> + Send + Sync;

/// A single-argument constructor of some property type.
///
/// Coercion invokes it when the argument's runtime type matches
/// [`param_type_id`](Constructor::param_type_id) exactly.
#[derive(Clone)]
pub struct Constructor {
    param: TypeId,
    param_name: &'static str,
    build: Arc<ConstructFn>,
}

impl Constructor {
    pub fn new<A, T, F>(f: F) -> Self
    where
        A: PropertyType,
        T: PropertyType,
        F: Fn(A) -> Result<T, String> + Send + Sync + 'static,
    {
        let build = move |value: Value| {
            let arg = A::from_value(value).map_err(|v| CoercionError::ArgumentMismatch {
                expected: A::type_name(),
                found: v.type_name(),
            })?;
            f(arg)
                .map(PropertyType::into_value)
                .map_err(|reason| CoercionError::Constructor {
                    target: T::type_name(),
                    reason,
                })
        };
        Self {
            param: TypeId::of::<A>(),
            param_name: A::type_name(),
            build: Arc::new(build),
        }
    }

    /// Constructor backed by an infallible `From` conversion.
    pub fn from_into<A, T>() -> Self
    where
        A: PropertyType,
        T: PropertyType + From<A>,
    {
        Self::new(|a: A| Ok(T::from(a)))
    }

    /// Constructor backed by `TryFrom`; the error's `Display` becomes the reason.
    pub fn try_from<A, T>() -> Self
    where
        A: PropertyType,
        T: PropertyType + TryFrom<A>,
        <T as TryFrom<A>>::Error: fmt::Display,
    {
        Self::new(|a: A| T::try_from(a).map_err(|e| e.to_string()))
    }

    pub fn param_type_id(&self) -> TypeId {
        self.param
    }

    pub fn param_name(&self) -> &'static str {
        self.param_name
    }

    pub fn construct(&self, arg: Value) -> Result<Value, CoercionError> {
        (self.build)(arg)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("param", &self.param_name)
            .finish_non_exhaustive()
    }
}

/// Runtime description of a property's declared type.
#[derive(Clone)]
pub struct TypeDescriptor {
    name: &'static str,
    id: TypeId,
    primitive: Option<Primitive>,
    constructors: Arc<[Constructor]>,
}

impl TypeDescriptor {
    pub fn of<T: PropertyType>() -> Self {
        Self {
            name: T::type_name(),
            id: TypeId::of::<T>(),
            primitive: T::primitive(),
            constructors: T::constructors().into(),
        }
    }

    /// Adds a constructor on top of the ones the type declares itself.
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        let mut all = self.constructors.to_vec();
        all.push(constructor);
        self.constructors = all.into();
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn primitive(&self) -> Option<Primitive> {
        self.primitive
    }

    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    /// Finds the constructor taking exactly the given argument type.
    pub fn constructor_for(&self, arg: TypeId) -> Option<&Constructor> {
        self.constructors.iter().find(|c| c.param == arg)
    }

    /// Whether a value can be passed to a mutator of this type as-is.
    pub fn accepts(&self, value: &Value) -> bool {
        value.type_id() == self.id
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("primitive", &self.primitive)
            .field("constructors", &self.constructors.len())
            .finish()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
