//! Primitive transformers used as the textual fallback of coercion.
//!
//! A [`TransformerRegistry`] is assembled once, wrapped in an `Arc` and only
//! read afterwards. The process-wide instance returned by
//! [`default_transformers`] is seeded with one entry per [`Primitive`].

use std::{
    collections::HashMap,
    fmt,
    str::FromStr,
    sync::{Arc, LazyLock},
};

use crate::{CoercionError, Primitive, Value};

/// Parses the textual form of a value into a primitive kind.
pub type Transformer = fn(&str) -> Result<Value, CoercionError>;

static DEFAULT_TRANSFORMERS: LazyLock<Arc<TransformerRegistry>> =
    LazyLock::new(|| Arc::new(TransformerRegistry::default()));

/// The process-wide registry with the standard primitive transformers.
pub fn default_transformers() -> Arc<TransformerRegistry> {
    DEFAULT_TRANSFORMERS.clone()
}

/// Immutable table of primitive kind to [`Transformer`].
#[derive(Clone)]
pub struct TransformerRegistry {
    transformers: HashMap<Primitive, Transformer>,
}

impl TransformerRegistry {
    /// A registry without any entries; coercion then never parses text.
    pub fn empty() -> Self {
        Self {
            transformers: HashMap::new(),
        }
    }

    /// Registers (or replaces) the transformer for `kind`.
    ///
    /// Consumes the registry so entries can only be added while it is being
    /// assembled, before it is shared.
    pub fn with(mut self, kind: Primitive, transformer: Transformer) -> Self {
        self.transformers.insert(kind, transformer);
        self
    }

    pub fn get(&self, kind: Primitive) -> Option<Transformer> {
        self.transformers.get(&kind).copied()
    }

    pub fn contains(&self, kind: Primitive) -> bool {
        self.transformers.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    /// Runs the transformer for `kind`, or returns `None` if there is none.
    pub fn transform(&self, kind: Primitive, text: &str) -> Option<Result<Value, CoercionError>> {
        self.get(kind).map(|t| t(text))
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Primitive::ALL
            .into_iter()
            .fold(Self::empty(), |registry, kind| {
                registry.with(kind, standard_transformer(kind))
            })
    }
}

impl fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.transformers.keys().collect();
        kinds.sort();
        f.debug_struct("TransformerRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

fn standard_transformer(kind: Primitive) -> Transformer {
    match kind {
        Primitive::Bool => parse_bool,
        Primitive::Char => parse_char,
        Primitive::I8 => |s| parse_number::<i8>(Primitive::I8, s),
        Primitive::I16 => |s| parse_number::<i16>(Primitive::I16, s),
        Primitive::I32 => |s| parse_number::<i32>(Primitive::I32, s),
        Primitive::I64 => |s| parse_number::<i64>(Primitive::I64, s),
        Primitive::U8 => |s| parse_number::<u8>(Primitive::U8, s),
        Primitive::U16 => |s| parse_number::<u16>(Primitive::U16, s),
        Primitive::U32 => |s| parse_number::<u32>(Primitive::U32, s),
        Primitive::U64 => |s| parse_number::<u64>(Primitive::U64, s),
        Primitive::F32 => |s| parse_number::<f32>(Primitive::F32, s.trim()),
        Primitive::F64 => |s| parse_number::<f64>(Primitive::F64, s.trim()),
    }
}

// Anything but a case-insensitive "true" reads as false.
fn parse_bool(text: &str) -> Result<Value, CoercionError> {
    Ok(Value::Bool(text.eq_ignore_ascii_case("true")))
}

fn parse_char(text: &str) -> Result<Value, CoercionError> {
    text.chars()
        .next()
        .map(Value::Char)
        .ok_or_else(|| CoercionError::Parse {
            kind: Primitive::Char,
            text: text.to_owned(),
            reason: "empty string".into(),
        })
}

fn parse_number<T>(kind: Primitive, text: &str) -> Result<Value, CoercionError>
where
    T: FromStr + Into<Value>,
    T::Err: fmt::Display,
{
    text.parse::<T>()
        .map(Into::into)
        .map_err(|e| CoercionError::Parse {
            kind,
            text: text.to_owned(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_covers_every_primitive() {
        let registry = TransformerRegistry::default();
        assert_eq!(registry.len(), Primitive::ALL.len());
        assert!(Primitive::ALL.iter().all(|k| registry.contains(*k)));
    }

    #[test]
    fn test_process_wide_registry_is_shared() {
        let a = default_transformers();
        let b = default_transformers();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_bool_is_lenient() {
        let r = TransformerRegistry::default();
        assert_eq!(r.transform(Primitive::Bool, "TRUE"), Some(Ok(Value::Bool(true))));
        assert_eq!(r.transform(Primitive::Bool, "yes"), Some(Ok(Value::Bool(false))));
    }

    #[test]
    fn test_char_takes_first_character() {
        let r = TransformerRegistry::default();
        assert_eq!(r.transform(Primitive::Char, "xyz"), Some(Ok(Value::Char('x'))));
        assert!(matches!(
            r.transform(Primitive::Char, ""),
            Some(Err(CoercionError::Parse { kind: Primitive::Char, .. }))
        ));
    }

    #[test]
    fn test_numbers() {
        let r = TransformerRegistry::default();
        assert_eq!(r.transform(Primitive::I16, "-12"), Some(Ok(Value::I16(-12))));
        assert_eq!(r.transform(Primitive::U64, "+7"), Some(Ok(Value::U64(7))));
        assert_eq!(r.transform(Primitive::F64, " 2.5 "), Some(Ok(Value::F64(2.5))));
        assert!(matches!(
            r.transform(Primitive::I8, "300"),
            Some(Err(CoercionError::Parse { kind: Primitive::I8, .. }))
        ));
        assert!(matches!(
            r.transform(Primitive::I32, " 1"),
            Some(Err(CoercionError::Parse { .. }))
        ));
    }

    #[test]
    fn test_empty_registry_and_override() {
        let r = TransformerRegistry::empty();
        assert!(r.is_empty());
        assert_eq!(r.transform(Primitive::I32, "1"), None);

        let r = TransformerRegistry::default().with(Primitive::Bool, |s| Ok(Value::Bool(s == "y")));
        assert_eq!(r.transform(Primitive::Bool, "y"), Some(Ok(Value::Bool(true))));
    }
}
