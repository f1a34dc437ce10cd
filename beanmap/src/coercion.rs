//! Best-effort conversion of a written value into a property's declared type.
//!
//! The strategy is deliberately narrow:
//!
//! 1. a single-argument constructor of the required type taking exactly the
//!    value's runtime type;
//! 2. for primitive kinds, parse the value's textual form with the
//!    registered transformer;
//! 3. otherwise hand the value back untouched and let the mutator reject it.

use crate::{CoercionError, TransformerRegistry, TypeDescriptor, Value};

/// Converts `value` so it can be passed to a mutator of type `required`.
///
/// Values already assignable to `required` are returned unchanged.
pub fn coerce(
    required: &TypeDescriptor,
    value: Value,
    transformers: &TransformerRegistry,
) -> Result<Value, CoercionError> {
    if required.accepts(&value) {
        return Ok(value);
    }

    if let Some(ctor) = required.constructor_for(value.type_id()) {
        tracing::trace!(target_type = required.name(), arg = value.type_name(), "Coercing with constructor");
        return ctor.construct(value);
    }

    if let Some(transformer) = required.primitive().and_then(|kind| transformers.get(kind)) {
        tracing::trace!(target_type = required.name(), from = value.type_name(), "Coercing via text");
        return transformer(&value.to_text());
    }

    Ok(value)
}
