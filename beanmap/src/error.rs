use std::{borrow::Cow, sync::Arc};

use crate::Primitive;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("The bean of type {bean_type} has no property called '{name}'")]
    PropertyNotFound { bean_type: &'static str, name: String },

    #[error("Property '{name}' of bean type {bean_type} is read-only")]
    ReadOnlyProperty { bean_type: &'static str, name: String },

    #[error("Cannot convert value for property '{name}': {source}")]
    Conversion {
        name: String,
        #[source]
        source: CoercionError,
    },

    #[error("Write accessor for property '{name}' failed: {source}")]
    Invocation {
        name: String,
        #[source]
        source: AccessError,
    },

    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error("Unable to clone bean map: {0}")]
    CloneFailure(#[source] Box<Error>),

    #[error("Unsupported operation: {0}")]
    UnsupportedMutation(Cow<'static, str>),
}

impl Error {
    pub(crate) fn unsupported(msg: impl Into<Cow<'static, str>>) -> Self {
        Error::UnsupportedMutation(msg.into())
    }

    /// Whether `put` rejected its name or argument.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Error::PropertyNotFound { .. }
                | Error::ReadOnlyProperty { .. }
                | Error::Conversion { .. }
                | Error::Invocation { .. }
        )
    }
}

/// Failure raised by a property accessor or mutator.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AccessError {
    #[error("accessor expects a target of type {expected}, got {found}")]
    TargetMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("argument of type {found} is not assignable to {expected}")]
    ArgumentMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("accessor panicked: {0}")]
    Panicked(Arc<str>),

    #[error("{0}")]
    Failed(Arc<str>),
}

impl AccessError {
    pub fn failed(msg: impl AsRef<str>) -> Self {
        AccessError::Failed(Arc::from(msg.as_ref()))
    }
}

/// Failure of one of the coercion steps.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoercionError {
    #[error("cannot parse '{text}' as {kind}: {reason}")]
    Parse {
        kind: Primitive,
        text: String,
        reason: String,
    },

    #[error("constructor of {target} failed: {reason}")]
    Constructor { target: &'static str, reason: String },

    #[error("constructor expects {expected}, got {found}")]
    ArgumentMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// The discovery mechanism could not enumerate a target's properties.
#[derive(Debug, Clone, thiserror::Error)]
#[error("cannot introspect {type_name}: {reason}")]
pub struct IntrospectionError {
    pub type_name: &'static str,
    pub reason: Arc<str>,
}

impl IntrospectionError {
    pub fn new(type_name: &'static str, reason: impl AsRef<str>) -> Self {
        Self {
            type_name,
            reason: Arc::from(reason.as_ref()),
        }
    }
}

/// A default instance of the target type could not be created.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unable to instantiate the underlying bean \"{type_name}\": {reason}")]
pub struct ConstructionError {
    pub type_name: &'static str,
    pub reason: Arc<str>,
}

impl ConstructionError {
    pub fn new(type_name: &'static str, reason: impl AsRef<str>) -> Self {
        Self {
            type_name,
            reason: Arc::from(reason.as_ref()),
        }
    }

    /// The type has no zero-argument constructor.
    pub fn no_default(type_name: &'static str) -> Self {
        Self::new(type_name, "no default constructor")
    }
}
