use std::{fmt, sync::Arc};

use crate::{PropertyDiscovery, SelfDescribing, TransformerRegistry, default_transformers};

/// Collaborators a [`BeanMap`](crate::BeanMap) works with.
///
/// Use the builder methods to customise, or [`Default`] for the
/// process-wide transformer registry and self-describing discovery.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use beanmap::{CachingDiscovery, Config, Primitive, TransformerRegistry, Value};
///
/// let transformers = TransformerRegistry::default()
///     .with(Primitive::Bool, |s| Ok(Value::Bool(matches!(s, "yes" | "true"))));
///
/// let config = Config::default()
///     .with_transformers(Arc::new(transformers))     // Accept "yes" for booleans
///     .with_discovery(CachingDiscovery::default());  // Introspect each type once
/// ```
#[derive(Clone)]
pub struct Config {
    /// Primitive parsers used by the textual coercion fallback.
    /// Shared read-only; defaults to [`default_transformers`].
    pub transformers: Arc<TransformerRegistry>,

    /// Mechanism enumerating a target's properties whenever a target is bound.
    /// Default: [`SelfDescribing`].
    pub discovery: Arc<dyn PropertyDiscovery>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            transformers: default_transformers(),
            discovery: Arc::new(SelfDescribing),
        }
    }
}

impl Config {
    /// Set the transformer registry used for textual coercion.
    pub fn with_transformers(mut self, transformers: Arc<TransformerRegistry>) -> Self {
        self.transformers = transformers;
        self
    }

    /// Set the property discovery mechanism.
    ///
    /// Discovery runs on every target binding, so an expensive mechanism
    /// benefits from being wrapped in [`CachingDiscovery`](crate::CachingDiscovery).
    pub fn with_discovery(mut self, discovery: impl PropertyDiscovery + 'static) -> Self {
        self.discovery = Arc::new(discovery);
        self
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("transformers", &self.transformers)
            .finish_non_exhaustive()
    }
}
