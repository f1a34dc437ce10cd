//! Property discovery: turning a target into its property descriptors.
//!
//! The mechanism itself sits behind [`PropertyDiscovery`]. [`discover`] wraps
//! any implementation with the degrade-to-empty policy the map relies on: a
//! target that cannot be introspected simply exposes no properties.

use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::{Bean, IntrospectionError, PropertyDescriptor};

/// Enumerates the properties of a target's concrete runtime type.
pub trait PropertyDiscovery: Send + Sync {
    fn discover(&self, target: &dyn Bean) -> Result<Vec<PropertyDescriptor>, IntrospectionError>;
}

/// Asks the target to describe itself through [`Bean::describe`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfDescribing;

impl PropertyDiscovery for SelfDescribing {
    fn discover(&self, target: &dyn Bean) -> Result<Vec<PropertyDescriptor>, IntrospectionError> {
        target.describe()
    }
}

/// Memoises the descriptors of each concrete type after the first discovery.
///
/// Failed discoveries are not cached, so a later attempt may succeed.
pub struct CachingDiscovery<D> {
    inner: D,
    cache: Mutex<HashMap<TypeId, Arc<[PropertyDescriptor]>>>,
}

impl<D: PropertyDiscovery> CachingDiscovery<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of concrete types currently cached.
    pub fn cached_types(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn flush(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }
}

impl Default for CachingDiscovery<SelfDescribing> {
    fn default() -> Self {
        Self::new(SelfDescribing)
    }
}

impl<D: PropertyDiscovery> PropertyDiscovery for CachingDiscovery<D> {
    fn discover(&self, target: &dyn Bean) -> Result<Vec<PropertyDescriptor>, IntrospectionError> {
        let key = target.as_any().type_id();
        if let Some(hit) = self.cache.lock().ok().and_then(|c| c.get(&key).cloned()) {
            return Ok(hit.to_vec());
        }
        let descriptors = self.inner.discover(target)?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, descriptors.as_slice().into());
        }
        Ok(descriptors)
    }
}

/// Discovers the properties of `target`, never failing.
///
/// An absent target yields no descriptors; a discovery error is logged and
/// also yields none.
pub fn discover(target: Option<&dyn Bean>, discovery: &dyn PropertyDiscovery) -> Vec<PropertyDescriptor> {
    let Some(target) = target else {
        return Vec::new();
    };
    match discovery.discover(target) {
        Ok(descriptors) => descriptors,
        Err(e) => {
            tracing::warn!(bean_type = target.type_name(), error = %e, "Property discovery failed");
            Vec::new()
        }
    }
}
