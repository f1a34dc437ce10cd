use std::{
    any::Any,
    collections::BTreeMap,
    fmt,
    panic::{AssertUnwindSafe, catch_unwind},
};

use crate::{
    AccessError, Bean, Config, Error, NoopListener, PropertyChangeListener, Result,
    TypeDescriptor, Value, coercion, discovery, table::DescriptorTable,
};

/// Map view over the properties of a target object.
///
/// Keys are the names of the target's readable properties, values are
/// whatever their read accessors return. The set of keys is fixed by the
/// target's type: entries can be read and written but never added or
/// removed.
///
/// Reads and writes follow two different failure policies:
///
/// - reads never fail. An unknown name, an absent target or an accessor
///   that errors or panics all yield `None` (the last two are logged);
/// - writes always report failure. Unknown or read-only names, values that
///   cannot be coerced and failing mutators are returned as [`Error`]s.
///
/// # Example
///
/// ```rust
/// use beanmap::{Bean, BeanMap, Value};
///
/// #[derive(Default, Bean)]
/// struct Server {
///     host: String,
///     port: u16,
/// }
///
/// let mut map = BeanMap::for_bean(Server::default());
/// map.put("host", "localhost")?;
/// map.put("port", "8080")?;           // parsed into a u16
///
/// assert_eq!(map.get("port"), Some(Value::U16(8080)));
/// assert_eq!(map.keys().collect::<Vec<_>>(), ["host", "port"]);
/// assert!(map.put("missing", 1).is_err());
/// # Ok::<(), beanmap::Error>(())
/// ```
pub struct BeanMap<L = NoopListener> {
    pub(crate) bean: Option<Box<dyn Bean>>,
    pub(crate) table: DescriptorTable,
    pub(crate) config: Config,
    pub(crate) listener: L,
}

impl BeanMap {
    /// An empty map without a target.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// A map bound to `bean` with the default configuration.
    pub fn for_bean<B: Bean>(bean: B) -> Self {
        Self::builder().bean(bean).build()
    }

    pub fn builder() -> BeanMapBuilder {
        BeanMapBuilder::default()
    }
}

impl Default for BeanMap {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: PropertyChangeListener> BeanMap<L> {
    pub(crate) fn from_parts(bean: Option<Box<dyn Bean>>, config: Config, listener: L) -> Self {
        let mut map = Self {
            bean,
            table: DescriptorTable::default(),
            config,
            listener,
        };
        map.reinitialise();
        map
    }

    /// Rebuilds the descriptor table for the current target.
    pub(crate) fn reinitialise(&mut self) {
        let descriptors = discovery::discover(self.bean.as_deref(), self.config.discovery.as_ref());
        self.table.rebuild(descriptors);
        tracing::debug!(
            bean_type = self.bean.as_deref().map(|b| b.type_name()),
            properties = self.table.len(),
            "Bean bound"
        );
    }

    pub fn bean(&self) -> Option<&dyn Bean> {
        self.bean.as_deref()
    }

    /// Mutable access to the target.
    ///
    /// Changes made this way bypass the change listener.
    pub fn bean_mut(&mut self) -> Option<&mut dyn Bean> {
        self.bean.as_deref_mut()
    }

    pub fn downcast_bean<T: Bean>(&self) -> Option<&T> {
        self.bean().and_then(|b| b.downcast_ref::<T>())
    }

    pub fn downcast_bean_mut<T: Bean>(&mut self) -> Option<&mut T> {
        self.bean_mut().and_then(|b| b.downcast_mut::<T>())
    }

    /// Redirects the map to another target (or none) and rediscovers its
    /// properties. Returns the previous target.
    pub fn set_bean(&mut self, bean: Option<Box<dyn Bean>>) -> Option<Box<dyn Bean>> {
        let previous = std::mem::replace(&mut self.bean, bean);
        self.reinitialise();
        previous
    }

    /// Shorthand for [`set_bean`](Self::set_bean) with a concrete target.
    pub fn bind<B: Bean>(&mut self, bean: B) -> Option<Box<dyn Bean>> {
        self.set_bean(Some(Box::new(bean)))
    }

    pub fn into_bean(self) -> Option<Box<dyn Bean>> {
        self.bean
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Number of readable properties.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.table.contains(name)
    }

    /// Whether any readable property currently holds `value`.
    pub fn contains_value(&self, value: &Value) -> bool {
        self.value_iter().any(|v| v.as_ref() == Some(value))
    }

    pub fn is_readable(&self, name: &str) -> bool {
        self.table.contains(name)
    }

    /// Whether `put(name, ..)` can succeed, including write-only properties.
    pub fn is_writable(&self, name: &str) -> bool {
        self.table.writable(name).is_some()
    }

    /// Declared type of property `name`, readable or not.
    pub fn property_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.table.declared_type(name)
    }

    /// Reads property `name`.
    ///
    /// Returns `None` when there is no target, no readable property of that
    /// name, or when the accessor fails.
    pub fn get(&self, name: &str) -> Option<Value> {
        let bean = self.bean.as_deref()?;
        let read = self.table.readable(name)?.reader()?;
        match invoke(|| read(bean)) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(bean_type = bean.type_name(), property = name, error = %e, "Failed to read property");
                None
            }
        }
    }

    /// Writes property `name`, coercing `value` to its declared type first.
    ///
    /// Returns the value read before the write. Without a target this is a
    /// no-op returning `Ok(None)`.
    pub fn put(&mut self, name: &str, value: impl Into<Value>) -> Result<Option<Value>> {
        let value = value.into();
        let Some(bean_type) = self.bean.as_deref().map(|b| b.type_name()) else {
            return Ok(None);
        };
        let old = self.get(name);

        let Some((ty, write)) = self
            .table
            .writable(name)
            .and_then(|d| Some((d.declared_type().clone(), d.writer()?.clone())))
        else {
            return Err(self.missing_writer(bean_type, name));
        };

        let arg = coercion::coerce(&ty, value, &self.config.transformers).map_err(|source| {
            tracing::info!(bean_type, property = name, error = %source, "Value conversion failed");
            Error::Conversion {
                name: name.to_owned(),
                source,
            }
        })?;

        if let Some(bean) = self.bean.as_deref_mut() {
            invoke(|| write(bean, arg)).map_err(|source| {
                tracing::info!(bean_type, property = name, error = %source, "Failed to write property");
                Error::Invocation {
                    name: name.to_owned(),
                    source,
                }
            })?;
        }

        let new = self.get(name);
        self.listener.on_property_change(name, old.as_ref(), new.as_ref());
        Ok(old)
    }

    /// Writes every pair in order, stopping at the first failure.
    pub fn put_all<I, K, V>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (name, value) in entries {
            self.put(name.as_ref(), value)?;
        }
        Ok(())
    }

    /// Always fails: the key set is fixed by the target's type.
    pub fn remove(&mut self, name: &str) -> Result<Option<Value>> {
        let _n = name;
        Err(Error::unsupported("remove() not supported for BeanMap"))
    }

    /// Snapshot of every readable property that currently has a value.
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        self.entry_iter()
            .filter_map(|e| {
                let (key, value) = e.into_parts();
                value.map(|v| (key.to_string(), v))
            })
            .collect()
    }

    fn missing_writer(&self, bean_type: &'static str, name: &str) -> Error {
        let name = name.to_owned();
        if self.table.contains(&name) {
            Error::ReadOnlyProperty { bean_type, name }
        } else {
            Error::PropertyNotFound { bean_type, name }
        }
    }
}

impl<L: PropertyChangeListener> fmt::Debug for BeanMap<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entry_iter().map(|e| e.into_parts()))
            .finish()
    }
}

/// Runs an accessor, turning a panic into an [`AccessError`].
fn invoke<T>(f: impl FnOnce() -> std::result::Result<T, AccessError>) -> std::result::Result<T, AccessError> {
    catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Err(AccessError::Panicked(panic_message(payload.as_ref()).into())))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

/// Builder for a [`BeanMap`] with a custom configuration or listener.
pub struct BeanMapBuilder<L = NoopListener> {
    bean: Option<Box<dyn Bean>>,
    config: Config,
    listener: L,
}

impl Default for BeanMapBuilder {
    fn default() -> Self {
        Self {
            bean: None,
            config: Config::default(),
            listener: NoopListener,
        }
    }
}

impl<L: PropertyChangeListener> BeanMapBuilder<L> {
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn bean<B: Bean>(mut self, bean: B) -> Self {
        self.bean = Some(Box::new(bean));
        self
    }

    pub fn boxed_bean(mut self, bean: Option<Box<dyn Bean>>) -> Self {
        self.bean = bean;
        self
    }

    pub fn listener<M: PropertyChangeListener>(self, listener: M) -> BeanMapBuilder<M> {
        BeanMapBuilder {
            bean: self.bean,
            config: self.config,
            listener,
        }
    }

    pub fn build(self) -> BeanMap<L> {
        BeanMap::from_parts(self.bean, self.config, self.listener)
    }
}
