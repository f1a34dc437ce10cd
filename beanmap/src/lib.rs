//! BeanMap - map view over an object's properties
//!
//! Exposes the named properties of an arbitrary object as a string-keyed map
//! discovered at runtime: read and write them by name, iterate over them,
//! reset the object to its defaults or copy it property by property.
//!
//! Properties are described by [`PropertyDescriptor`]s, usually generated by
//! `#[derive(Bean)]`. Values written with the wrong type are coerced where
//! possible (single-argument constructors first, then text parsing for
//! primitives).
//!
//! ```rust
//! use beanmap::{Bean, BeanMap, Value};
//!
//! #[derive(Default, Bean)]
//! struct Person {
//!     name: String,
//!     age: u8,
//!     #[bean(read_only)]
//!     id: u64,
//! }
//!
//! let mut map = BeanMap::for_bean(Person { name: "Ada".into(), age: 36, id: 1 });
//! map.put("age", "37")?;
//!
//! assert_eq!(map.get("age"), Some(Value::U8(37)));
//! assert!(map.put("id", 2u64).is_err());
//!
//! let copy = map.try_clone()?;
//! assert_eq!(copy.get("name"), Some(Value::from("Ada")));
//! # Ok::<(), beanmap::Error>(())
//! ```

mod bean;
mod bean_map;
mod coercion;
mod config;
mod descriptor;
mod discovery;
mod error;
mod lifecycle;
mod listener;
mod table;
mod transformer;
mod types;
mod value;
mod views;

pub use bean::{AsAny, Bean};
pub use bean_map::{BeanMap, BeanMapBuilder};
pub use coercion::coerce;
pub use config::Config;
pub use descriptor::{PropertyDescriptor, ReadAccessor, TypedProperty, WriteAccessor};
pub use discovery::{CachingDiscovery, PropertyDiscovery, SelfDescribing, discover};
pub use error::{AccessError, CoercionError, ConstructionError, Error, IntrospectionError};
pub use listener::{ChangeLog, NoopListener, PropertyChange, PropertyChangeListener};
pub use transformer::{Transformer, TransformerRegistry, default_transformers};
pub use types::{Constructor, Primitive, PropertyType, TypeDescriptor};
pub use value::{Object, Value};
pub use views::{Entry, EntryCursor, EntryIter, EntryMut, EntrySet, KeySet, Keys, ValueIter};

#[cfg(feature = "macros")]
pub use beanmap_macros::Bean;

pub type Result<T = ()> = std::result::Result<T, Error>;
