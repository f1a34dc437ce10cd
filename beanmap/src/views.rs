//! Key, value and entry views over a [`BeanMap`].
//!
//! All views read through the descriptor table, so their order is the
//! table's order (property names, sorted). Values are fetched lazily with
//! [`BeanMap::get`] as the views are advanced; only [`BeanMap::values`]
//! takes an eager snapshot.

use std::{collections::btree_map, iter::FusedIterator, sync::Arc};

use crate::{
    BeanMap, Error, PropertyChangeListener, PropertyDescriptor, Result, Value, table::DescriptorTable,
};

impl<L: PropertyChangeListener> BeanMap<L> {
    /// Names of all readable properties.
    pub fn keys(&self) -> Keys<'_> {
        Keys {
            inner: self.table.names(),
        }
    }

    /// Property values in key order, read on demand.
    pub fn value_iter(&self) -> ValueIter<'_, L> {
        ValueIter {
            map: self,
            keys: self.keys(),
        }
    }

    /// Read-only entries in key order, read on demand.
    pub fn entry_iter(&self) -> EntryIter<'_, L> {
        EntryIter {
            map: self,
            keys: self.table.names(),
        }
    }

    /// Snapshot of all values, taken in one pass over the keys.
    pub fn values(&self) -> Box<[Option<Value>]> {
        self.value_iter().collect()
    }

    pub fn key_set(&self) -> KeySet<'_> {
        KeySet { table: &self.table }
    }

    pub fn entry_set(&self) -> EntrySet<'_, L> {
        EntrySet { map: self }
    }

    /// Cursor over entries whose values can be replaced in place.
    ///
    /// ```rust
    /// use beanmap::{Bean, BeanMap, Value};
    ///
    /// #[derive(Default, Bean)]
    /// struct Limits {
    ///     min: i32,
    ///     max: i32,
    /// }
    ///
    /// let mut map = BeanMap::for_bean(Limits::default());
    /// let mut cursor = map.entries_mut();
    /// while let Some(mut entry) = cursor.next_entry() {
    ///     entry.set_value(10)?;
    /// }
    /// assert_eq!(map.get("max"), Some(Value::I32(10)));
    /// # Ok::<(), beanmap::Error>(())
    /// ```
    pub fn entries_mut(&mut self) -> EntryCursor<'_, L> {
        let keys = self.table.names().cloned().collect::<Vec<_>>().into_iter();
        EntryCursor { map: self, keys }
    }
}

/// Iterator over readable property names.
#[derive(Clone)]
pub struct Keys<'a> {
    inner: btree_map::Keys<'a, Arc<str>, PropertyDescriptor>,
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|k| &**k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Keys<'_> {}
impl FusedIterator for Keys<'_> {}

/// Iterator calling [`BeanMap::get`] for each key.
pub struct ValueIter<'a, L> {
    map: &'a BeanMap<L>,
    keys: Keys<'a>,
}

impl<L: PropertyChangeListener> Iterator for ValueIter<'_, L> {
    type Item = Option<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.keys.next().map(|k| self.map.get(k))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<L: PropertyChangeListener> ExactSizeIterator for ValueIter<'_, L> {}

/// Detached key/value pair produced by [`EntryIter`].
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    key: Arc<str>,
    value: Option<Value>,
}

impl Entry {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn into_parts(self) -> (Arc<str>, Option<Value>) {
        (self.key, self.value)
    }
}

pub struct EntryIter<'a, L> {
    map: &'a BeanMap<L>,
    keys: btree_map::Keys<'a, Arc<str>, PropertyDescriptor>,
}

impl<L: PropertyChangeListener> Iterator for EntryIter<'_, L> {
    type Item = Entry;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.keys.next()?;
        Some(Entry {
            key: key.clone(),
            value: self.map.get(key),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<L: PropertyChangeListener> ExactSizeIterator for EntryIter<'_, L> {}

/// Lending cursor handing out [`EntryMut`]s one at a time.
pub struct EntryCursor<'a, L> {
    map: &'a mut BeanMap<L>,
    keys: std::vec::IntoIter<Arc<str>>,
}

impl<L: PropertyChangeListener> EntryCursor<'_, L> {
    pub fn next_entry(&mut self) -> Option<EntryMut<'_, L>> {
        let key = self.keys.next()?;
        let value = self.map.get(&key);
        Some(EntryMut {
            map: &mut *self.map,
            key,
            value,
        })
    }

    /// Number of entries not yet visited.
    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

/// Entry whose value writes through to the owning map.
pub struct EntryMut<'a, L> {
    map: &'a mut BeanMap<L>,
    key: Arc<str>,
    value: Option<Value>,
}

impl<L: PropertyChangeListener> EntryMut<'_, L> {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Value as read when the entry was reached, or after the last `set_value`.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Writes `value` through [`BeanMap::put`] and returns the prior value.
    ///
    /// The cached value becomes whatever the property reads back afterwards,
    /// which may differ from `value` after coercion.
    pub fn set_value(&mut self, value: impl Into<Value>) -> Result<Option<Value>> {
        let old = self.map.put(&self.key, value)?;
        self.value = self.map.get(&self.key);
        Ok(old)
    }

    /// Always fails: entries cannot be removed.
    pub fn remove(self) -> Result<()> {
        Err(Error::unsupported("remove() not supported for BeanMap entries"))
    }
}

/// Unmodifiable set of readable property names.
#[derive(Clone)]
pub struct KeySet<'a> {
    table: &'a DescriptorTable,
}

impl<'a> KeySet<'a> {
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains(name)
    }

    pub fn iter(&self) -> Keys<'a> {
        Keys {
            inner: self.table.names(),
        }
    }

    pub fn insert(&self, name: &str) -> Result<bool> {
        let _n = name;
        Err(Error::unsupported("the key set of a BeanMap is unmodifiable"))
    }

    pub fn remove(&self, name: &str) -> Result<bool> {
        let _n = name;
        Err(Error::unsupported("the key set of a BeanMap is unmodifiable"))
    }
}

impl<'a> IntoIterator for KeySet<'a> {
    type Item = &'a str;
    type IntoIter = Keys<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Unmodifiable, lazily materialised set of entries.
pub struct EntrySet<'a, L> {
    map: &'a BeanMap<L>,
}

impl<'a, L: PropertyChangeListener> EntrySet<'a, L> {
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn contains(&self, key: &str, value: &Value) -> bool {
        self.map.contains_key(key) && self.map.get(key).as_ref() == Some(value)
    }

    pub fn iter(&self) -> EntryIter<'a, L> {
        self.map.entry_iter()
    }

    pub fn insert(&self, entry: Entry) -> Result<bool> {
        let _e = entry;
        Err(Error::unsupported("the entry set of a BeanMap is unmodifiable"))
    }

    pub fn remove(&self, key: &str) -> Result<bool> {
        let _k = key;
        Err(Error::unsupported("remove() not supported from BeanMap entry set"))
    }
}

impl<'a, L: PropertyChangeListener> IntoIterator for EntrySet<'a, L> {
    type Item = Entry;
    type IntoIter = EntryIter<'a, L>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.entry_iter()
    }
}

impl<'a, L: PropertyChangeListener> IntoIterator for &'a BeanMap<L> {
    type Item = Entry;
    type IntoIter = EntryIter<'a, L>;

    fn into_iter(self) -> Self::IntoIter {
        self.entry_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccessError, Bean, ConstructionError, IntrospectionError};

    #[derive(Default)]
    struct Window {
        width: u32,
        height: u32,
        title: String,
    }

    impl Bean for Window {
        fn describe(&self) -> std::result::Result<Vec<PropertyDescriptor>, IntrospectionError> {
            Ok(vec![
                PropertyDescriptor::typed::<Window, u32>("width")
                    .getter(|w| Ok(w.width))
                    .setter(|w, v| {
                        w.width = v;
                        Ok(())
                    })
                    .build(),
                PropertyDescriptor::typed::<Window, u32>("height")
                    .getter(|w| Ok(w.height))
                    .setter(|w, v| {
                        w.height = v;
                        Ok(())
                    })
                    .build(),
                PropertyDescriptor::typed::<Window, String>("title")
                    .getter(|w| {
                        if w.title.is_empty() {
                            Err(AccessError::failed("untitled"))
                        } else {
                            Ok(w.title.clone())
                        }
                    })
                    .build(),
            ])
        }

        fn new_instance(&self) -> std::result::Result<Box<dyn Bean>, ConstructionError> {
            Ok(Box::new(Window::default()))
        }
    }

    fn window() -> BeanMap {
        BeanMap::for_bean(Window {
            width: 640,
            height: 480,
            title: "main".into(),
        })
    }

    #[test]
    fn test_keys_are_sorted_and_exact_size() {
        let map = window();
        let keys = map.keys();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys.collect::<Vec<_>>(), ["height", "title", "width"]);
    }

    #[test]
    fn test_values_snapshot() {
        let mut map = window();
        let before = map.values();
        map.put("width", 800u32).unwrap();
        assert_eq!(
            &*before,
            [
                Some(Value::U32(480)),
                Some(Value::from("main")),
                Some(Value::U32(640))
            ]
        );
        assert_eq!(map.values()[2], Some(Value::U32(800)));
    }

    #[test]
    fn test_value_iter_reports_failed_reads_as_none() {
        let mut map = window();
        map.downcast_bean_mut::<Window>().unwrap().title.clear();
        let values: Vec<_> = map.value_iter().collect();
        assert_eq!(values[1], None);
    }

    #[test]
    fn test_entry_iter() {
        let map = window();
        let entries: Vec<_> = map.entry_iter().collect();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].key(), "height");
        assert_eq!(entries[0].value(), Some(&Value::U32(480)));
        assert_eq!((&map).into_iter().count(), 3);
    }

    #[test]
    fn test_key_set_is_unmodifiable() {
        let map = window();
        let keys = map.key_set();
        assert_eq!(keys.len(), 3);
        assert!(keys.contains("width"));
        assert!(!keys.contains("depth"));
        assert!(matches!(keys.insert("depth"), Err(Error::UnsupportedMutation(_))));
        assert!(matches!(keys.remove("width"), Err(Error::UnsupportedMutation(_))));
        assert_eq!(keys.into_iter().count(), 3);
    }

    #[test]
    fn test_key_set_follows_rebinding() {
        let mut map = window();
        assert!(map.key_set().contains("title"));
        map.set_bean(None);
        let keys = map.key_set();
        assert!(!keys.contains("title"));
        assert!(keys.is_empty());
    }

    #[test]
    fn test_entry_set_is_unmodifiable() {
        let map = window();
        let entries = map.entry_set();
        assert_eq!(entries.len(), 3);
        assert!(entries.contains("width", &Value::U32(640)));
        assert!(!entries.contains("width", &Value::U32(1)));
        assert!(matches!(entries.remove("width"), Err(Error::UnsupportedMutation(_))));
        let first = entries.iter().next().unwrap();
        assert!(matches!(entries.insert(first), Err(Error::UnsupportedMutation(_))));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_entry_set_value_writes_through() {
        let mut map = window();
        let mut cursor = map.entries_mut();
        assert_eq!(cursor.remaining(), 3);

        let mut height = cursor.next_entry().unwrap();
        assert_eq!(height.key(), "height");
        assert_eq!(height.set_value("600").unwrap(), Some(Value::U32(480)));
        // cached value is the coerced read-back
        assert_eq!(height.value(), Some(&Value::U32(600)));

        let title = cursor.next_entry().unwrap();
        assert!(matches!(title.remove(), Err(Error::UnsupportedMutation(_))));

        let mut width = cursor.next_entry().unwrap();
        assert!(width.set_value("wide").is_err());
        assert_eq!(width.value(), Some(&Value::U32(640)));
        assert!(cursor.next_entry().is_none());

        assert_eq!(map.get("height"), Some(Value::U32(600)));
        assert_eq!(map.len(), 3);
    }
}
