use std::{collections::BTreeMap, sync::Arc};

use crate::{PropertyDescriptor, TypeDescriptor};

/// Index from property name to descriptor for the currently bound target.
///
/// Keys of `readable` are exactly the readable property names. Write-only
/// properties live in `write_only` so they can still be written without
/// showing up as map keys.
#[derive(Default, Clone)]
pub(crate) struct DescriptorTable {
    readable: BTreeMap<Arc<str>, PropertyDescriptor>,
    write_only: BTreeMap<Arc<str>, PropertyDescriptor>,
}

impl DescriptorTable {
    #[cfg(test)]
    pub(crate) fn from_descriptors(descriptors: Vec<PropertyDescriptor>) -> Self {
        let mut table = Self::default();
        table.rebuild(descriptors);
        table
    }

    /// Replaces the whole content of the table.
    pub(crate) fn rebuild(&mut self, descriptors: Vec<PropertyDescriptor>) {
        self.readable.clear();
        self.write_only.clear();
        for descriptor in descriptors {
            if !descriptor.is_readable() && !descriptor.is_writable() {
                continue;
            }
            let name = descriptor.shared_name().clone();
            let replaced = if descriptor.is_readable() {
                self.write_only.remove(&name);
                self.readable.insert(name, descriptor)
            } else {
                self.readable.remove(&name);
                self.write_only.insert(name, descriptor)
            };
            if let Some(previous) = replaced {
                tracing::warn!(property = previous.name(), "Duplicate property descriptor, keeping the last one");
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.readable.len()
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.readable.contains_key(name)
    }

    pub(crate) fn readable(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.readable.get(name)
    }

    /// Any descriptor for `name`, readable or not.
    pub(crate) fn descriptor(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.readable.get(name).or_else(|| self.write_only.get(name))
    }

    pub(crate) fn writable(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.descriptor(name).filter(|d| d.is_writable())
    }

    pub(crate) fn declared_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.descriptor(name).map(PropertyDescriptor::declared_type)
    }

    pub(crate) fn names(&self) -> std::collections::btree_map::Keys<'_, Arc<str>, PropertyDescriptor> {
        self.readable.keys()
    }
}
