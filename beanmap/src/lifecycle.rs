use crate::{AccessError, BeanMap, Error, PropertyChangeListener, Result};

impl<L: PropertyChangeListener> BeanMap<L> {
    /// Replaces the target with a freshly constructed default instance of
    /// its concrete type.
    ///
    /// This does not remove any mapping: the keys are fixed by the type.
    /// Without a target this is a no-op. If the type cannot be constructed
    /// the previous target stays bound and an
    /// [`UnsupportedMutation`](Error::UnsupportedMutation) is returned.
    pub fn clear(&mut self) -> Result<()> {
        let Some(bean) = self.bean.as_deref() else {
            return Ok(());
        };
        let fresh = bean.new_instance().map_err(|e| {
            Error::unsupported(format!(
                "Could not create new instance of {}: {e}",
                bean.type_name()
            ))
        })?;
        tracing::debug!(bean_type = fresh.type_name(), "Bean reset to default instance");
        self.set_bean(Some(fresh));
        Ok(())
    }

    /// Copies every property readable in `other` and writable here.
    ///
    /// Names missing or read-only on this side are skipped, and so are
    /// properties `other` fails to read (logged at debug). The first
    /// failing write aborts.
    pub fn put_all_writeable<M: PropertyChangeListener>(&mut self, other: &BeanMap<M>) -> Result<()> {
        self.copy_writeable(other, false)
    }

    /// With `strict`, a property `other` fails to read is an error instead
    /// of being skipped.
    fn copy_writeable<M: PropertyChangeListener>(&mut self, other: &BeanMap<M>, strict: bool) -> Result<()> {
        for key in other.keys() {
            if !self.is_writable(key) {
                continue;
            }
            match other.get(key) {
                Some(value) => {
                    self.put(key, value)?;
                }
                None if strict => {
                    return Err(Error::Invocation {
                        name: key.to_owned(),
                        source: AccessError::failed("property could not be read from the source"),
                    });
                }
                None => tracing::debug!(property = key, "No value to copy"),
            }
        }
        Ok(())
    }

    /// Builds an independent map over a new default instance of the
    /// target's type, with every readable and writable property copied.
    ///
    /// Any failure (construction, reading a property from this map or
    /// writing it into the copy) is reported as
    /// [`CloneFailure`](Error::CloneFailure) wrapping the cause.
    pub fn try_clone(&self) -> Result<Self>
    where
        L: Clone,
    {
        let Some(bean) = self.bean.as_deref() else {
            return Ok(BeanMap::from_parts(None, self.config.clone(), self.listener.clone()));
        };
        let fresh = bean
            .new_instance()
            .map_err(|e| Error::CloneFailure(Box::new(e.into())))?;

        let mut copy = BeanMap::from_parts(Some(fresh), self.config.clone(), self.listener.clone());
        copy.copy_writeable(self, true)
            .map_err(|e| Error::CloneFailure(Box::new(e)))?;
        Ok(copy)
    }
}
