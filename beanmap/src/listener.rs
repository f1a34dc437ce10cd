use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::Value;

/// Observer of successful writes through a [`BeanMap`](crate::BeanMap).
///
/// Called exactly once per successful `put`, after the mutator ran and the
/// property was read back. Never called for failed writes, for `clear()`
/// or while binding a target.
pub trait PropertyChangeListener {
    fn on_property_change(&mut self, name: &str, old: Option<&Value>, new: Option<&Value>) {
        let _n = name;
        let _o = old;
        let _v = new;
    }
}

/// Listener that ignores every change.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl PropertyChangeListener for NoopListener {}

/// One recorded property change.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChange {
    pub name: String,
    pub old: Option<Value>,
    pub new: Option<Value>,
}

/// Listener recording every change into a buffer shared between clones.
///
/// ```rust
/// use beanmap::{BeanMap, ChangeLog};
/// # use beanmap::Bean;
/// # #[derive(Default, Bean)]
/// # struct Door { open: bool }
///
/// let log = ChangeLog::default();
/// let mut map = BeanMap::builder().listener(log.clone()).bean(Door::default()).build();
/// map.put("open", true)?;
/// assert_eq!(log.changes()[0].name, "open");
/// # Ok::<(), beanmap::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    changes: Arc<Mutex<Vec<PropertyChange>>>,
}

impl ChangeLog {
    pub fn changes(&self) -> Vec<PropertyChange> {
        self.buffer().clone()
    }

    pub fn len(&self) -> usize {
        self.buffer().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&self) -> Vec<PropertyChange> {
        std::mem::take(&mut *self.buffer())
    }

    fn buffer(&self) -> MutexGuard<'_, Vec<PropertyChange>> {
        self.changes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PropertyChangeListener for ChangeLog {
    fn on_property_change(&mut self, name: &str, old: Option<&Value>, new: Option<&Value>) {
        self.buffer().push(PropertyChange {
            name: name.to_owned(),
            old: old.cloned(),
            new: new.cloned(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_log_is_shared_between_clones() {
        let log = ChangeLog::default();
        let mut writer = log.clone();
        writer.on_property_change("a", None, Some(&Value::I32(1)));
        writer.on_property_change("a", Some(&Value::I32(1)), Some(&Value::I32(2)));

        assert_eq!(log.len(), 2);
        assert_eq!(
            log.changes()[1],
            PropertyChange {
                name: "a".into(),
                old: Some(Value::I32(1)),
                new: Some(Value::I32(2)),
            }
        );
        assert_eq!(log.drain().len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn test_change_log_records_from_another_thread() {
        let log = ChangeLog::default();
        let mut writer = log.clone();
        std::thread::spawn(move || {
            writer.on_property_change("remote", None, Some(&Value::Bool(true)));
        })
        .join()
        .unwrap();
        assert_eq!(log.changes()[0].name, "remote");
    }

    #[test]
    fn test_change_log_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ChangeLog>();
        assert_send_sync::<PropertyChange>();
    }

    #[test]
    fn test_noop_listener_accepts_anything() {
        NoopListener.on_property_change("x", None, None);
    }
}
