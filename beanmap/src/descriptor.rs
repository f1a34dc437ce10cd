use std::{fmt, marker::PhantomData, sync::Arc};

use crate::{AccessError, Bean, PropertyType, TypeDescriptor, Value};

/// Reads a property from a target.
pub type ReadAccessor = Arc<dyn Fn(&dyn Bean) -> Result<Value, AccessError> + Send + Sync>;

/// Writes an already coerced value into a target.
pub type WriteAccessor = Arc<dyn Fn(&mut dyn Bean, Value) -> Result<(), AccessError> + Send + Sync>;

/// Discovered metadata for one named property.
///
/// A descriptor without a reader is never listed as a map key; one without a
/// writer is read-only.
#[derive(Clone)]
pub struct PropertyDescriptor {
    name: Arc<str>,
    ty: TypeDescriptor,
    read: Option<ReadAccessor>,
    write: Option<WriteAccessor>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<Arc<str>>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            read: None,
            write: None,
        }
    }

    /// Starts a typed descriptor for a property of type `T` on bean `B`.
    pub fn typed<B: Bean, T: PropertyType>(name: impl Into<Arc<str>>) -> TypedProperty<B, T> {
        TypedProperty {
            descriptor: Self::new(name, TypeDescriptor::of::<T>()),
            _marker: PhantomData,
        }
    }

    pub fn with_reader<F>(mut self, f: F) -> Self
    where
        F: Fn(&dyn Bean) -> Result<Value, AccessError> + Send + Sync + 'static,
    {
        self.read = Some(Arc::new(f));
        self
    }

    pub fn with_writer<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut dyn Bean, Value) -> Result<(), AccessError> + Send + Sync + 'static,
    {
        self.write = Some(Arc::new(f));
        self
    }

    /// Replaces the declared type, e.g. to attach extra constructors.
    pub fn with_type(mut self, ty: TypeDescriptor) -> Self {
        self.ty = ty;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> &Arc<str> {
        &self.name
    }

    pub fn declared_type(&self) -> &TypeDescriptor {
        &self.ty
    }

    pub fn reader(&self) -> Option<&ReadAccessor> {
        self.read.as_ref()
    }

    pub fn writer(&self) -> Option<&WriteAccessor> {
        self.write.as_ref()
    }

    pub fn is_readable(&self) -> bool {
        self.read.is_some()
    }

    pub fn is_writable(&self) -> bool {
        self.write.is_some()
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("type", &self.ty.name())
            .field("readable", &self.is_readable())
            .field("writable", &self.is_writable())
            .finish()
    }
}

/// Builder wrapping typed closures into [`ReadAccessor`]/[`WriteAccessor`].
///
/// The generated accessors downcast the target to `B` and convert between
/// `T` and [`Value`], so the closures never see erased types.
pub struct TypedProperty<B, T> {
    descriptor: PropertyDescriptor,
    _marker: PhantomData<fn(B) -> T>,
}

impl<B: Bean, T: PropertyType> TypedProperty<B, T> {
    pub fn getter<F>(mut self, f: F) -> Self
    where
        F: Fn(&B) -> Result<T, AccessError> + Send + Sync + 'static,
    {
        self.descriptor = self.descriptor.with_reader(move |target: &dyn Bean| {
            let bean = target
                .downcast_ref::<B>()
                .ok_or_else(|| target_mismatch::<B>(target))?;
            f(bean).map(PropertyType::into_value)
        });
        self
    }

    pub fn setter<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut B, T) -> Result<(), AccessError> + Send + Sync + 'static,
    {
        self.descriptor = self.descriptor.with_writer(move |target: &mut dyn Bean, value: Value| {
            let found = target.type_name();
            let bean = target
                .downcast_mut::<B>()
                .ok_or(AccessError::TargetMismatch {
                    expected: std::any::type_name::<B>(),
                    found,
                })?;
            let arg = T::from_value(value).map_err(|v| AccessError::ArgumentMismatch {
                expected: T::type_name(),
                found: v.type_name(),
            })?;
            f(bean, arg)
        });
        self
    }

    pub fn declared_type(mut self, ty: TypeDescriptor) -> Self {
        self.descriptor = self.descriptor.with_type(ty);
        self
    }

    pub fn build(self) -> PropertyDescriptor {
        self.descriptor
    }
}

fn target_mismatch<B: Bean>(target: &dyn Bean) -> AccessError {
    AccessError::TargetMismatch {
        expected: std::any::type_name::<B>(),
        found: target.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConstructionError, IntrospectionError};

    #[derive(Default)]
    struct Point {
        x: i32,
    }

    impl Bean for Point {
        fn describe(&self) -> Result<Vec<PropertyDescriptor>, IntrospectionError> {
            Ok(vec![x_property()])
        }

        fn new_instance(&self) -> Result<Box<dyn Bean>, ConstructionError> {
            Ok(Box::new(Point::default()))
        }
    }

    struct Other;

    impl Bean for Other {
        fn describe(&self) -> Result<Vec<PropertyDescriptor>, IntrospectionError> {
            Ok(Vec::new())
        }

        fn new_instance(&self) -> Result<Box<dyn Bean>, ConstructionError> {
            Ok(Box::new(Other))
        }
    }

    fn x_property() -> PropertyDescriptor {
        PropertyDescriptor::typed::<Point, i32>("x")
            .getter(|p| Ok(p.x))
            .setter(|p, v| {
                p.x = v;
                Ok(())
            })
            .build()
    }

    #[test]
    fn test_typed_accessors() {
        let d = x_property();
        let mut p = Point { x: 3 };
        let read = d.reader().unwrap();
        let write = d.writer().unwrap();

        assert_eq!(read(&p).unwrap(), Value::I32(3));
        write(&mut p, Value::I32(9)).unwrap();
        assert_eq!(p.x, 9);
    }

    #[test]
    fn test_typed_accessors_reject_wrong_target() {
        let d = x_property();
        let err = (d.reader().unwrap())(&Other).unwrap_err();
        assert!(matches!(err, AccessError::TargetMismatch { .. }));
    }

    #[test]
    fn test_typed_writer_rejects_wrong_argument() {
        let d = x_property();
        let mut p = Point::default();
        let err = (d.writer().unwrap())(&mut p, Value::from("9")).unwrap_err();
        assert!(matches!(
            err,
            AccessError::ArgumentMismatch { expected: "i32", found: "String" }
        ));
        assert_eq!(p.x, 0);
    }

    #[test]
    fn test_read_only_descriptor() {
        let d = PropertyDescriptor::typed::<Point, i32>("x").getter(|p| Ok(p.x)).build();
        assert!(d.is_readable());
        assert!(!d.is_writable());
        assert_eq!(d.declared_type(), &TypeDescriptor::of::<i32>());
    }
}
