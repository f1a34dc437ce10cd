use std::any::Any;

use crate::{ConstructionError, IntrospectionError, PropertyDescriptor};

/// Object whose named properties can be exposed through a [`BeanMap`](crate::BeanMap).
///
/// Usually derived:
///
/// ```rust
/// use beanmap::{Bean, BeanMap, Value};
///
/// #[derive(Default, Bean)]
/// struct Account {
///     owner: String,
///     balance: i64,
/// }
///
/// let map = BeanMap::for_bean(Account { owner: "ann".into(), balance: 10 });
/// assert_eq!(map.get("balance"), Some(Value::I64(10)));
/// ```
///
/// Implementing it by hand is done with
/// [`PropertyDescriptor::typed`]:
///
/// ```rust
/// use beanmap::{AccessError, Bean, ConstructionError, IntrospectionError, PropertyDescriptor};
///
/// #[derive(Default)]
/// struct Counter {
///     hits: u32,
/// }
///
/// impl Bean for Counter {
///     fn describe(&self) -> Result<Vec<PropertyDescriptor>, IntrospectionError> {
///         Ok(vec![PropertyDescriptor::typed::<Counter, u32>("hits")
///             .getter(|c| Ok(c.hits))
///             .setter(|c, v| {
///                 c.hits = v;
///                 Ok(())
///             })
///             .build()])
///     }
///
///     fn new_instance(&self) -> Result<Box<dyn Bean>, ConstructionError> {
///         Ok(Box::new(Counter::default()))
///     }
/// }
/// ```
pub trait Bean: AsAny {
    /// Enumerates the properties of the concrete runtime type.
    fn describe(&self) -> Result<Vec<PropertyDescriptor>, IntrospectionError>;

    /// Creates a default instance of the same concrete type.
    fn new_instance(&self) -> Result<Box<dyn Bean>, ConstructionError>;

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Upcast helper so accessors can downcast a `dyn Bean` to its concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl dyn Bean {
    pub fn is<T: Bean>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Bean>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Bean>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}
