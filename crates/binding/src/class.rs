use crate::{BindingError, BindingSend, BindingSync, Holder, Result, Value, object::ErasedHolder};
use indexmap::IndexMap;
use std::{
    any::{Any, TypeId, type_name},
    marker::PhantomData,
    ptr::NonNull,
    sync::Arc,
};

// Trait aliases for the type-erased callbacks stored in a class,
// see https://github.com/rust-lang/rust/issues/55628
macro_rules! callback_trait {
    ($name:ident: $($signature:tt)+) => {
        pub(crate) trait $name: $($signature)+ + BindingSend + BindingSync + 'static {}
        impl<T> $name for T where T: $($signature)+ + BindingSend + BindingSync + 'static {}
    };
}

callback_trait!(Getter: Fn(&dyn Any) -> Result<Value>);
callback_trait!(Setter: Fn(&dyn Any, Value) -> Result<()>);
callback_trait!(Method: Fn(&dyn Any, &[Value]) -> Result<Value>);
callback_trait!(Constructor: Fn(&[Value]) -> Result<Box<dyn ErasedHolder>>);
callback_trait!(BaseCast: Fn(&dyn Any) -> Result<Box<dyn ErasedHolder>>);

pub(crate) struct Property {
    getter: Box<dyn Getter>,
    setter: Option<Box<dyn Setter>>,
}

impl Property {
    pub(crate) fn get(&self, holder: &dyn Any) -> Result<Value> {
        (self.getter)(holder)
    }

    /// Returns `None` if the property is read-only
    pub(crate) fn set(&self, holder: &dyn Any, value: Value) -> Option<Result<()>> {
        self.setter.as_ref().map(|setter| setter(holder, value))
    }
}

pub(crate) struct BaseClass {
    info: Arc<ClassInfo>,
    cast: Box<dyn BaseCast>,
}

// A base class that's referred to by name until the class is added to a module
pub(crate) struct PendingBase {
    pub name: String,
    pub holder_type: TypeId,
    cast: Box<dyn BaseCast>,
}

impl PendingBase {
    pub(crate) fn resolve(self, info: Arc<ClassInfo>) -> BaseClass {
        BaseClass {
            info,
            cast: self.cast,
        }
    }
}

/// The runtime's description of a registered class
pub(crate) struct ClassInfo {
    name: String,
    holder_type: TypeId,
    holder_type_name: &'static str,
    base: Option<BaseClass>,
    properties: IndexMap<String, Property>,
    methods: IndexMap<String, Box<dyn Method>>,
    init: Option<Box<dyn Constructor>>,
    static_functions: IndexMap<String, Box<dyn Constructor>>,
}

impl ClassInfo {
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn holder_type(&self) -> TypeId {
        self.holder_type
    }

    pub(crate) fn holder_type_name(&self) -> &'static str {
        self.holder_type_name
    }

    pub(crate) fn base_class(&self) -> Option<&Arc<ClassInfo>> {
        self.base.as_ref().map(|base| &base.info)
    }

    pub(crate) fn set_base(&mut self, base: BaseClass) {
        self.base = Some(base);
    }

    pub(crate) fn construct(&self, args: &[Value]) -> Result<Box<dyn ErasedHolder>> {
        match &self.init {
            Some(init) => init(args),
            None => Err(BindingError::NoConstructor(self.name.clone())),
        }
    }

    pub(crate) fn call_static(&self, name: &str, args: &[Value]) -> Result<Box<dyn ErasedHolder>> {
        match self.static_functions.get(name) {
            Some(f) => f(args),
            None => Err(BindingError::UnknownStaticFunction {
                class: self.name.clone(),
                name: name.into(),
            }),
        }
    }

    pub(crate) fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub(crate) fn method(&self, name: &str) -> Option<&dyn Method> {
        self.methods.get(name).map(|method| method.as_ref())
    }

    /// Calls `f` with the class and each of its bases in turn, until `f` returns a result
    ///
    /// Each base class is given a holder of its own type, produced by the base's cast.
    pub(crate) fn find<R>(
        &self,
        holder: &dyn ErasedHolder,
        f: &mut dyn FnMut(&ClassInfo, &dyn Any) -> Option<Result<R>>,
    ) -> Option<Result<R>> {
        if let Some(result) = f(self, holder.as_any()) {
            return Some(result);
        }

        let base = self.base.as_ref()?;
        match (base.cast)(holder.as_any()) {
            Ok(base_holder) => base.info.find(base_holder.as_ref(), f),
            Err(error) => Some(Err(error)),
        }
    }
}

/// Describes a class that native code exposes to the runtime
///
/// Instances of the class are owned by the runtime through the holder type `H`. The builder is
/// consumed by [Module::add_class](crate::Module::add_class).
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicI64, Ordering};
/// use tether_binding::{ClassBuilder, Module};
/// use tether_memory::{IntrusivePtr, RefCount, RefCounted};
///
/// #[derive(Default, RefCounted)]
/// struct Counter {
///     ref_count: RefCount,
///     value: AtomicI64,
/// }
///
/// let module = Module::new("counters");
/// module
///     .add_class(
///         ClassBuilder::<IntrusivePtr<Counter>>::new("Counter")
///             .init(|_| Ok(Box::default()))
///             .property(
///                 "value",
///                 |counter| counter.value.load(Ordering::Relaxed),
///                 |counter, value| counter.value.store(value, Ordering::Relaxed),
///             ),
///     )
///     .unwrap();
///
/// let counter = module.construct("Counter", &[]).unwrap();
/// module.set_attr(&counter, "value", 99i64.into()).unwrap();
/// assert_eq!(i64::try_from(module.get_attr(&counter, "value").unwrap()), Ok(99));
/// ```
pub struct ClassBuilder<H> {
    info: ClassInfo,
    base: Option<PendingBase>,
    _holder: PhantomData<fn() -> H>,
}

impl<H: Holder + BindingSend + BindingSync> ClassBuilder<H> {
    /// Starts describing a class with the given name
    pub fn new(name: &str) -> Self {
        Self {
            info: ClassInfo {
                name: name.into(),
                holder_type: TypeId::of::<H>(),
                holder_type_name: type_name::<H>(),
                base: None,
                properties: IndexMap::new(),
                methods: IndexMap::new(),
                init: None,
                static_functions: IndexMap::new(),
            },
            base: None,
            _holder: PhantomData,
        }
    }

    /// Declares the class's base class
    ///
    /// The base must already be registered in the module when the class is added. `cast` converts
    /// the class's holder into the base's holder, sharing the same object, e.g. with
    /// [IntrusivePtr::upcast_ref](tether_memory::IntrusivePtr::upcast_ref).
    #[must_use]
    pub fn base<B, F>(mut self, name: &str, cast: F) -> Self
    where
        B: Holder + BindingSend + BindingSync,
        F: Fn(&H) -> B + BindingSend + BindingSync + 'static,
    {
        let cast = move |holder: &dyn Any| -> Result<Box<dyn ErasedHolder>> {
            Ok(Box::new(cast(downcast_holder::<H>(holder)?)))
        };
        self.base = Some(PendingBase {
            name: name.into(),
            holder_type: TypeId::of::<B>(),
            cast: Box::new(cast),
        });
        self
    }

    /// Adds a property that can be read and written
    #[must_use]
    pub fn property<V, G, S>(mut self, name: &str, getter: G, setter: S) -> Self
    where
        V: Into<Value> + TryFrom<Value, Error = BindingError>,
        G: Fn(&H::Element) -> V + BindingSend + BindingSync + 'static,
        S: Fn(&H::Element, V) + BindingSend + BindingSync + 'static,
    {
        let set = move |holder: &dyn Any, value: Value| -> Result<()> {
            setter(element::<H>(holder)?, V::try_from(value)?);
            Ok(())
        };
        let property = Property {
            getter: make_getter::<H, V, G>(getter),
            setter: Some(Box::new(set)),
        };
        self.info.properties.insert(name.into(), property);
        self
    }

    /// Adds a property that can only be read
    #[must_use]
    pub fn property_readonly<V, G>(mut self, name: &str, getter: G) -> Self
    where
        V: Into<Value>,
        G: Fn(&H::Element) -> V + BindingSend + BindingSync + 'static,
    {
        let property = Property {
            getter: make_getter::<H, V, G>(getter),
            setter: None,
        };
        self.info.properties.insert(name.into(), property);
        self
    }

    /// Adds a method that's called with the object and the call's arguments
    #[must_use]
    pub fn method<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&H::Element, &[Value]) -> Result<Value> + BindingSend + BindingSync + 'static,
    {
        let method = move |holder: &dyn Any, args: &[Value]| f(element::<H>(holder)?, args);
        self.info.methods.insert(name.into(), Box::new(method));
        self
    }

    /// Sets the function that's used when the runtime constructs an instance of the class
    ///
    /// The new object is owned by a holder made with [Holder::from_box].
    #[must_use]
    pub fn init<F>(mut self, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Box<H::Element>> + BindingSend + BindingSync + 'static,
    {
        let init = move |args: &[Value]| -> Result<Box<dyn ErasedHolder>> {
            Ok(Box::new(H::from_box(f(args)?)))
        };
        self.info.init = Some(Box::new(init));
        self
    }

    /// Adds a static function that returns a new instance of the class
    #[must_use]
    pub fn static_fn<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<H> + BindingSend + BindingSync + 'static,
    {
        let function = move |args: &[Value]| -> Result<Box<dyn ErasedHolder>> {
            Ok(Box::new(f(args)?))
        };
        self.info.static_functions.insert(name.into(), Box::new(function));
        self
    }

    /// Adds a static function that returns the raw address of a new instance of the class
    ///
    /// The returned reference is adopted by the runtime with [Holder::adopt], without retaining.
    ///
    /// # Safety
    ///
    /// Each address returned by `f` must refer to a live object that's compatible with `H`,
    /// carrying one reference that's handed over to the runtime.
    #[must_use]
    pub unsafe fn factory<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<NonNull<H::Element>> + BindingSend + BindingSync + 'static,
    {
        let function = move |args: &[Value]| -> Result<Box<dyn ErasedHolder>> {
            let holder = unsafe { H::adopt(f(args)?) };
            Ok(Box::new(holder))
        };
        self.info.static_functions.insert(name.into(), Box::new(function));
        self
    }

    pub(crate) fn finish(self) -> (ClassInfo, Option<PendingBase>) {
        (self.info, self.base)
    }
}

fn make_getter<H, V, G>(getter: G) -> Box<dyn Getter>
where
    H: Holder,
    V: Into<Value>,
    G: Fn(&H::Element) -> V + BindingSend + BindingSync + 'static,
{
    Box::new(move |holder: &dyn Any| element::<H>(holder).map(|element| getter(element).into()))
}

fn downcast_holder<H: Holder>(holder: &dyn Any) -> Result<&H> {
    holder
        .downcast_ref::<H>()
        .ok_or(BindingError::HolderMismatch {
            expected: type_name::<H>(),
        })
}

fn element<H: Holder>(holder: &dyn Any) -> Result<&H::Element> {
    let ptr = downcast_holder::<H>(holder)?
        .get()
        .ok_or(BindingError::NullHolder)?;
    // The object is kept alive by the borrowed holder
    Ok(unsafe { ptr.as_ref() })
}

/// Returns an error if the number of arguments doesn't match the expected count
pub fn check_arg_count(args: &[Value], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(BindingError::WrongArgumentCount {
            expected,
            found: args.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arg_count() {
        assert!(check_arg_count(&[], 0).is_ok());
        assert_eq!(
            check_arg_count(&[Value::Null], 2),
            Err(BindingError::WrongArgumentCount {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn builder_records_the_holder_type() {
        let (info, base) = ClassBuilder::<Arc<u8>>::new("Byte").finish();

        assert_eq!(info.name(), "Byte");
        assert_eq!(info.holder_type(), TypeId::of::<Arc<u8>>());
        assert!(base.is_none());
        assert!(matches!(
            info.construct(&[]),
            Err(BindingError::NoConstructor(name)) if name == "Byte"
        ));
    }
}
