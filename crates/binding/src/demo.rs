//! A small module that demonstrates exposing counted objects to the runtime
//!
//! `Foo` is exposed through a handle to a trait object, and `Bar` embeds a `Foo` and shares its
//! count. `Bar` is exposed through a handle to the concrete type with `Foo` as its base class.

use crate::{
    BindingError, BindingSend, BindingSync, ClassBuilder, Module, ModuleSettings, Result, Value,
    check_arg_count,
};
use std::{
    ptr::NonNull,
    sync::atomic::{AtomicI64, Ordering},
};
use tether_memory::{Downcast, IntrusivePtr, RefCount, RefCounted, impl_downcast, impl_upcast};

/// An object with an id that can be read and written by the runtime
pub trait Identified: RefCounted + Downcast + BindingSend + BindingSync {
    /// Returns the object's id
    fn id(&self) -> i64;
    /// Sets the object's id
    fn set_id(&self, id: i64);
}

impl_downcast!(Identified);

/// The demo module's base class
#[derive(Debug, Default, RefCounted)]
pub struct Foo {
    ref_count: RefCount,
    id: AtomicI64,
}

impl Foo {
    /// Makes a new `Foo` with the given id
    pub fn new(id: i64) -> Self {
        Self {
            ref_count: RefCount::new(),
            id: AtomicI64::new(id),
        }
    }
}

impl Identified for Foo {
    fn id(&self) -> i64 {
        self.id.load(Ordering::Relaxed)
    }

    fn set_id(&self, id: i64) {
        self.id.store(id, Ordering::Relaxed);
    }
}

/// The demo module's derived class, sharing the count of its embedded `Foo`
#[derive(Debug, Default, RefCounted)]
pub struct Bar {
    #[ref_count]
    base: Foo,
}

impl Bar {
    /// Makes a new `Bar`, returning a handle that owns its only reference
    pub fn construct() -> IntrusivePtr<Bar> {
        IntrusivePtr::new(Bar::default())
    }

    /// Makes a new `Bar`, returning its raw address along with its only reference
    pub fn construct_raw() -> NonNull<Bar> {
        let mut bar = Self::construct();
        match bar.detach() {
            Some(ptr) => ptr,
            None => unreachable!("a new handle is never empty"),
        }
    }

    /// Returns the embedded `Foo`
    pub fn base(&self) -> &Foo {
        &self.base
    }
}

impl Identified for Bar {
    fn id(&self) -> i64 {
        self.base.id()
    }

    fn set_id(&self, id: i64) {
        self.base.set_id(id)
    }
}

impl_upcast!(Foo => dyn Identified);
impl_upcast!(Bar => dyn Identified);

/// The holder type used for instances of `Foo`
pub type FooHolder = IntrusivePtr<dyn Identified>;

/// The holder type used for instances of `Bar`
pub type BarHolder = IntrusivePtr<Bar>;

/// Makes the demo module with default settings
pub fn make_module() -> Result<Module> {
    make_module_with_settings(ModuleSettings::default())
}

/// Makes the demo module
///
/// - `Foo(id)`: property `id`, read-only property `ref_count`.
/// - `Bar()`: base `Foo`, static functions `construct` and `construct_raw`, method
///   `describe`.
pub fn make_module_with_settings(settings: ModuleSettings) -> Result<Module> {
    let module = Module::with_settings("demo", settings);

    module.add_class(
        ClassBuilder::<FooHolder>::new("Foo")
            .init(|args| {
                let id = match args {
                    [] => 0,
                    [id] => i64::try_from(id.clone())?,
                    _ => {
                        return Err(BindingError::WrongArgumentCount {
                            expected: 1,
                            found: args.len(),
                        });
                    }
                };
                Ok(Box::new(Foo::new(id)))
            })
            .property("id", |foo| foo.id(), |foo, id| foo.set_id(id))
            .property_readonly("ref_count", |foo| foo.ref_count().get() as i64),
    )?;

    let bar = ClassBuilder::<BarHolder>::new("Bar")
        .base("Foo", |bar: &BarHolder| bar.upcast_ref::<dyn Identified>())
        .init(|args| {
            check_arg_count(args, 0)?;
            Ok(Box::default())
        })
        .static_fn("construct", |args| {
            check_arg_count(args, 0)?;
            Ok(Bar::construct())
        })
        .method("describe", |bar, args| {
            check_arg_count(args, 0)?;
            Ok(Value::from(format!("Bar(id: {})", bar.id())))
        });

    // Safety: construct_raw hands over the only reference to a new Bar
    let bar = unsafe {
        bar.factory("construct_raw", |args| {
            check_arg_count(args, 0)?;
            Ok(Bar::construct_raw())
        })
    };

    module.add_class(bar)?;

    Ok(module)
}
