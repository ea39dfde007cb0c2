use crate::{
    BindingError, BindingSend, BindingSync, ClassBuilder, Holder, Object, Result, Value,
    class::ClassInfo, object::ErasedHolder,
};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::{any::TypeId, ptr::NonNull, sync::Arc};

/// Settings used to control the behaviour of a [Module]
#[derive(Clone, Debug, Default)]
pub struct ModuleSettings {
    /// Whether or not attributes that aren't declared by an object's class can be set
    ///
    /// When enabled, unknown attributes are stored with the object and shared between its clones.
    /// Otherwise setting an unknown attribute is an error.
    ///
    /// Default: false
    pub allow_dynamic_attributes: bool,

    /// Whether or not to emit trace logs when objects are created and dropped by the runtime
    ///
    /// Default: false
    pub log_lifetimes: bool,
}

impl ModuleSettings {
    /// Helper for conveniently enabling dynamic attributes
    #[must_use]
    pub fn with_dynamic_attributes(self) -> Self {
        Self {
            allow_dynamic_attributes: true,
            ..self
        }
    }

    /// Helper for conveniently enabling lifetime logging
    #[must_use]
    pub fn with_lifetime_logging(self) -> Self {
        Self {
            log_lifetimes: true,
            ..self
        }
    }
}

/// A named collection of classes that are exposed to the runtime
///
/// The module is the runtime's side of the binding. Objects that it creates are owned through
/// their class's [Holder], attributes and methods are looked up on the object's class and then on
/// each of its base classes in turn.
pub struct Module {
    name: String,
    settings: ModuleSettings,
    classes: RwLock<IndexMap<String, Arc<ClassInfo>>>,
}

impl Module {
    /// Makes an empty module with default settings
    pub fn new(name: &str) -> Self {
        Self::with_settings(name, ModuleSettings::default())
    }

    /// Makes an empty module with the given settings
    pub fn with_settings(name: &str, settings: ModuleSettings) -> Self {
        Self {
            name: name.into(),
            settings,
            classes: RwLock::default(),
        }
    }

    /// The module's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The module's settings
    pub fn settings(&self) -> &ModuleSettings {
        &self.settings
    }

    /// Registers a class
    ///
    /// If the class has a base then it must already be registered, with the holder type that the
    /// class's cast produces.
    pub fn add_class<H>(&self, class: ClassBuilder<H>) -> Result<()>
    where
        H: Holder + BindingSend + BindingSync,
    {
        let (mut info, base) = class.finish();
        let mut classes = self.classes.write();

        if classes.contains_key(info.name()) {
            return Err(BindingError::DuplicateClass(info.name().into()));
        }

        if let Some(base) = base {
            let Some(base_info) = classes.get(&base.name).cloned() else {
                return Err(BindingError::UnknownBase {
                    class: info.name().into(),
                    base: base.name,
                });
            };
            if base_info.holder_type() != base.holder_type {
                return Err(BindingError::HolderMismatch {
                    expected: base_info.holder_type_name(),
                });
            }
            info.set_base(base.resolve(base_info));
        }

        log::debug!(
            "{}: registered class '{}' held by {}",
            self.name,
            info.name(),
            info.holder_type_name()
        );

        classes.insert(info.name().into(), Arc::new(info));
        Ok(())
    }

    /// Returns true if a class with the given name has been registered
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.read().contains_key(name)
    }

    /// Returns the names of the registered classes, in registration order
    pub fn class_names(&self) -> Vec<String> {
        self.classes.read().keys().cloned().collect()
    }

    /// Constructs an instance of a class, as if the runtime called the class
    pub fn construct(&self, class: &str, args: &[Value]) -> Result<Object> {
        let info = self.class(class)?;
        let holder = info.construct(args)?;
        self.make_object(info, holder)
    }

    /// Calls one of a class's static functions, returning the new instance
    pub fn call_static(&self, class: &str, name: &str, args: &[Value]) -> Result<Object> {
        let info = self.class(class)?;
        let holder = info.call_static(name, args)?;
        self.make_object(info, holder)
    }

    /// Exposes an object to the runtime through an existing holder
    pub fn wrap_holder<H: Holder + BindingSend + BindingSync>(
        &self,
        class: &str,
        holder: H,
    ) -> Result<Object> {
        let info = self.class(class)?;
        check_holder_type::<H>(&info)?;
        self.make_object(info, Box::new(holder))
    }

    /// Exposes an object that's owned elsewhere, adding a reference with [Holder::wrap]
    ///
    /// # Safety
    ///
    /// `ptr` must refer to a live object that's compatible with `H`.
    pub unsafe fn wrap_raw<H: Holder + BindingSend + BindingSync>(
        &self,
        class: &str,
        ptr: NonNull<H::Element>,
    ) -> Result<Object> {
        let info = self.class(class)?;
        check_holder_type::<H>(&info)?;
        log::trace!("{}: wrapping {} object", self.name, info.name());
        self.make_object(info, Box::new(unsafe { H::wrap(ptr) }))
    }

    /// Exposes an object by taking over a reference with [Holder::adopt], without retaining
    ///
    /// If an error is returned then the reference stays with the caller.
    ///
    /// # Safety
    ///
    /// `ptr` must refer to a live object that's compatible with `H`, and the caller must own one
    /// reference to it.
    pub unsafe fn adopt_raw<H: Holder + BindingSend + BindingSync>(
        &self,
        class: &str,
        ptr: NonNull<H::Element>,
    ) -> Result<Object> {
        let info = self.class(class)?;
        check_holder_type::<H>(&info)?;
        log::trace!("{}: adopting {} object", self.name, info.name());
        self.make_object(info, Box::new(unsafe { H::adopt(ptr) }))
    }

    /// Gets the value of one of an object's attributes
    pub fn get_attr(&self, object: &Object, name: &str) -> Result<Value> {
        log::trace!("{}: get {}.{name}", self.name, object.class_name());

        let found = object
            .class()
            .find(object.erased_holder(), &mut |class, holder| {
                class.property(name).map(|property| property.get(holder))
            });

        match found {
            Some(result) => result,
            None => object
                .dynamic_attributes()
                .read()
                .get(name)
                .cloned()
                .ok_or_else(|| unknown_attribute(object, name)),
        }
    }

    /// Sets the value of one of an object's attributes
    pub fn set_attr(&self, object: &Object, name: &str, value: Value) -> Result<()> {
        log::trace!("{}: set {}.{name}", self.name, object.class_name());

        let mut value = Some(value);
        let found = object
            .class()
            .find(object.erased_holder(), &mut |class, holder| {
                let property = class.property(name)?;
                let result = match property.set(holder, value.take().unwrap_or_default()) {
                    Some(result) => result,
                    None => Err(BindingError::ReadOnlyAttribute {
                        class: class.name().into(),
                        name: name.into(),
                    }),
                };
                Some(result)
            });

        match (found, value) {
            (Some(result), _) => result,
            (None, Some(value)) if self.settings.allow_dynamic_attributes => {
                object
                    .dynamic_attributes()
                    .write()
                    .insert(name.into(), value);
                Ok(())
            }
            _ => Err(unknown_attribute(object, name)),
        }
    }

    /// Calls one of an object's methods
    pub fn call_method(&self, object: &Object, name: &str, args: &[Value]) -> Result<Value> {
        log::trace!("{}: call {}.{name}", self.name, object.class_name());

        object
            .class()
            .find(object.erased_holder(), &mut |class, holder| {
                class.method(name).map(|method| method(holder, args))
            })
            .unwrap_or_else(|| {
                Err(BindingError::UnknownMethod {
                    class: object.class_name().into(),
                    name: name.into(),
                })
            })
    }

    fn class(&self, name: &str) -> Result<Arc<ClassInfo>> {
        self.classes
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| BindingError::UnknownClass(name.into()))
    }

    fn make_object(&self, info: Arc<ClassInfo>, holder: Box<dyn ErasedHolder>) -> Result<Object> {
        if holder.address().is_null() {
            return Err(BindingError::NullHolder);
        }
        Ok(Object::new(info, holder, self.settings.log_lifetimes))
    }
}

fn check_holder_type<H: Holder>(info: &ClassInfo) -> Result<()> {
    if info.holder_type() == TypeId::of::<H>() {
        Ok(())
    } else {
        Err(BindingError::HolderMismatch {
            expected: info.holder_type_name(),
        })
    }
}

fn unknown_attribute(object: &Object, name: &str) -> BindingError {
    BindingError::UnknownAttribute {
        class: object.class_name().into(),
        name: name.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_helpers() {
        let settings = ModuleSettings::default();
        assert!(!settings.allow_dynamic_attributes);
        assert!(!settings.log_lifetimes);

        let settings = settings.with_dynamic_attributes().with_lifetime_logging();
        assert!(settings.allow_dynamic_attributes);
        assert!(settings.log_lifetimes);
    }

    #[test]
    fn unknown_class() {
        let module = Module::new("empty");

        assert!(!module.has_class("Foo"));
        assert_eq!(
            module.construct("Foo", &[]).unwrap_err(),
            BindingError::UnknownClass("Foo".into())
        );
    }

    #[test]
    fn classes_are_listed_in_registration_order() {
        let module = Module::new("bytes");
        module.add_class(ClassBuilder::<Arc<u8>>::new("B")).unwrap();
        module.add_class(ClassBuilder::<Arc<u8>>::new("A")).unwrap();

        assert_eq!(module.class_names(), ["B", "A"]);
        assert_eq!(
            module.add_class(ClassBuilder::<Arc<u8>>::new("A")),
            Err(BindingError::DuplicateClass("A".into()))
        );
    }

    #[test]
    fn base_must_be_registered() {
        let module = Module::new("bytes");
        let class = ClassBuilder::<Arc<u8>>::new("Derived").base("Base", Arc::clone);

        assert_eq!(
            module.add_class(class),
            Err(BindingError::UnknownBase {
                class: "Derived".into(),
                base: "Base".into()
            })
        );
    }
}
