use crate::{BindingSend, BindingSync, Holder, Value, class::ClassInfo};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::{any::Any, fmt, sync::Arc};
use tether_memory::Address;

/// A type-erased holder, as stored in an [Object]
pub(crate) trait ErasedHolder: Any + BindingSend + BindingSync {
    fn clone_holder(&self) -> Box<dyn ErasedHolder>;
    fn address(&self) -> Address;
    fn as_any(&self) -> &dyn Any;
}

impl<H: Holder + BindingSend + BindingSync> ErasedHolder for H {
    fn clone_holder(&self) -> Box<dyn ErasedHolder> {
        Box::new(self.clone())
    }

    fn address(&self) -> Address {
        self.get()
            .map_or(Address::null(), |ptr| Address::from(ptr.as_ptr()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An instance of a registered class, as seen by the host runtime
///
/// The object owns one reference to the native object through its class's holder type. Cloning
/// the object clones the holder, and the native object is released when the last clone is dropped.
///
/// Attributes that were added at runtime (see
/// [ModuleSettings::allow_dynamic_attributes](crate::ModuleSettings::allow_dynamic_attributes))
/// are shared between clones.
pub struct Object {
    class: Arc<ClassInfo>,
    holder: Box<dyn ErasedHolder>,
    dynamic_attributes: Arc<RwLock<IndexMap<String, Value>>>,
    log_lifetime: bool,
}

impl Object {
    pub(crate) fn new(
        class: Arc<ClassInfo>,
        holder: Box<dyn ErasedHolder>,
        log_lifetime: bool,
    ) -> Self {
        if log_lifetime {
            log::trace!("{} object created at {}", class.name(), holder.address());
        }

        Self {
            class,
            holder,
            dynamic_attributes: Arc::default(),
            log_lifetime,
        }
    }

    /// Returns the name of the object's class
    pub fn class_name(&self) -> &str {
        self.class.name()
    }

    /// Returns the address of the native object
    pub fn address(&self) -> Address {
        self.holder.address()
    }

    /// Returns the object's holder, if its class is held by `H`
    ///
    /// This is how native code gets hold of the objects that are passed to it by the runtime.
    pub fn holder<H: Holder>(&self) -> Option<&H> {
        self.holder.as_any().downcast_ref::<H>()
    }

    /// Returns true if the object's class is `class_name`, or inherits from it
    pub fn is_instance_of(&self, class_name: &str) -> bool {
        let mut class = Some(&self.class);
        while let Some(info) = class {
            if info.name() == class_name {
                return true;
            }
            class = info.base_class();
        }
        false
    }

    pub(crate) fn class(&self) -> &Arc<ClassInfo> {
        &self.class
    }

    pub(crate) fn erased_holder(&self) -> &dyn ErasedHolder {
        self.holder.as_ref()
    }

    pub(crate) fn dynamic_attributes(&self) -> &RwLock<IndexMap<String, Value>> {
        &self.dynamic_attributes
    }
}

impl Clone for Object {
    fn clone(&self) -> Self {
        Self {
            class: self.class.clone(),
            holder: self.holder.clone_holder(),
            dynamic_attributes: self.dynamic_attributes.clone(),
            log_lifetime: self.log_lifetime,
        }
    }
}

impl Drop for Object {
    fn drop(&mut self) {
        if self.log_lifetime {
            log::trace!(
                "{} object at {} dropped",
                self.class.name(),
                self.holder.address()
            );
        }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class", &self.class_name())
            .field("address", &self.address())
            .finish()
    }
}
