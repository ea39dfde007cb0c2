use std::{ptr::NonNull, sync::Arc};
use tether_memory::{IntrusivePtr, RefCounted};

/// A pointer type that a host runtime can use to own the native objects that it exposes
///
/// The runtime never touches an object's lifetime directly, everything goes through the holder:
/// - [Holder::adopt] takes over a reference that has already been accounted for, e.g. the return
///   value of a factory that hands out one reference.
/// - [Holder::wrap] shares an object that's owned elsewhere, adding a reference.
/// - [Holder::get] extracts the address, e.g. to pass the object back to native code.
/// - Dropping the holder gives up its reference.
pub trait Holder: Clone + 'static {
    /// The type of the object that the holder refers to
    type Element: ?Sized + 'static;

    /// Takes ownership of a newly allocated object
    fn from_box(boxed: Box<Self::Element>) -> Self;

    /// Makes a holder that takes over an existing reference to the object at `ptr`
    ///
    /// # Safety
    ///
    /// `ptr` must refer to a live object that's compatible with the holder, and the caller must
    /// own one reference to it, which is transferred to the holder.
    unsafe fn adopt(ptr: NonNull<Self::Element>) -> Self;

    /// Makes a holder that shares the object at `ptr`, adding a reference
    ///
    /// # Safety
    ///
    /// `ptr` must refer to a live object that's compatible with the holder.
    unsafe fn wrap(ptr: NonNull<Self::Element>) -> Self;

    /// Returns the address of the held object, or `None` if the holder is empty
    fn get(&self) -> Option<NonNull<Self::Element>>;
}

impl<T: ?Sized + RefCounted + 'static> Holder for IntrusivePtr<T> {
    type Element = T;

    fn from_box(boxed: Box<T>) -> Self {
        IntrusivePtr::from(boxed)
    }

    unsafe fn adopt(ptr: NonNull<T>) -> Self {
        unsafe { IntrusivePtr::from_raw(Some(ptr), false) }
    }

    unsafe fn wrap(ptr: NonNull<T>) -> Self {
        unsafe { IntrusivePtr::from_raw(Some(ptr), true) }
    }

    fn get(&self) -> Option<NonNull<T>> {
        IntrusivePtr::get(self)
    }
}

// The count lives outside of the object, so `ptr` must come from `Arc::into_raw`.
impl<T: 'static> Holder for Arc<T> {
    type Element = T;

    fn from_box(boxed: Box<T>) -> Self {
        Arc::from(boxed)
    }

    unsafe fn adopt(ptr: NonNull<T>) -> Self {
        unsafe { Arc::from_raw(ptr.as_ptr()) }
    }

    unsafe fn wrap(ptr: NonNull<T>) -> Self {
        unsafe {
            Arc::increment_strong_count(ptr.as_ptr());
            Arc::from_raw(ptr.as_ptr())
        }
    }

    fn get(&self) -> Option<NonNull<T>> {
        NonNull::new(Arc::as_ptr(self).cast_mut())
    }
}
