use crate::{Address, RefCounted, Upcast, count};
use downcast_rs::Downcast;
use std::{
    any::Any,
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    mem,
    ops::Deref,
    ptr::NonNull,
};

/// Makes an IntrusivePtr, with support for casting to trait objects
///
/// Although `IntrusivePtr::new` can be used, the challenge comes when a trait object needs to be
/// used as the pointee type. Until the `CoerceUnsized` trait is stabilized, casting from a concrete
/// type to `dyn Trait` needs to be performed on the boxed value. This macro encapsulates the
/// casting to make life easier at the call site.
#[macro_export]
macro_rules! make_intrusive {
    ($value:expr) => {
        $crate::IntrusivePtr::from(::std::boxed::Box::new($value) as ::std::boxed::Box<_>)
    };
}

/// A shared-ownership handle to an object with an embedded reference count
///
/// The handle holds either the address of a [RefCounted] object, or nothing. Cloning retains the
/// object, dropping releases it, and the last release destroys the object.
///
/// Unlike `Arc`, ownership can be moved in and out of a handle as a raw address with
/// [IntrusivePtr::detach] and [IntrusivePtr::from_raw], without any separate bookkeeping.
///
/// Equality, ordering, and hashing are based on the object's address, not its value.
pub struct IntrusivePtr<T: ?Sized + RefCounted> {
    ptr: Option<NonNull<T>>,
    _owned: PhantomData<T>,
}

// The count is shared between threads only when `T` is, which rules out the `rc` counter.
unsafe impl<T: ?Sized + RefCounted + Send + Sync> Send for IntrusivePtr<T> {}
unsafe impl<T: ?Sized + RefCounted + Send + Sync> Sync for IntrusivePtr<T> {}

impl<T: RefCounted> IntrusivePtr<T> {
    /// Moves the provided value into newly allocated memory, retaining it once
    pub fn new(value: T) -> Self {
        Self::from(Box::new(value))
    }
}

impl<T: ?Sized + RefCounted> IntrusivePtr<T> {
    /// Makes an empty handle
    pub const fn null() -> Self {
        Self {
            ptr: None,
            _owned: PhantomData,
        }
    }

    /// Makes a handle from a raw address
    ///
    /// If `retain` is true then the object's count is incremented. Pass `false` when adopting a
    /// reference that was already accounted for, e.g. the result of [IntrusivePtr::detach], or the
    /// return value of a factory that hands over one reference.
    ///
    /// # Safety
    ///
    /// A non-null `ptr` must point to a live object that was allocated with `Box`.
    /// When `retain` is false, the caller must own one of the object's references, which is
    /// transferred to the handle.
    pub unsafe fn from_raw(ptr: Option<NonNull<T>>, retain: bool) -> Self {
        if retain {
            if let Some(ptr) = ptr {
                unsafe { count::retain(ptr.as_ptr()) };
            }
        }

        Self {
            ptr,
            _owned: PhantomData,
        }
    }

    /// Returns the object's address without affecting ownership
    pub fn get(&self) -> Option<NonNull<T>> {
        self.ptr
    }

    /// Returns a reference to the object, or `None` if the handle is empty
    pub fn as_ref(&self) -> Option<&T> {
        // Safety: a non-empty handle keeps its object alive
        self.ptr.map(|ptr| unsafe { ptr.as_ref() })
    }

    /// Moves ownership out of the handle as a raw address, leaving the handle empty
    ///
    /// The count isn't changed, so the caller becomes responsible for exactly one release,
    /// typically by passing the address to [IntrusivePtr::from_raw] with `retain` set to false.
    #[must_use = "the detached reference must be released"]
    pub fn detach(&mut self) -> Option<NonNull<T>> {
        self.ptr.take()
    }

    /// Moves ownership into a new handle, leaving this handle empty
    #[must_use]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Releases the object and empties the handle
    pub fn reset(&mut self) {
        if let Some(old) = self.ptr.take() {
            unsafe { count::release(old.as_ptr()) };
        }
    }

    /// Replaces the handle's object with the object at `ptr`
    ///
    /// The new object is retained (if requested) before the old object is released, so resetting
    /// a handle to the object that it already refers to is safe.
    ///
    /// # Safety
    ///
    /// See [IntrusivePtr::from_raw].
    pub unsafe fn reset_to(&mut self, ptr: Option<NonNull<T>>, retain: bool) {
        if retain {
            if let Some(ptr) = ptr {
                unsafe { count::retain(ptr.as_ptr()) };
            }
        }

        if let Some(old) = mem::replace(&mut self.ptr, ptr) {
            unsafe { count::release(old.as_ptr()) };
        }
    }

    /// Replaces the handle's object with the object at `ptr`, retaining it
    ///
    /// # Safety
    ///
    /// A non-null `ptr` must point to a live object that was allocated with `Box`.
    pub unsafe fn assign_raw(&mut self, ptr: Option<NonNull<T>>) {
        unsafe { self.reset_to(ptr, true) }
    }

    /// Exchanges the objects of two handles, the counts are unaffected
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
    }

    /// Returns true if the handle is empty
    pub fn is_null(&self) -> bool {
        self.ptr.is_none()
    }

    /// Returns true if the handle refers to an object
    pub fn is_some(&self) -> bool {
        self.ptr.is_some()
    }

    /// Converts the handle into a handle to a supertype, transferring ownership
    pub fn upcast<U>(mut self) -> IntrusivePtr<U>
    where
        T: Upcast<U>,
        U: ?Sized + RefCounted,
    {
        let ptr = self.detach().map(<T as Upcast<U>>::upcast_ptr);
        unsafe { IntrusivePtr::from_raw(ptr, false) }
    }

    /// Makes a new handle to a supertype, retaining the object
    pub fn upcast_ref<U>(&self) -> IntrusivePtr<U>
    where
        T: Upcast<U>,
        U: ?Sized + RefCounted,
    {
        self.clone().upcast()
    }

    /// Returns true if the two handles refer to the same object, or if both are empty
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Self::address(this) == Self::address(other)
    }

    /// Returns the address of the object, or the null address for an empty handle
    pub fn address(this: &Self) -> Address {
        this.ptr
            .map_or(Address::null(), |ptr| Address::from(ptr.as_ptr()))
    }

    /// Returns the object's reference count, or zero for an empty handle
    ///
    /// The result is only suitable for diagnostics, see [RefCount::get](crate::RefCount::get).
    pub fn ref_count(this: &Self) -> usize {
        this.as_ref().map_or(0, |object| object.ref_count().get())
    }
}

impl<T: ?Sized + RefCounted + Downcast> IntrusivePtr<T> {
    /// Returns true if the handle refers to an object of type `U`
    pub fn is_a<U: Any>(&self) -> bool {
        self.as_ref()
            .is_some_and(|object| object.as_any().is::<U>())
    }

    /// Attempts to convert the handle into a handle to the concrete type `U`
    ///
    /// Ownership is transferred to the returned handle on success, otherwise the original handle
    /// is returned unchanged.
    pub fn downcast<U: RefCounted + Any>(mut self) -> Result<IntrusivePtr<U>, Self> {
        if self.is_a::<U>() {
            let ptr = self.detach().map(NonNull::cast::<U>);
            Ok(unsafe { IntrusivePtr::from_raw(ptr, false) })
        } else {
            Err(self)
        }
    }
}

impl<T: ?Sized + RefCounted> Default for IntrusivePtr<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: ?Sized + RefCounted> Clone for IntrusivePtr<T> {
    fn clone(&self) -> Self {
        unsafe { Self::from_raw(self.ptr, true) }
    }

    fn clone_from(&mut self, source: &Self) {
        unsafe { self.reset_to(source.ptr, true) }
    }
}

impl<T: ?Sized + RefCounted> Drop for IntrusivePtr<T> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<T: ?Sized + RefCounted> Deref for IntrusivePtr<T> {
    type Target = T;

    #[track_caller]
    fn deref(&self) -> &T {
        match self.as_ref() {
            Some(object) => object,
            None => panic!("attempted to dereference an empty IntrusivePtr"),
        }
    }
}

impl<T: RefCounted> From<T> for IntrusivePtr<T> {
    fn from(value: T) -> Self {
        Self::from(Box::new(value))
    }
}

impl<T: ?Sized + RefCounted> From<Box<T>> for IntrusivePtr<T> {
    fn from(boxed: Box<T>) -> Self {
        let ptr = NonNull::from(Box::leak(boxed));
        unsafe { Self::from_raw(Some(ptr), true) }
    }
}

impl<T: ?Sized + RefCounted> PartialEq for IntrusivePtr<T> {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other)
    }
}

impl<T: ?Sized + RefCounted> Eq for IntrusivePtr<T> {}

impl<T: ?Sized + RefCounted> PartialEq<Address> for IntrusivePtr<T> {
    fn eq(&self, other: &Address) -> bool {
        Self::address(self) == *other
    }
}

impl<T: ?Sized + RefCounted> Ord for IntrusivePtr<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        Self::address(self).cmp(&Self::address(other))
    }
}

impl<T: ?Sized + RefCounted> PartialOrd for IntrusivePtr<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: ?Sized + RefCounted> PartialOrd<Address> for IntrusivePtr<T> {
    fn partial_cmp(&self, other: &Address) -> Option<Ordering> {
        Some(Self::address(self).cmp(other))
    }
}

impl<T: ?Sized + RefCounted> Hash for IntrusivePtr<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Self::address(self).hash(state)
    }
}

impl<T: ?Sized + RefCounted> fmt::Debug for IntrusivePtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntrusivePtr")
            .field("address", &Self::address(self))
            .field("ref_count", &Self::ref_count(self))
            .finish()
    }
}

impl<T: ?Sized + RefCounted> fmt::Pointer for IntrusivePtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Self::address(self), f)
    }
}
