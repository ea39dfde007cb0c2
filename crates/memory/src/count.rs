use crate::{Address, count_impl::CountImpl};
use std::{fmt, process};

// Going above this limit aborts, the program would otherwise be at risk of wrapping the count
const MAX_REF_COUNT: usize = isize::MAX as usize;

/// The reference count embedded in a counted object
///
/// A `RefCount` belongs to the address of the object that embeds it. Cloning produces a fresh
/// count of zero, and `clone_from` leaves the destination's count untouched, so objects that
/// derive `Clone` never inherit the source's owners.
pub struct RefCount(CountImpl);

impl RefCount {
    /// Makes a new count of zero
    pub const fn new() -> Self {
        Self(CountImpl::new())
    }

    /// Returns the current number of references
    ///
    /// With the `arc` feature the result may already be out of date when it's returned, so it
    /// should only be used for diagnostics.
    pub fn get(&self) -> usize {
        self.0.load()
    }

    /// Returns true if there's exactly one reference
    pub fn is_unique(&self) -> bool {
        self.get() == 1
    }
}

impl Default for RefCount {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RefCount {
    fn clone(&self) -> Self {
        Self::new()
    }

    fn clone_from(&mut self, _source: &Self) {}
}

impl fmt::Debug for RefCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefCount").field(&self.get()).finish()
    }
}

/// Types that carry a single embedded [RefCount]
///
/// Implementing `RefCounted` allows a type to be managed by [IntrusivePtr](crate::IntrusivePtr).
/// `#[derive(RefCounted)]` is the recommended way to implement it.
///
/// Trait objects of traits that have `RefCounted` as a supertrait are themselves `RefCounted`,
/// with `ref_count` dispatching to the concrete object, so a handle to `dyn Trait` shares its
/// count with handles to the concrete type.
///
/// # Safety
///
/// `ref_count` must always return the same counter for a given object, and the counter must live
/// inside the object (or inside an object that it owns for its whole lifetime).
/// Layered types must forward to one counter rather than embedding one per layer.
pub unsafe trait RefCounted {
    /// Returns the object's reference count
    fn ref_count(&self) -> &RefCount;
}

// Lets derived implementations forward to a `RefCount` field and to an embedded base object in
// the same way.
unsafe impl RefCounted for RefCount {
    fn ref_count(&self) -> &RefCount {
        self
    }
}

/// Increments the reference count of the object at `ptr`
///
/// Null pointers are ignored.
///
/// # Safety
///
/// A non-null `ptr` must point to a live object.
pub unsafe fn retain<T: ?Sized + RefCounted>(ptr: *const T) {
    let Some(object) = (unsafe { ptr.as_ref() }) else {
        return;
    };

    let previous = object.ref_count().0.increment();

    if previous >= MAX_REF_COUNT {
        process::abort();
    }
}

/// Decrements the reference count of the object at `ptr`, destroying the object if this was the
/// last reference
///
/// Null pointers are ignored. Releasing an object that has no references is a double release,
/// which panics in debug builds.
///
/// # Safety
///
/// A non-null `ptr` must point to a live object that was allocated with `Box`, and the caller
/// must own one of the object's references, which is consumed by the call.
pub unsafe fn release<T: ?Sized + RefCounted>(ptr: *const T) {
    let Some(object) = (unsafe { ptr.as_ref() }) else {
        return;
    };

    let count = object.ref_count();
    let previous = count.0.decrement();
    debug_assert!(
        previous != 0,
        "released the object at {} with a reference count of zero",
        Address::from(ptr)
    );

    if previous != 1 {
        return;
    }

    count.0.acquire_before_destroy();
    log::trace!("destroying the object at {}", Address::from(ptr));

    drop(unsafe { Box::from_raw(ptr.cast_mut()) });
}
