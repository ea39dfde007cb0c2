use crate::{RefCount, RefCounted};
use std::{fmt, ops::Deref};

/// A read-only qualification of a counted object
///
/// `IntrusivePtr<ReadOnly<T>>` refers to the same object and shares the same count as
/// `IntrusivePtr<T>`. Only `&T` is reachable through either handle, so the qualification is a
/// marker on the handle's type: APIs that take `IntrusivePtr<T>` won't accept the read-only form
/// without an explicit cast.
///
/// Handles are converted between the two forms with [cast::read_only](crate::cast::read_only)
/// and [cast::const_cast](crate::cast::const_cast).
#[repr(transparent)]
pub struct ReadOnly<T>(T);

impl<T> Deref for ReadOnly<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

unsafe impl<T: RefCounted> RefCounted for ReadOnly<T> {
    fn ref_count(&self) -> &RefCount {
        self.0.ref_count()
    }
}

impl<T: fmt::Debug> fmt::Debug for ReadOnly<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReadOnly").field(&self.0).finish()
    }
}
