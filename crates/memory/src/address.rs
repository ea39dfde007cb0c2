use std::{
    fmt,
    hash::{Hash, Hasher},
    ptr,
};

/// A wrapper for comparing and hashing object addresses
///
/// Only the data part of a pointer is kept, so a handle to a trait object and a handle to the
/// concrete object compare as equal when they refer to the same allocation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Address(*const u8);

impl Address {
    /// The null address, matched by empty handles
    pub const fn null() -> Self {
        Self(ptr::null())
    }

    /// Returns true if this is the null address
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: ?Sized> From<*const T> for Address {
    fn from(pointer: *const T) -> Self {
        Self(pointer as *const u8)
    }
}

impl<T: ?Sized> From<*mut T> for Address {
    fn from(pointer: *mut T) -> Self {
        Self(pointer as *const u8)
    }
}

impl<T: ?Sized> From<&T> for Address {
    fn from(reference: &T) -> Self {
        Self(reference as *const T as *const u8)
    }
}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.0 as usize);
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

// Addresses are only compared and displayed, never dereferenced
unsafe impl Send for Address {}
unsafe impl Sync for Address {}
