use std::sync::atomic::{AtomicUsize, Ordering, fence};

/// An atomic counter, shareable between threads
#[derive(Debug)]
pub(crate) struct CountImpl(AtomicUsize);

impl CountImpl {
    pub(crate) const fn new() -> Self {
        Self(AtomicUsize::new(0))
    }

    #[inline]
    pub(crate) fn load(&self) -> usize {
        self.0.load(Ordering::Acquire)
    }

    /// Increments the count, returning the previous value
    ///
    /// New references can only be made from existing ones, so no ordering is needed here.
    #[inline]
    pub(crate) fn increment(&self) -> usize {
        self.0.fetch_add(1, Ordering::Relaxed)
    }

    /// Decrements the count, returning the previous value
    ///
    /// Uses of the object through this reference must happen before the decrement.
    #[inline]
    pub(crate) fn decrement(&self) -> usize {
        self.0.fetch_sub(1, Ordering::Release)
    }

    /// Synchronizes with every decrement that preceded the final one
    #[inline]
    pub(crate) fn acquire_before_destroy(&self) {
        fence(Ordering::Acquire);
    }
}
