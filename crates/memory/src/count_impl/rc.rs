use std::cell::Cell;

/// A single-threaded counter
#[derive(Debug)]
pub(crate) struct CountImpl(Cell<usize>);

impl CountImpl {
    pub(crate) const fn new() -> Self {
        Self(Cell::new(0))
    }

    #[inline]
    pub(crate) fn load(&self) -> usize {
        self.0.get()
    }

    #[inline]
    pub(crate) fn increment(&self) -> usize {
        let previous = self.0.get();
        self.0.set(previous.wrapping_add(1));
        previous
    }

    #[inline]
    pub(crate) fn decrement(&self) -> usize {
        let previous = self.0.get();
        self.0.set(previous.wrapping_sub(1));
        previous
    }

    #[inline]
    pub(crate) fn acquire_before_destroy(&self) {}
}
