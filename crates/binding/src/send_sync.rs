//! Definitions of Send and Sync used by the binding layer
//!
//! When Tether is being used in a single-threaded context [BindingSend] and [BindingSync] are
//! empty traits implemented for all types.

#[cfg(feature = "rc")]
mod traits {
    /// An empty trait for single-threaded contexts, implemented for all types
    pub trait BindingSend {}
    impl<T: ?Sized> BindingSend for T {}

    /// An empty trait for single-threaded contexts, implemented for all types
    pub trait BindingSync {}
    impl<T: ?Sized> BindingSync for T {}
}

#[cfg(not(feature = "rc"))]
mod traits {
    pub use Send as BindingSend;
    pub use Sync as BindingSync;
}

pub use traits::*;
