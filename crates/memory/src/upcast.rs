use std::ptr::NonNull;

/// Covariant conversion from a pointer to `Self` into a pointer to `U`
///
/// Every type upcasts to itself. Unsizing conversions, typically from a concrete type to a trait
/// object that it implements, are declared with [impl_upcast](crate::impl_upcast).
///
/// Until `CoerceUnsized` is stabilized, handles can't be coerced directly, so the conversion is
/// performed on the inner pointer.
///
/// # Safety
///
/// The returned pointer must refer to the same object, and dropping a `Box<U>` made from it must
/// be equivalent to dropping the original `Box<Self>`.
pub unsafe trait Upcast<U: ?Sized> {
    /// Converts the pointer
    fn upcast_ptr(ptr: NonNull<Self>) -> NonNull<U>;
}

unsafe impl<T: ?Sized> Upcast<T> for T {
    fn upcast_ptr(ptr: NonNull<Self>) -> NonNull<T> {
        ptr
    }
}

/// Declares that a type can be upcast to one or more trait object types
///
/// The conversion is checked by the compiler: only unsizing coercions are accepted.
///
/// # Example
///
/// ```
/// use tether_memory::{IntrusivePtr, RefCount, RefCounted, impl_upcast};
///
/// trait Shape: RefCounted {
///     fn area(&self) -> f64;
/// }
///
/// #[derive(Default, RefCounted)]
/// struct Square {
///     ref_count: RefCount,
///     side: f64,
/// }
///
/// impl Shape for Square {
///     fn area(&self) -> f64 {
///         self.side * self.side
///     }
/// }
///
/// impl_upcast!(Square => dyn Shape);
///
/// let square = IntrusivePtr::new(Square { side: 2.0, ..Default::default() });
/// let shape: IntrusivePtr<dyn Shape> = square.upcast_ref();
/// assert_eq!(shape.area(), 4.0);
/// assert_eq!(IntrusivePtr::ref_count(&square), 2);
/// ```
#[macro_export]
macro_rules! impl_upcast {
    ($from:ty => $($to:ty),+ $(,)?) => {
        $(
            unsafe impl $crate::Upcast<$to> for $from {
                fn upcast_ptr(ptr: ::core::ptr::NonNull<Self>) -> ::core::ptr::NonNull<$to> {
                    ptr
                }
            }
        )+
    };
}
