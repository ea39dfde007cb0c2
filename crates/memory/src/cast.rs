//! Explicit conversions between handle types
//!
//! Each cast comes in two forms:
//! - A copy form taking `&IntrusivePtr<T>`, which retains the object for the new handle.
//! - A move form taking `IntrusivePtr<T>`, which hands the source's reference over to the new
//!   handle without touching the count.
//!
//! Either way the number of references matches the number of live handles.

use crate::{IntrusivePtr, ReadOnly, RefCounted, Upcast};
use std::ptr::NonNull;

/// Converts the handle into a handle to a supertype, retaining the object
///
/// The relationship between the types is checked at compile time, see [Upcast].
pub fn static_cast<U, T>(ptr: &IntrusivePtr<T>) -> IntrusivePtr<U>
where
    T: ?Sized + RefCounted + Upcast<U>,
    U: ?Sized + RefCounted,
{
    ptr.upcast_ref()
}

/// Converts the handle into a handle to a supertype, transferring ownership
pub fn static_cast_move<U, T>(ptr: IntrusivePtr<T>) -> IntrusivePtr<U>
where
    T: ?Sized + RefCounted + Upcast<U>,
    U: ?Sized + RefCounted,
{
    ptr.upcast()
}

/// Adds the [ReadOnly] qualification, retaining the object
pub fn read_only<T: RefCounted>(ptr: &IntrusivePtr<T>) -> IntrusivePtr<ReadOnly<T>> {
    read_only_move(ptr.clone())
}

/// Adds the [ReadOnly] qualification, transferring ownership
pub fn read_only_move<T: RefCounted>(mut ptr: IntrusivePtr<T>) -> IntrusivePtr<ReadOnly<T>> {
    // Safety: ReadOnly is a transparent wrapper
    unsafe { IntrusivePtr::from_raw(ptr.detach().map(NonNull::cast), false) }
}

/// Removes the [ReadOnly] qualification, retaining the object
pub fn const_cast<T: RefCounted>(ptr: &IntrusivePtr<ReadOnly<T>>) -> IntrusivePtr<T> {
    const_cast_move(ptr.clone())
}

/// Removes the [ReadOnly] qualification, transferring ownership
///
/// The reference is detached from the handle itself, never from the object it refers to.
pub fn const_cast_move<T: RefCounted>(mut ptr: IntrusivePtr<ReadOnly<T>>) -> IntrusivePtr<T> {
    // Safety: ReadOnly is a transparent wrapper
    unsafe { IntrusivePtr::from_raw(ptr.detach().map(NonNull::cast), false) }
}

/// Reinterprets the handle as a handle to `U`, retaining the object
///
/// # Safety
///
/// `U` must have the same layout as `T` and share its reference count, and dropping the object
/// as a `Box<U>` must be equivalent to dropping it as a `Box<T>`.
pub unsafe fn reinterpret_cast<U: RefCounted, T: RefCounted>(
    ptr: &IntrusivePtr<T>,
) -> IntrusivePtr<U> {
    unsafe { reinterpret_cast_move(ptr.clone()) }
}

/// Reinterprets the handle as a handle to `U`, transferring ownership
///
/// # Safety
///
/// See [reinterpret_cast].
pub unsafe fn reinterpret_cast_move<U: RefCounted, T: RefCounted>(
    mut ptr: IntrusivePtr<T>,
) -> IntrusivePtr<U> {
    unsafe { IntrusivePtr::from_raw(ptr.detach().map(NonNull::cast), false) }
}
