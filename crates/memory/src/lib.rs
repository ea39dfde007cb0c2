//! Intrusive reference counting for Tether
//!
//! Objects that opt in to shared ownership embed a single [RefCount], and expose it by
//! implementing [RefCounted] (usually via `#[derive(RefCounted)]`). An [IntrusivePtr] is a
//! nullable handle to such an object; cloning a handle retains the object, and dropping the last
//! handle destroys it.
//!
//! Because the count lives inside the object, a handle can be turned into a raw address and back
//! again without losing track of ownership, which is what makes these pointers suitable as the
//! holder type of a foreign runtime's wrapped objects.
//!
//! Cycles are never reclaimed, there are no weak references.

#![warn(missing_docs)]

#[cfg(all(feature = "arc", feature = "rc"))]
compile_error!("A single counting scheme can be enabled at a time");

#[cfg(not(any(feature = "arc", feature = "rc")))]
compile_error!("Either the 'arc' or the 'rc' feature needs to be enabled");

// Allows `#[derive(RefCounted)]` to be used within this crate
extern crate self as tether_memory;

mod address;
pub mod cast;
mod count;
mod count_impl;
mod ptr;
mod read_only;
mod upcast;

pub use crate::{
    address::Address,
    count::{RefCount, RefCounted, release, retain},
    ptr::IntrusivePtr,
    read_only::ReadOnly,
    upcast::Upcast,
};
pub use downcast_rs::{Downcast, impl_downcast};
pub use tether_derive::RefCounted;
