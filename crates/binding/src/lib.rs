//! Binds intrusively counted objects to a host runtime
//!
//! A host runtime that exposes native objects needs a pointer type to own them on its side.
//! The [Holder] trait describes what the runtime needs from such a pointer: adopting an address
//! whose reference has already been accounted for, wrapping an address that's owned elsewhere,
//! and getting the address back. [IntrusivePtr](tether_memory::IntrusivePtr) implements it, which
//! allows objects to cross between native code and the runtime as raw addresses without losing
//! track of ownership.
//!
//! [Module] and [ClassBuilder] model the runtime side of the boundary: classes are registered with
//! a holder type, properties, methods, constructors, and an optional base class, and instances are
//! exposed to the runtime as [Object]s.

#![warn(missing_docs)]

mod class;
pub mod demo;
mod error;
mod holder;
mod module;
mod object;
mod send_sync;
mod value;

pub use crate::{
    class::{ClassBuilder, check_arg_count},
    error::{BindingError, Result},
    holder::Holder,
    module::{Module, ModuleSettings},
    object::Object,
    send_sync::{BindingSend, BindingSync},
    value::Value,
};
