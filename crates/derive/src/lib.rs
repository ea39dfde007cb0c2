//! Contains derive macros for Tether's counted objects

#![warn(missing_docs)]

mod attributes;
mod ref_counted;

use proc_macro::TokenStream;

/// Implements `RefCounted` by forwarding to the struct's embedded count
///
/// The count is taken from the field marked with `#[ref_count]`, or if no field is marked, from
/// the single field with a type named `RefCount`.
///
/// Marking a field that is itself a counted object (e.g. an embedded base object) shares that
/// object's count, so layered types still carry a single count.
///
/// `#[ref_counted(crate = path)]` overrides the path to the `tether_memory` crate, which is useful
/// when it's re-exported by another crate.
#[proc_macro_derive(RefCounted, attributes(ref_count, ref_counted))]
pub fn ref_counted_derive(input: TokenStream) -> TokenStream {
    ref_counted::derive_ref_counted(input)
}
