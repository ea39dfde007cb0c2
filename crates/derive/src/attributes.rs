use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Path};

pub(crate) struct RefCountedAttributes {
    pub crate_path: TokenStream,
}

impl Default for RefCountedAttributes {
    fn default() -> Self {
        Self {
            crate_path: quote!(::tether_memory),
        }
    }
}

pub(crate) fn ref_counted_attributes(attrs: &[Attribute]) -> syn::Result<RefCountedAttributes> {
    let mut result = RefCountedAttributes::default();

    for attr in attrs.iter().filter(|a| a.path().is_ident("ref_counted")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("crate") {
                let path: Path = meta.value()?.parse()?;
                result.crate_path = quote!(#path);
                Ok(())
            } else {
                Err(meta.error("unsupported ref_counted attribute"))
            }
        })?;
    }

    Ok(result)
}

pub(crate) fn is_ref_count_marker(attr: &Attribute) -> bool {
    attr.path().is_ident("ref_count")
}
