use crate::attributes::{is_ref_count_marker, ref_counted_attributes};
use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, Field, Fields, Index, Member, Type, parse_macro_input,
    spanned::Spanned,
};

pub(crate) fn derive_ref_counted(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(result) => result.into(),
        Err(error) => error.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let attributes = ref_counted_attributes(&input.attrs)?;
    let krate = attributes.crate_path;

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(Error::new(
                input.ident.span(),
                "RefCounted can only be derived for structs",
            ));
        }
    };

    let member = find_count_member(fields, input)?;

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        #[automatically_derived]
        unsafe impl #impl_generics #krate::RefCounted for #name #ty_generics #where_clause {
            #[inline]
            fn ref_count(&self) -> &#krate::RefCount {
                #krate::RefCounted::ref_count(&self.#member)
            }
        }
    })
}

fn find_count_member(fields: &Fields, input: &DeriveInput) -> syn::Result<Member> {
    let members = fields
        .iter()
        .enumerate()
        .map(|(i, field)| (member(i, field), field));

    let marked: Vec<_> = members
        .clone()
        .filter(|(_, field)| field.attrs.iter().any(is_ref_count_marker))
        .collect();

    match marked.as_slice() {
        [(member, _)] => return Ok(member.clone()),
        [_, (_, second), ..] => {
            return Err(Error::new(
                second.span(),
                "only one field can be marked with #[ref_count]",
            ));
        }
        [] => {}
    }

    let candidates: Vec<_> = members
        .filter(|(_, field)| is_ref_count_type(&field.ty))
        .collect();

    match candidates.as_slice() {
        [(member, _)] => Ok(member.clone()),
        [] => Err(Error::new(
            input.ident.span(),
            "expected a field of type RefCount, or a field marked with #[ref_count]",
        )),
        [_, (_, second), ..] => Err(Error::new(
            second.span(),
            "more than one RefCount field, mark the shared one with #[ref_count]",
        )),
    }
}

fn member(index: usize, field: &Field) -> Member {
    match &field.ident {
        Some(ident) => Member::Named(ident.clone()),
        None => Member::Unnamed(Index::from(index)),
    }
}

fn is_ref_count_type(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "RefCount"),
        _ => false,
    }
}
