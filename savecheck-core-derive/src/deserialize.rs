use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Fields, ItemStruct, LitStr};

/// Fields are read in declaration order; named structs only, since field names end up in error
/// messages.
pub fn derive_deserialize_impl(st: ItemStruct) -> syn::Result<TokenStream> {
    let Fields::Named(fields) = &st.fields else {
        return Err(syn::Error::new(
            st.span(),
            "Deserialize can only be derived for structs with named fields",
        ));
    };

    let mut variables = vec![];
    let mut constructor_fields = vec![];
    for field in &fields.named {
        let Some(field_name) = field.ident.clone() else {
            continue;
        };
        let field_type = field.ty.clone();
        let error = LitStr::new(
            &format!("cannot deserialize field {}::{}", st.ident, field_name),
            field.span(),
        );

        variables.push(quote! {
            let #field_name: #field_type = ::savecheck_core::binary::ResultContextExt::context(
                ::savecheck_core::binary::Deserialize::deserialize(deserializer),
                #error,
            )?;
        });
        constructor_fields.push(quote! { #field_name, })
    }

    let type_name = st.ident;
    let (impl_generics, type_generics, where_clause) = st.generics.split_for_impl();
    let variables = TokenStream::from_iter(variables);
    let constructor_fields = TokenStream::from_iter(constructor_fields);

    Ok(quote! {
        impl #impl_generics ::savecheck_core::binary::Deserialize for #type_name #type_generics #where_clause {
            fn deserialize(
                deserializer: &mut ::savecheck_core::binary::Deserializer<impl ::std::io::Read>,
            ) -> ::std::result::Result<Self, ::savecheck_core::binary::Error> {
                #variables
                ::std::result::Result::Ok(Self {
                    #constructor_fields
                })
            }
        }
    })
}
