use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Fields, ItemStruct, LitStr};

pub fn derive_serialize_impl(st: ItemStruct) -> syn::Result<TokenStream> {
    let Fields::Named(fields) = &st.fields else {
        return Err(syn::Error::new(
            st.span(),
            "Serialize can only be derived for structs with named fields",
        ));
    };

    let mut stmts = vec![];
    for field in &fields.named {
        let Some(field_name) = field.ident.clone() else {
            continue;
        };
        let error = LitStr::new(
            &format!("cannot serialize field {}::{}", st.ident, field_name),
            field.span(),
        );
        stmts.push(quote! {
            ::savecheck_core::binary::ResultContextExt::context(
                ::savecheck_core::binary::Serialize::serialize(&self.#field_name, serializer),
                #error,
            )?;
        });
    }

    let type_name = st.ident;
    let (impl_generics, type_generics, where_clause) = st.generics.split_for_impl();
    let stmts = TokenStream::from_iter(stmts);

    Ok(quote! {
        impl #impl_generics ::savecheck_core::binary::Serialize for #type_name #type_generics #where_clause {
            fn serialize(
                &self,
                serializer: &mut ::savecheck_core::binary::Serializer<impl ::std::io::Write>,
            ) -> ::std::result::Result<(), ::savecheck_core::binary::Error> {
                #stmts
                ::std::result::Result::Ok(())
            }
        }
    })
}
