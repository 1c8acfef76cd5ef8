// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason
use proc_macro::TokenStream as TokenStream1;
use proc_macro2::{Literal, TokenStream as TokenStream2};
use quote::*;

mod registry_data;
use registry_data::*;

/// Generates a symbol registry from feature-grouped entry point names.
///
/// ```ignore
/// gload::registry! {
///     GL_VERSION_1_0 { glClear, glClearColor }
///     GL_VERSION_1_1 { glDrawArrays }
/// }
/// ```
///
/// Expands in place to a `REGISTRY` static, one `SymbolId` constant per symbol
/// and one `FeatureId` constant per feature. Symbols keep the order they are
/// written in, and each feature covers a contiguous range of them.
#[proc_macro]
pub fn registry(input: TokenStream1) -> TokenStream1 {
    let input = TokenStream2::from(input);
    let data = match syn::parse2::<RegistryData>(input).and_then(RegistryData::validate) {
        Ok(data) => data,
        Err(e) => return syn::Error::into_compile_error(e).into(),
    };
    TokenStream1::from(expand(&data))
}

fn expand(data: &RegistryData) -> TokenStream2 {
    let mut names = Vec::with_capacity(data.len());
    let mut symbol_consts = TokenStream2::new();
    let mut features = Vec::with_capacity(data.features.len());
    let mut feature_consts = TokenStream2::new();

    for (feature_index, feature) in data.features.iter().enumerate() {
        let start = Literal::u16_unsuffixed(names.len() as u16);
        for symbol in &feature.symbols {
            let index = Literal::u16_unsuffixed(names.len() as u16);
            names.push(symbol.to_string());
            symbol_consts.extend(quote! {
                #[allow(non_upper_case_globals)]
                pub const #symbol: ::gload::SymbolId = ::gload::SymbolId::new(#index);
            });
        }
        let end = Literal::u16_unsuffixed(names.len() as u16);

        let feature_ident = &feature.name;
        let feature_name = feature.name.to_string();
        features.push(quote!(::gload::Feature::new(#feature_name, #start, #end)));

        let feature_index = Literal::u16_unsuffixed(feature_index as u16);
        feature_consts.extend(quote! {
            #[allow(non_upper_case_globals)]
            pub const #feature_ident: ::gload::FeatureId = ::gload::FeatureId::new(#feature_index);
        });
    }

    quote! {
        /// Entry points in resolution order, grouped by feature.
        pub static REGISTRY: ::gload::Registry =
            ::gload::Registry::from_parts(&[#(#names),*], &[#(#features),*]);
        #symbol_consts
        #feature_consts
    }
}
