use std::collections::HashSet;

use proc_macro2::Span;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{braced, Error, Ident, Result, Token};

/// One `FEATURE { symbol, ... }` block.
pub struct FeatureBlock {
    pub name: Ident,
    pub symbols: Punctuated<Ident, Token![,]>,
}

impl Parse for FeatureBlock {
    fn parse(input: ParseStream) -> Result<Self> {
        let name: Ident = input.parse()?;
        let content;
        braced!(content in input);
        let symbols = content.parse_terminated(Ident::parse, Token![,])?;
        Ok(Self { name, symbols })
    }
}

pub struct RegistryData {
    pub features: Vec<FeatureBlock>,
}

impl Parse for RegistryData {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut features = Vec::new();
        while !input.is_empty() {
            features.push(input.parse()?);
        }
        Ok(Self { features })
    }
}

impl RegistryData {
    /// Total number of symbols across every feature block.
    pub fn len(&self) -> usize {
        self.features.iter().map(|f| f.symbols.len()).sum()
    }

    /// Rejects input the runtime `Registry` cannot represent.
    ///
    /// Every problem found is reported at once, combined into a single error.
    pub fn validate(self) -> Result<Self> {
        let mut errors = vec![];
        let mut seen_features = HashSet::new();
        let mut seen_symbols = HashSet::new();

        if self.features.is_empty() {
            errors.push(Error::new(
                Span::call_site(),
                "registry is empty. Suggest using: `FEATURE { symbol, ... }`.",
            ));
        }
        for feature in &self.features {
            if !seen_features.insert(feature.name.to_string()) {
                errors.push(Error::new(
                    feature.name.span(),
                    format!("feature `{}` is already defined", feature.name),
                ));
            }
            for symbol in &feature.symbols {
                if !seen_symbols.insert(symbol.to_string()) {
                    errors.push(Error::new(
                        symbol.span(),
                        format!("symbol `{symbol}` is already defined"),
                    ));
                }
            }
        }
        // features and symbols both become constants next to `REGISTRY`
        for feature in &self.features {
            if seen_symbols.contains(&feature.name.to_string()) {
                errors.push(Error::new(
                    feature.name.span(),
                    format!("feature `{}` has the same name as a symbol", feature.name),
                ));
            }
        }
        let reserved = self
            .features
            .iter()
            .map(|f| &f.name)
            .chain(self.features.iter().flat_map(|f| &f.symbols))
            .filter(|ident| *ident == "REGISTRY");
        for ident in reserved {
            errors.push(Error::new(ident.span(), "`REGISTRY` is reserved for the generated registry"));
        }
        if self.len() > usize::from(u16::MAX) {
            errors.push(Error::new(
                Span::call_site(),
                "registry holds more symbols than a `SymbolId` can index",
            ));
        }

        // if there are any errors this will immediately combine and return early.
        match errors.pop() {
            Some(mut main_err) => {
                for err in errors {
                    main_err.combine(err);
                }
                Err(main_err)
            }
            None => Ok(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    fn check(input: proc_macro2::TokenStream) -> Result<RegistryData> {
        syn::parse2::<RegistryData>(input).and_then(RegistryData::validate)
    }

    #[test]
    fn accepts_feature_blocks() {
        let data = check(quote!(CORE { foo, bar } EXTRA { baz, })).unwrap();
        assert_eq!(data.features.len(), 2);
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn rejects_empty_input() {
        assert!(check(quote!()).is_err());
    }

    #[test]
    fn rejects_duplicates() {
        let err = check(quote!(A { foo } A { bar, foo })).unwrap_err();
        assert_eq!(err.into_iter().count(), 2);
    }

    #[test]
    fn rejects_feature_named_like_symbol() {
        let err = check(quote!(foo { foo })).unwrap_err();
        assert!(err.to_string().contains("same name as a symbol"));

        let err = check(quote!(CORE { bar } bar { baz })).unwrap_err();
        assert!(err.to_string().contains("same name as a symbol"));
    }

    #[test]
    fn rejects_reserved_name() {
        let err = check(quote!(CORE { REGISTRY })).unwrap_err();
        assert!(err.to_string().contains("reserved"));
    }
}
