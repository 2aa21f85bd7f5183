use super::derived_traits;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Attribute, ItemFn, ItemStruct, LitBool, LitStr};

const DEFAULT_RENAME: &str = "camelCase";

/// Parsed `#[api_model(..)]` arguments.
#[derive(Default)]
struct ModelArgs {
    rename_all: Option<LitStr>,
    deny_unknown_fields: Option<LitBool>,
}

/// Serde settings already present on the struct.
#[derive(Default)]
struct ExistingSerde {
    rename_all: Option<LitStr>,
    deny_unknown_fields: bool,
}

pub fn expand_model(args: TokenStream, input: ItemStruct) -> TokenStream {
    match model_tokens(args, &input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

pub fn expand_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = input;

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[::utoipa::path(#args)]
        #vis #sig #block
    }
}

fn model_tokens(args: TokenStream, input: &ItemStruct) -> syn::Result<TokenStream> {
    let args = parse_args(args)?;
    let existing = existing_serde(&input.attrs)?;
    let derives = derived_traits(&input.attrs);

    let mut missing = Vec::new();
    if !derives.contains("Debug") {
        missing.push(quote! { Debug });
    }
    if !derives.contains("Serialize") {
        missing.push(quote! { ::serde::Serialize });
    }
    if !derives.contains("Deserialize") {
        missing.push(quote! { ::serde::Deserialize });
    }
    if !derives.contains("ToSchema") {
        missing.push(quote! { ::utoipa::ToSchema });
    }
    let derive = if missing.is_empty() { quote! {} } else { quote! { #[derive(#(#missing),*)] } };

    let wanted = args.rename_all.unwrap_or_else(|| LitStr::new(DEFAULT_RENAME, Span::call_site()));
    let rename = match &existing.rename_all {
        Some(current) if current.value() != wanted.value() => {
            return Err(syn::Error::new_spanned(
                current,
                "serde(rename_all) conflicts with api_model; drop one of them",
            ));
        },
        Some(_) => quote! {},
        None => quote! { #[serde(rename_all = #wanted)] },
    };

    let deny = args.deny_unknown_fields.as_ref().is_none_or(LitBool::value);
    let deny_attr = match (deny, existing.deny_unknown_fields) {
        (true, false) => quote! { #[serde(deny_unknown_fields)] },
        (true, true) => quote! {},
        (false, true) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "serde(deny_unknown_fields) is set; remove it before passing deny_unknown_fields = false",
            ));
        },
        (false, false) => quote! {},
    };

    Ok(quote! {
        #derive
        #rename
        #deny_attr
        #input
    })
}

fn parse_args(args: TokenStream) -> syn::Result<ModelArgs> {
    let mut parsed = ModelArgs::default();
    if args.is_empty() {
        return Ok(parsed);
    }

    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("rename_all") {
            if parsed.rename_all.is_some() {
                return Err(meta.error("duplicate rename_all"));
            }
            parsed.rename_all = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("deny_unknown_fields") {
            if parsed.deny_unknown_fields.is_some() {
                return Err(meta.error("duplicate deny_unknown_fields"));
            }
            parsed.deny_unknown_fields = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported argument; expected rename_all or deny_unknown_fields"))
        }
    });
    syn::parse::Parser::parse2(parser, args)?;

    Ok(parsed)
}

fn existing_serde(attrs: &[Attribute]) -> syn::Result<ExistingSerde> {
    let mut existing = ExistingSerde::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                existing.rename_all = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("deny_unknown_fields") {
                existing.deny_unknown_fields = true;
            } else if meta.input.peek(syn::Token![=]) {
                // Other container attributes (tag, default = "...") are left to serde.
                let _: syn::Expr = meta.value()?.parse()?;
            }
            Ok(())
        })?;
    }

    Ok(existing)
}
