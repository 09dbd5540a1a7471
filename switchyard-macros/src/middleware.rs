//! The `#[middleware]` attribute.

use crate::{MacroArgs, ensure_async, mut_ref_arg};
use proc_macro::TokenStream;
use quote::quote;
use syn::{FnArg, GenericArgument, ItemFn, PathArguments, Type, parse_macro_input};

pub fn middleware_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as MacroArgs);
    let input = parse_macro_input!(item as ItemFn);

    expand(&args, &input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(args: &MacroArgs, input: &ItemFn) -> syn::Result<proc_macro2::TokenStream> {
    ensure_async(input, "Middleware")?;

    let inputs = &input.sig.inputs;
    if inputs.len() != 3 {
        return Err(syn::Error::new_spanned(
            inputs,
            "Middleware function must take (req: &mut Req, res: &mut Res, next: Next<'_, Req, Res, V>)",
        ));
    }

    let arguments: Vec<&FnArg> = inputs.iter().collect();
    let (req_pat, req_ty) = mut_ref_arg(arguments.first().copied(), "req")?;
    let (res_pat, res_ty) = mut_ref_arg(arguments.get(1).copied(), "res")?;
    let (next_pat, value_ty) = next_arg(arguments.get(2).copied())?;

    let fn_name = &input.sig.ident;
    let fn_vis = &input.vis;
    let fn_block = &input.block;
    let struct_name = args.struct_name(input);

    Ok(quote! {
        #[allow(non_camel_case_types)]
        #[derive(Clone, Copy, Debug, Default)]
        #[doc = concat!("Middleware generated by `#[switchyard::middleware]` on `", stringify!(#fn_name), "`")]
        #fn_vis struct #struct_name;

        impl ::switchyard::Middleware<#req_ty, #res_ty, #value_ty> for #struct_name {
            async fn handle<'__a>(
                &'__a self,
                #req_pat: &'__a mut #req_ty,
                #res_pat: &'__a mut #res_ty,
                #next_pat: ::switchyard::Next<'__a, #req_ty, #res_ty, #value_ty>,
            ) -> ::core::result::Result<::switchyard::Outcome<#value_ty>, ::switchyard::BoxError> {
                #fn_block
            }
        }
    })
}

/// Extract the pattern and value type of the `next: Next<'_, Req, Res, V>` argument.
fn next_arg(arg: Option<&FnArg>) -> syn::Result<(&syn::Pat, proc_macro2::TokenStream)> {
    let Some(FnArg::Typed(pat_type)) = arg else {
        return Err(syn::Error::new(
            proc_macro2::Span::call_site(),
            "expected a `next: Next<'_, Req, Res, V>` argument",
        ));
    };

    let Type::Path(path) = &*pat_type.ty else {
        return Err(syn::Error::new_spanned(
            &pat_type.ty,
            "the next argument must be `Next<'_, Req, Res, V>`",
        ));
    };
    let segment = path
        .path
        .segments
        .last()
        .filter(|segment| segment.ident == "Next")
        .ok_or_else(|| {
            syn::Error::new_spanned(&pat_type.ty, "the next argument must be `Next<'_, Req, Res, V>`")
        })?;

    let types: Vec<&Type> = match &segment.arguments {
        PathArguments::AngleBracketed(generics) => generics
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    let value = match types.as_slice() {
        [_, _] => quote! { () },
        [_, _, value] => quote! { #value },
        _ => {
            return Err(syn::Error::new_spanned(
                segment,
                "expected `Next<'_, Req, Res>` or `Next<'_, Req, Res, V>`",
            ));
        }
    };

    Ok((&pat_type.pat, value))
}
