//! The `#[hook]` attribute.

use crate::{MacroArgs, ensure_async, mut_ref_arg};
use proc_macro::TokenStream;
use quote::quote;
use syn::{FnArg, ItemFn, parse_macro_input};

pub fn hook_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as MacroArgs);
    let input = parse_macro_input!(item as ItemFn);

    expand(&args, &input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(args: &MacroArgs, input: &ItemFn) -> syn::Result<proc_macro2::TokenStream> {
    ensure_async(input, "Hook")?;

    let inputs = &input.sig.inputs;
    if inputs.len() != 2 {
        return Err(syn::Error::new_spanned(
            inputs,
            "Hook function must take (req: &mut Req, res: &mut Res)",
        ));
    }

    let arguments: Vec<&FnArg> = inputs.iter().collect();
    let (req_pat, req_ty) = mut_ref_arg(arguments.first().copied(), "req")?;
    let (res_pat, res_ty) = mut_ref_arg(arguments.get(1).copied(), "res")?;

    let fn_name = &input.sig.ident;
    let fn_vis = &input.vis;
    let fn_block = &input.block;
    let struct_name = args.struct_name(input);

    Ok(quote! {
        #[allow(non_camel_case_types)]
        #[derive(Clone, Copy, Debug, Default)]
        #[doc = concat!("Hook generated by `#[switchyard::hook]` on `", stringify!(#fn_name), "`")]
        #fn_vis struct #struct_name;

        impl ::switchyard::Hook<#req_ty, #res_ty> for #struct_name {
            async fn on_request(
                &self,
                #req_pat: &mut #req_ty,
                #res_pat: &mut #res_ty,
            ) -> ::core::result::Result<::switchyard::HookResult, ::switchyard::BoxError> {
                #fn_block
            }
        }
    })
}
