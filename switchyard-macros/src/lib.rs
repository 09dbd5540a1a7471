//! Procedural macros for Switchyard.
//!
//! - `#[middleware]` - turn an `async fn(req, res, next)` into a `Middleware`
//! - `#[hook]` - turn an `async fn(req, res)` into a `Hook`
//!
//! Both generate a unit struct named after the function (or after the
//! `name = "..."` argument), so the item can be registered by value:
//!
//! ```rust,ignore
//! #[switchyard::middleware]
//! async fn powered_by(
//!     req: &mut MyRequest,
//!     res: &mut MyResponse,
//!     next: Next<'_, MyRequest, MyResponse>,
//! ) -> Result<Outcome<()>, BoxError> {
//!     res.set_header("x-powered-by", "switchyard");
//!     next.run(req, res).await
//! }
//!
//! let router = Router::builder().using(powered_by).build()?;
//! ```

use proc_macro::TokenStream;
use syn::{
    FnArg, Ident, ItemFn, LitStr, Pat, Token, Type,
    parse::{Parse, ParseStream},
};

mod hook;
mod middleware;

/// Turn an async function into a unit struct implementing `Middleware`.
///
/// The function takes `&mut Req`, `&mut Res` and `Next<'_, Req, Res, V>`
/// (`V` defaults to `()` when omitted) and returns
/// `Result<Outcome<V>, BoxError>`.
#[proc_macro_attribute]
pub fn middleware(attr: TokenStream, item: TokenStream) -> TokenStream {
    middleware::middleware_impl(attr, item)
}

/// Turn an async function into a unit struct implementing `Hook`.
///
/// The function takes `&mut Req` and `&mut Res` and returns
/// `Result<HookResult, BoxError>`.
#[proc_macro_attribute]
pub fn hook(attr: TokenStream, item: TokenStream) -> TokenStream {
    hook::hook_impl(attr, item)
}

/// Arguments shared by the attribute macros.
struct MacroArgs {
    name: Option<String>,
}

impl Parse for MacroArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut name = None;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "name" => {
                    let lit: LitStr = input.parse()?;
                    name = Some(lit.value());
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(MacroArgs { name })
    }
}

impl MacroArgs {
    /// The generated struct's name.
    fn struct_name(&self, item: &ItemFn) -> Ident {
        match &self.name {
            Some(custom) => Ident::new(custom, item.sig.ident.span()),
            None => item.sig.ident.clone(),
        }
    }
}

fn ensure_async(item: &ItemFn, what: &str) -> syn::Result<()> {
    if item.sig.asyncness.is_none() {
        return Err(syn::Error::new_spanned(
            item.sig.fn_token,
            format!("{what} function must be async"),
        ));
    }
    Ok(())
}

/// Split a `name: &mut T` argument into its pattern and `T`.
fn mut_ref_arg<'i>(arg: Option<&'i FnArg>, role: &str) -> syn::Result<(&'i Pat, &'i Type)> {
    let Some(FnArg::Typed(pat_type)) = arg else {
        return Err(syn::Error::new(
            proc_macro2::Span::call_site(),
            format!("expected a `{role}: &mut {role_ty}` argument", role_ty = capitalize(role)),
        ));
    };
    match &*pat_type.ty {
        Type::Reference(reference) if reference.mutability.is_some() => {
            Ok((&pat_type.pat, &reference.elem))
        }
        other => Err(syn::Error::new_spanned(
            other,
            format!("the {role} argument must be a mutable reference"),
        )),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
