//! Procedural macros shared across the tilepoints workspace.
//!
//! Currently this only provides `#[context(...)]`, which wraps a fallible
//! function body so that its `anyhow::Error` gets an extra contextual message
//! (cheaper to write than threading `.context(...)` through every call site).

mod args;

use crate::args::*;
use proc_macro::TokenStream;
use proc_macro2::{Ident, Span};
use quote::ToTokens;
use quote::quote;
use syn::parse_macro_input;

/// Adds `.context(format!(...))` to every error path of a function returning
/// `anyhow::Result<_>`. Works for both sync and `async fn`.
///
/// ```ignore
/// #[context("while decoding tile {z}/{x}/{y}")]
/// fn decode(z: u8, x: u32, y: u32) -> anyhow::Result<()> {
///     ensure!(x < (1 << z), "x out of range");
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn context(args: TokenStream, input: TokenStream) -> TokenStream {
	let Args(move_token, format_args) = parse_macro_input!(args);
	let mut input = parse_macro_input!(input as syn::ItemFn);

	let body = &input.block;
	let return_type = &input.sig.output;
	let err = Ident::new("err", Span::mixed_site());

	let new_body = if input.sig.asyncness.is_some() {
		let return_type = match return_type {
			syn::ReturnType::Default => {
				return syn::Error::new_spanned(input, "function should return Result")
					.to_compile_error()
					.into();
			}
			syn::ReturnType::Type(_, return_type) => return_type,
		};
		let result = Ident::new("result", Span::mixed_site());
		quote! {
			let #result: #return_type = async #move_token { #body }.await;
			#result.map_err(|#err| #err.context(format!(#format_args)).into())
		}
	} else {
		let force_fn_once = Ident::new("force_fn_once", Span::mixed_site());
		quote! {
			let #force_fn_once = ::core::iter::empty::<()>();
			(#move_token || #return_type {
				::core::mem::drop(#force_fn_once);
				#body
			})().map_err(|#err| #err.context(format!(#format_args)).into())
		}
	};
	input.block.stmts = vec![syn::Stmt::Expr(syn::Expr::Verbatim(new_body), None)];

	input.into_token_stream().into()
}
