mod args;
mod config_doc;

use crate::{args::ContextArgs, config_doc::*};
use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use quote::{ToTokens, quote};
use syn::{Fields, LitStr, parse_macro_input, spanned::Spanned};

/// Generates `demo_yaml()` for a configuration struct: a commented YAML document
/// built from the field docs, `#[config_demo]` values and type defaults.
#[proc_macro_derive(ConfigDoc, attributes(config_demo))]
pub fn derive_config_doc(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as syn::DeriveInput);
	let name = &input.ident;

	let syn::Data::Struct(data) = &input.data else {
		return syn::Error::new(input.span(), "ConfigDoc can only be derived for structs with named fields")
			.to_compile_error()
			.into();
	};
	let Fields::Named(fields) = &data.fields else {
		return syn::Error::new(data.struct_token.span(), "ConfigDoc requires a struct with named fields")
			.to_compile_error()
			.into();
	};

	let blocks = fields.named.iter().map(|field| {
		let Some(ident) = field.ident.as_ref() else {
			return quote! {};
		};
		let ty = &field.ty;
		let key = serde_rename(&field.attrs).unwrap_or_else(|| ident.to_string());
		let key_lit = LitStr::new(&key, Span::call_site());
		let doc = collect_doc(&field.attrs);
		let doc_lit = LitStr::new(&doc, Span::call_site());

		let doc_block = if doc.is_empty() {
			quote! {}
		} else {
			quote! {
				for line in #doc_lit.lines() {
					__s.push_str(&__sp(__indent));
					__s.push_str("# ");
					__s.push_str(line);
					__s.push('\n');
				}
			}
		};

		if has_serde_flatten(&field.attrs) {
			return quote! {
				#doc_block
				__s.push_str(&<#ty>::demo_yaml_with_indent(__indent));
			};
		}

		if is_nested_section(ty) {
			return quote! {
				#doc_block
				__s.push_str(&__sp(__indent));
				__s.push_str(#key_lit);
				__s.push_str(":\n");
				__s.push_str(&<#ty>::demo_yaml_with_indent(__indent + 2));
			};
		}

		let value: TokenStream2 = if let Some(demo) = demo_value(&field.attrs) {
			let demo_lit = LitStr::new(&demo, Span::call_site());
			quote! { __s.push_str(#demo_lit); }
		} else if is_map(ty) {
			quote! { __s.push_str("{}"); }
		} else if is_vec(ty) {
			quote! { __s.push_str("[]"); }
		} else if is_option(ty) {
			quote! { __s.push_str("null"); }
		} else if is_path(ty) {
			quote! { __s.push_str("\"\""); }
		} else {
			quote! {
				let __v: #ty = ::core::default::Default::default();
				let __y = ::serde_yaml_ng::to_string(&__v).unwrap_or_default();
				__s.push_str(__y.trim());
			}
		};

		quote! {
			#doc_block
			__s.push_str(&__sp(__indent));
			__s.push_str(#key_lit);
			__s.push_str(": ");
			#value
			__s.push('\n');
		}
	});

	let expanded = quote! {
		impl #name {
			pub fn demo_yaml() -> String {
				Self::demo_yaml_with_indent(0)
			}

			pub(crate) fn demo_yaml_with_indent(__indent: usize) -> String {
				let mut __s = String::new();
				let __sp = |n: usize| -> String { " ".repeat(n) };
				#( { #blocks } )*
				__s
			}
		}
	};

	TokenStream::from(expanded)
}

/// Wraps the body of a function returning `anyhow::Result` so that every error
/// leaving it carries an additional context line built with `format!`.
///
/// ```ignore
/// #[context("opening cache database '{}'", path.display())]
/// fn open(path: &Path) -> Result<Connection> { ... }
/// ```
#[proc_macro_attribute]
pub fn context(args: TokenStream, input: TokenStream) -> TokenStream {
	let ContextArgs { move_token, message } = parse_macro_input!(args);
	let mut input = parse_macro_input!(input as syn::ItemFn);

	if let Some(asyncness) = input.sig.asyncness {
		return syn::Error::new_spanned(asyncness, "#[context] does not support async functions")
			.to_compile_error()
			.into();
	}

	let body = &input.block;
	let return_type = &input.sig.output;
	let err = Ident::new("err", Span::mixed_site());
	let once = Ident::new("once", Span::mixed_site());
	let new_body = quote! {
		// Capturing a non-`Copy` value makes the closure `FnOnce` for borrowck.
		let #once = ::core::iter::empty::<()>();
		(#move_token || #return_type {
			::core::mem::drop(#once);
			#body
		})().map_err(|#err| #err.context(format!(#message)).into())
	};
	input.block.stmts = vec![syn::Stmt::Expr(syn::Expr::Verbatim(new_body), None)];

	input.into_token_stream().into()
}
