//! Derive macros for ic10sema's keyword enums and its diagnostic type.

use proc_macro::TokenStream;
use proc_macro2::{Delimiter, TokenTree};
use quote::{ToTokens, quote};

fn unit_variants(data: &syn::DataEnum, derive_name: &str) -> Vec<syn::Ident> {
	data.variants
		.iter()
		.map(|variant| match variant.fields {
			syn::Fields::Unit => variant.ident.clone(),
			_ => panic!(
				"{derive_name} cannot be derived for enums containing non-unit variants; variant {} is not a unit.",
				variant.to_token_stream()
			),
		})
		.collect()
}

/// Derives `crate::parser::Parse` for a unit-only enum. The accepted spelling of every variant is its identifier, which
/// matches the game's PascalCase keyword spelling.
#[proc_macro_derive(Parse)]
pub fn parse_macro_derive(input: TokenStream) -> TokenStream {
	let type_ = syn::parse::<syn::DeriveInput>(input).unwrap();

	match type_.data {
		syn::Data::Enum(enum_) => {
			let name = type_.ident;
			let variant_identifiers = unit_variants(&enum_, "Parse");
			let variant_strings = variant_identifiers.iter().map(ToString::to_string).collect::<Vec<_>>();

			quote! {
				#[automatically_derived]
				#[allow(missing_docs)]
				impl crate::parser::Parse for #name {
					fn parse(value: &str) -> Option<Self> {
						Some(match value {
							#( #variant_strings => Self::#variant_identifiers, )*
							_ => return None,
						})
					}

					fn parse_ignore_case(value: &str) -> Option<Self> {
						#( if value.eq_ignore_ascii_case(#variant_strings) { return Some(Self::#variant_identifiers); } )*
						None
					}
				}
			}
			.into()
		},
		_ => panic!("Parse cannot be derived for non-enum types."),
	}
}

/// Derives `crate::VariantName`, returning the identifier of the active variant.
#[proc_macro_derive(VariantName)]
pub fn variant_name_derive(input: TokenStream) -> TokenStream {
	let type_ = syn::parse::<syn::DeriveInput>(input).unwrap();

	match type_.data {
		syn::Data::Enum(enum_) => {
			let name = type_.ident;
			let arms = enum_.variants.iter().map(|variant| {
				let identifier = &variant.ident;
				let string = identifier.to_string();
				quote! { Self::#identifier { .. } => #string }
			});

			quote! {
				#[automatically_derived]
				impl crate::VariantName for #name {
					fn variant_name(&self) -> &'static str {
						match self {
							#( #arms, )*
						}
					}
				}
			}
			.into()
		},
		_ => panic!("VariantName cannot be derived for non-enum types."),
	}
}

/// Extracts the `code(...)` path out of a `#[diagnostic(...)]` attribute.
fn diagnostic_code(attribute: &syn::Attribute) -> Option<String> {
	if !attribute.path().is_ident("diagnostic") {
		return None;
	}
	let syn::Meta::List(list) = &attribute.meta else {
		return None;
	};
	let mut tokens = list.tokens.clone().into_iter();
	while let Some(token) = tokens.next() {
		if let TokenTree::Ident(ident) = &token
			&& ident == "code"
			&& let Some(TokenTree::Group(group)) = tokens.next()
			&& group.delimiter() == Delimiter::Parenthesis
		{
			return Some(group.stream().to_string().chars().filter(|chr| !chr.is_whitespace()).collect());
		}
	}
	None
}

/// Derives `crate::error::ErrorCodes`, collecting every distinct miette diagnostic code of the enum.
#[proc_macro_derive(ErrorCodes)]
pub fn error_codes_derive(input: TokenStream) -> TokenStream {
	let type_ = syn::parse::<syn::DeriveInput>(input).unwrap();

	match type_.data {
		syn::Data::Enum(enum_) => {
			let name = type_.ident;
			let mut codes = Vec::new();
			for variant in &enum_.variants {
				for code in variant.attrs.iter().filter_map(diagnostic_code) {
					if !codes.contains(&code) {
						codes.push(code);
					}
				}
			}

			quote! {
				#[automatically_derived]
				impl crate::error::ErrorCodes for #name {
					fn all_codes() -> &'static [&'static str] {
						&[ #( #codes ),* ]
					}
				}
			}
			.into()
		},
		_ => panic!("ErrorCodes cannot be derived for non-enum types."),
	}
}
