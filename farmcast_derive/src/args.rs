//! Argument parsing for the `#[context(...)]` attribute.

use proc_macro2::TokenStream as TokenStream2;
use syn::{
	Token,
	parse::{self, Parse, ParseStream},
};

/// Parsed form of `#[context([move,] "format", args...)]`.
#[derive(Debug)]
pub struct ContextArgs {
	/// Present when the body closure has to take ownership of captured values.
	pub move_token: Option<Token![move]>,
	/// Everything that is forwarded verbatim to `format!`.
	pub message: TokenStream2,
}

impl Parse for ContextArgs {
	fn parse(input: ParseStream<'_>) -> parse::Result<Self> {
		let mut move_token = None;
		if input.peek(Token![move]) {
			move_token = Some(input.parse()?);
			input.parse::<Token![,]>()?;
		}
		Ok(Self {
			move_token,
			message: input.parse()?,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::ContextArgs;
	use syn::parse_str;

	#[test]
	fn message_only() {
		let args: ContextArgs = parse_str(r#""opening cache at '{}'", path.display()"#).unwrap();
		assert!(args.move_token.is_none());
		let message = args.message.to_string();
		assert!(message.starts_with(r#""opening cache at '{}'""#), "unexpected message: {message}");
		assert!(message.contains("display"));
	}

	#[test]
	fn move_then_message() {
		let args: ContextArgs = parse_str(r#"move, "sweeping rows older than {}", now"#).unwrap();
		assert!(args.move_token.is_some());
		assert_eq!(args.message.to_string(), r#""sweeping rows older than {}" , now"#);
	}

	#[test]
	fn move_without_comma_is_rejected() {
		let err = parse_str::<ContextArgs>(r#"move "upserting""#).unwrap_err();
		assert!(err.to_string().contains(','), "unexpected error: {err}");
	}
}
