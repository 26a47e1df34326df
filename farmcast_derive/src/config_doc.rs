//! Field classification helpers for `#[derive(ConfigDoc)]`.

use syn::Type;

/// Joins all `///` lines on a field into one newline separated string.
pub fn collect_doc(attrs: &[syn::Attribute]) -> String {
	attrs
		.iter()
		.filter(|attr| attr.path().is_ident("doc"))
		.filter_map(|attr| match &attr.meta {
			syn::Meta::NameValue(nv) => match &nv.value {
				syn::Expr::Lit(syn::ExprLit {
					lit: syn::Lit::Str(lit), ..
				}) => Some(lit.value().trim().to_string()),
				_ => None,
			},
			_ => None,
		})
		.collect::<Vec<_>>()
		.join("\n")
}

/// Returns the `#[serde(rename = "...")]` value, if any.
pub fn serde_rename(attrs: &[syn::Attribute]) -> Option<String> {
	let mut out: Option<String> = None;
	for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
		let _ = attr.parse_nested_meta(|meta| {
			if meta.path.is_ident("rename")
				&& let Ok(value) = meta.value()
				&& let Ok(lit) = value.parse::<syn::LitStr>()
			{
				out = Some(lit.value());
			}
			Ok(())
		});
		if out.is_some() {
			break;
		}
	}
	out
}

/// Returns the last path segment ident if the type is a path.
pub fn path_ident(ty: &Type) -> Option<&syn::Ident> {
	if let Type::Path(tp) = ty {
		tp.path.segments.last().map(|seg| &seg.ident)
	} else {
		None
	}
}

fn ident_is(ty: &Type, names: &[&str]) -> bool {
	path_ident(ty).is_some_and(|ident| names.iter().any(|name| ident == name))
}

pub fn is_option(ty: &Type) -> bool {
	ident_is(ty, &["Option"])
}

pub fn is_vec(ty: &Type) -> bool {
	ident_is(ty, &["Vec"])
}

pub fn is_map(ty: &Type) -> bool {
	ident_is(ty, &["HashMap", "BTreeMap"])
}

/// Filesystem paths are rendered as strings in YAML.
pub fn is_path(ty: &Type) -> bool {
	ident_is(ty, &["PathBuf", "Path"])
}

/// bool, integers, floats and `String`.
pub fn is_primitive_like(ty: &Type) -> bool {
	ident_is(
		ty,
		&[
			"bool", "String", "u8", "u16", "u32", "u64", "usize", "i8", "i16", "i32", "i64", "isize", "f32", "f64",
		],
	)
}

/// Anything path-typed that is not a known leaf is treated as a nested config section.
pub fn is_nested_section(ty: &Type) -> bool {
	path_ident(ty).is_some() && !is_option(ty) && !is_vec(ty) && !is_map(ty) && !is_path(ty) && !is_primitive_like(ty)
}

/// Detects `#[serde(flatten)]` on a field.
pub fn has_serde_flatten(attrs: &[syn::Attribute]) -> bool {
	let mut found = false;
	for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
		let _ = attr.parse_nested_meta(|meta| {
			if meta.path.is_ident("flatten") {
				found = true;
			}
			Ok(())
		});
	}
	found
}

/// Reads `#[config_demo("...")]` or `#[config_demo(value = "...")]`.
pub fn demo_value(attrs: &[syn::Attribute]) -> Option<String> {
	let mut demo = None;
	for attr in attrs.iter().filter(|attr| attr.path().is_ident("config_demo")) {
		if let Ok(lit) = attr.parse_args::<syn::LitStr>() {
			return Some(lit.value());
		}
		let _ = attr.parse_nested_meta(|meta| {
			if meta.path.is_ident("value")
				&& let Ok(value) = meta.value()
				&& let Ok(lit) = value.parse::<syn::LitStr>()
			{
				demo = Some(lit.value());
			}
			Ok(())
		});
	}
	demo
}
