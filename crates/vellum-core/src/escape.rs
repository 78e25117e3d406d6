//! Escaping utilities for HTML output.
//!
//! Every function here tests its input first and returns a borrowed
//! [`Cow`] when nothing needs to change, so the common case of plain text
//! never allocates.
//!
//! | Context | Function | Replaced characters |
//! |---------|----------|---------------------|
//! | Element text | [`escape_html_text`] | `"` `&` `<` |
//! | `<style>` / `<script>` text | [`escape_style_script_text`] | `>` `&` `<` |
//! | Double-quoted attribute value | [`escape_attr_value`] | `"` |
//! | Attribute name | [`clean_attr_name`] | anything outside `[-_:.a-zA-Z0-9]` is removed |

use std::borrow::Cow;

/// Escapes text placed between element tags.
///
/// - `"` → `&quot;`
/// - `&` → `&amp;`
/// - `<` → `&lt;`
pub fn escape_html_text(s: &str) -> Cow<'_, str> {
	if !s.contains(['"', '&', '<']) {
		return Cow::Borrowed(s);
	}
	let mut escaped = String::with_capacity(s.len() + 8);
	for c in s.chars() {
		match c {
			'"' => escaped.push_str("&quot;"),
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			_ => escaped.push(c),
		}
	}
	Cow::Owned(escaped)
}

/// Escapes text placed inside a `<style>` or `<script>` element.
///
/// Quotes are left untouched since they are meaningful to CSS and JavaScript.
///
/// - `>` → `&gt;`
/// - `&` → `&amp;`
/// - `<` → `&lt;`
pub fn escape_style_script_text(s: &str) -> Cow<'_, str> {
	if !s.contains(['>', '&', '<']) {
		return Cow::Borrowed(s);
	}
	let mut escaped = String::with_capacity(s.len() + 8);
	for c in s.chars() {
		match c {
			'>' => escaped.push_str("&gt;"),
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			_ => escaped.push(c),
		}
	}
	Cow::Owned(escaped)
}

/// Escapes an attribute value. Values are always emitted double-quoted,
/// so only `"` needs replacing.
pub fn escape_attr_value(s: &str) -> Cow<'_, str> {
	if !s.contains('"') {
		return Cow::Borrowed(s);
	}
	Cow::Owned(s.replace('"', "&quot;"))
}

fn is_attr_name_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
}

/// Removes every character that is not valid in an attribute name.
///
/// ```
/// use vellum_core::escape::clean_attr_name;
///
/// assert_eq!(clean_attr_name("on click"), "onclick");
/// assert_eq!(clean_attr_name("data-id"), "data-id");
/// ```
pub fn clean_attr_name(s: &str) -> Cow<'_, str> {
	if s.chars().all(is_attr_name_char) {
		return Cow::Borrowed(s);
	}
	Cow::Owned(s.chars().filter(|c| is_attr_name_char(*c)).collect())
}

/// Converts a lowerCamelCase CSS property name to its hyphenated form
/// (`marginTop` → `margin-top`).
pub fn camel_to_kebab(s: &str) -> Cow<'_, str> {
	if !s.contains(|c: char| c.is_ascii_uppercase()) {
		return Cow::Borrowed(s);
	}
	let mut out = String::with_capacity(s.len() + 4);
	for c in s.chars() {
		if c.is_ascii_uppercase() {
			out.push('-');
			out.push(c.to_ascii_lowercase());
		} else {
			out.push(c);
		}
	}
	Cow::Owned(out)
}

/// Returns whether `tag` can be emitted as an element name without
/// breaking out of the tag.
pub fn is_valid_tag_name(tag: &str) -> bool {
	!tag.is_empty()
		&& tag
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | ':' | '.' | '_'))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("Hello World", "Hello World")]
	#[case("a&b", "a&amp;b")]
	#[case("c\"d", "c&quot;d")]
	#[case("<div>", "&lt;div>")]
	#[case("\"<&", "&quot;&lt;&amp;")]
	#[case("", "")]
	fn test_escape_html_text(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(escape_html_text(input), expected);
	}

	#[rstest]
	fn test_escape_html_text_borrows_clean_input() {
		assert!(matches!(escape_html_text("plain text"), Cow::Borrowed(_)));
		assert!(matches!(escape_html_text("a > b"), Cow::Borrowed(_)));
	}

	#[rstest]
	#[case("a > b", "a &gt; b")]
	#[case("x && y", "x &amp;&amp; y")]
	#[case("const s = \"<v>\";", "const s = \"&lt;v&gt;\";")]
	#[case("grid-template-areas:\"nav\" \"main\";", "grid-template-areas:\"nav\" \"main\";")]
	fn test_escape_style_script_text(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(escape_style_script_text(input), expected);
	}

	#[rstest]
	fn test_escape_style_script_text_keeps_quotes_borrowed() {
		assert!(matches!(
			escape_style_script_text("'single' \"double\""),
			Cow::Borrowed(_)
		));
	}

	#[rstest]
	#[case("plain", "plain")]
	#[case("say \"hi\"", "say &quot;hi&quot;")]
	#[case("a&b<c>", "a&b<c>")]
	fn test_escape_attr_value(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(escape_attr_value(input), expected);
	}

	#[rstest]
	#[case("on click", "onclick")]
	#[case("data-user_id", "data-user_id")]
	#[case("xlink:href", "xlink:href")]
	#[case("a\"b=c>d", "abcd")]
	#[case("   ", "")]
	fn test_clean_attr_name(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(clean_attr_name(input), expected);
	}

	#[rstest]
	#[case("display", "display")]
	#[case("marginTop", "margin-top")]
	#[case("borderTopLeftRadius", "border-top-left-radius")]
	fn test_camel_to_kebab(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(camel_to_kebab(input), expected);
	}

	#[rstest]
	#[case("div", true)]
	#[case("my-widget", true)]
	#[case("svg:rect", true)]
	#[case("", false)]
	#[case("div onload", false)]
	#[case("a>", false)]
	fn test_is_valid_tag_name(#[case] tag: &str, #[case] expected: bool) {
		assert_eq!(is_valid_tag_name(tag), expected);
	}
}
