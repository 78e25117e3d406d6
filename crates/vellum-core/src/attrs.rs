//! Attribute values and ordered attribute maps.
//!
//! Attributes keep insertion order, which matters for both the emitted markup
//! and object-valued `style` attributes.

use std::borrow::Cow;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::escape::{camel_to_kebab, clean_attr_name, escape_attr_value};
use crate::node::format_float;

/// Reserved attribute holding the source file recorded by [`jsx_dev`](crate::jsx_dev).
pub const SOURCE_FILE_NAME_ATTR: &str = "__source_file_name";
/// Reserved attribute holding the source line recorded by [`jsx_dev`](crate::jsx_dev).
pub const SOURCE_LINE_NUMBER_ATTR: &str = "__source_line_number";
/// Reserved attribute holding the source column recorded by [`jsx_dev`](crate::jsx_dev).
pub const SOURCE_COLUMN_NUMBER_ATTR: &str = "__source_column_number";

/// Returns whether `name` is one of the reserved diagnostic keys, which are
/// never emitted as markup.
pub fn is_reserved_attr(name: &str) -> bool {
	matches!(
		name,
		SOURCE_FILE_NAME_ATTR | SOURCE_LINE_NUMBER_ATTR | SOURCE_COLUMN_NUMBER_ATTR
	)
}

/// Location of the element-construction call that produced a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
	/// The originating file name.
	pub file_name: String,
	/// The originating line number.
	pub line_number: u32,
	/// The originating column number.
	pub column_number: u32,
}

impl Source {
	/// Creates a new source location.
	pub fn new(file_name: impl Into<String>, line_number: u32, column_number: u32) -> Self {
		Self {
			file_name: file_name.into(),
			line_number,
			column_number,
		}
	}
}

/// The value of a single attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
	/// A string value. Empty strings omit the attribute.
	Text(Cow<'static, str>),
	/// An integer value. `0` is emitted like any other number.
	Integer(i128),
	/// A floating point value. `NaN` omits the attribute.
	Float(f64),
	/// `true` emits a bare attribute, `false` omits it.
	Bool(bool),
	/// Omits the attribute.
	Null,
	/// An ordered key/value object. `style` renders as CSS declarations,
	/// any other attribute as JSON.
	Map(Vec<(Cow<'static, str>, AttrValue)>),
}

impl AttrValue {
	/// Builds an object value from ordered entries.
	///
	/// ```
	/// use vellum_core::AttrValue;
	///
	/// let style = AttrValue::map([("display", "flex"), ("marginTop", "4px")]);
	/// assert_eq!(style.to_attribute_string("style").as_deref(), Some("display:flex;margin-top:4px"));
	/// ```
	pub fn map<K, V, I>(entries: I) -> Self
	where
		K: Into<Cow<'static, str>>,
		V: Into<AttrValue>,
		I: IntoIterator<Item = (K, V)>,
	{
		Self::Map(
			entries
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		)
	}

	/// Returns the string value if this is [`AttrValue::Text`].
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Text(s) => Some(s),
			_ => None,
		}
	}

	/// Returns the integer value if this is [`AttrValue::Integer`].
	pub fn as_integer(&self) -> Option<i128> {
		match self {
			Self::Integer(i) => Some(*i),
			_ => None,
		}
	}

	/// Resolves the value emitted for attribute `name`, or `None` when the
	/// attribute must be omitted. An empty string means a bare attribute.
	pub fn to_attribute_string(&self, name: &str) -> Option<Cow<'_, str>> {
		match self {
			Self::Text(s) if s.is_empty() => None,
			Self::Text(s) => Some(Cow::Borrowed(s)),
			Self::Integer(i) => Some(Cow::Owned(i.to_string())),
			Self::Float(f) if f.is_nan() => None,
			Self::Float(f) => Some(Cow::Owned(format_float(*f))),
			Self::Bool(true) => Some(Cow::Borrowed("")),
			Self::Bool(false) | Self::Null => None,
			Self::Map(entries) if name == "style" => {
				// An empty map still yields a bare `style`.
				let declarations = entries
					.iter()
					.map(|(key, value)| format!("{}:{}", camel_to_kebab(key), value.display()))
					.collect::<Vec<_>>()
					.join(";");
				Some(Cow::Owned(declarations))
			}
			Self::Map(_) => serde_json::to_string(self).ok().map(Cow::Owned),
		}
	}

	/// Plain stringification, used for values nested inside objects.
	fn display(&self) -> Cow<'_, str> {
		match self {
			Self::Text(s) => Cow::Borrowed(s),
			Self::Integer(i) => Cow::Owned(i.to_string()),
			Self::Float(f) => Cow::Owned(format_float(*f)),
			Self::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
			Self::Null => Cow::Borrowed("null"),
			Self::Map(_) => Cow::Owned(serde_json::to_string(self).unwrap_or_default()),
		}
	}
}

impl Serialize for AttrValue {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Text(s) => serializer.serialize_str(s),
			Self::Integer(i) => serializer.serialize_i128(*i),
			Self::Float(f) => serializer.serialize_f64(*f),
			Self::Bool(b) => serializer.serialize_bool(*b),
			Self::Null => serializer.serialize_unit(),
			Self::Map(entries) => {
				let mut map = serializer.serialize_map(Some(entries.len()))?;
				for (key, value) in entries {
					map.serialize_entry(key.as_ref(), value)?;
				}
				map.end()
			}
		}
	}
}

impl From<&'static str> for AttrValue {
	fn from(value: &'static str) -> Self {
		Self::Text(Cow::Borrowed(value))
	}
}

impl From<String> for AttrValue {
	fn from(value: String) -> Self {
		Self::Text(Cow::Owned(value))
	}
}

impl From<&String> for AttrValue {
	fn from(value: &String) -> Self {
		Self::Text(Cow::Owned(value.clone()))
	}
}

impl From<Cow<'static, str>> for AttrValue {
	fn from(value: Cow<'static, str>) -> Self {
		Self::Text(value)
	}
}

impl From<bool> for AttrValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<f64> for AttrValue {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<f32> for AttrValue {
	fn from(value: f32) -> Self {
		Self::Float(f64::from(value))
	}
}

macro_rules! attr_value_from_int {
	($($ty:ty),*) => {
		$(
			impl From<$ty> for AttrValue {
				fn from(value: $ty) -> Self {
					Self::Integer(value as i128)
				}
			}
		)*
	};
}

attr_value_from_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
	fn from(value: Option<T>) -> Self {
		match value {
			Some(v) => v.into(),
			None => Self::Null,
		}
	}
}

/// An ordered attribute map.
///
/// Setting an existing name replaces its value in place, keeping the
/// original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
	entries: Vec<(Cow<'static, str>, AttrValue)>,
}

impl Attributes {
	/// Creates an empty attribute map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an attribute (builder style).
	pub fn with(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<AttrValue>) -> Self {
		self.set(name, value);
		self
	}

	/// Sets an attribute, replacing any previous value with the same name.
	pub fn set(&mut self, name: impl Into<Cow<'static, str>>, value: impl Into<AttrValue>) {
		let name = name.into();
		let value = value.into();
		match self.entries.iter_mut().find(|(n, _)| *n == name) {
			Some(entry) => entry.1 = value,
			None => self.entries.push((name, value)),
		}
	}

	/// Returns the value of an attribute.
	pub fn get(&self, name: &str) -> Option<&AttrValue> {
		self.entries
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, v)| v)
	}

	/// Returns the value of an attribute if it holds a string.
	pub fn get_str(&self, name: &str) -> Option<&str> {
		self.get(name).and_then(AttrValue::as_str)
	}

	/// Removes an attribute and returns its value.
	pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
		let index = self.entries.iter().position(|(n, _)| n == name)?;
		Some(self.entries.remove(index).1)
	}

	/// Returns whether the attribute is present.
	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	/// Returns the number of attributes.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns whether there are no attributes.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates over attributes in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
		self.entries.iter().map(|(n, v)| (n.as_ref(), v))
	}

	/// Returns the source location stashed by [`jsx_dev`](crate::jsx_dev), if any.
	pub fn source(&self) -> Option<Source> {
		let file_name = self.get_str(SOURCE_FILE_NAME_ATTR)?;
		let line = self.get(SOURCE_LINE_NUMBER_ATTR)?.as_integer()?;
		let column = self.get(SOURCE_COLUMN_NUMBER_ATTR)?.as_integer()?;
		Some(Source::new(
			file_name,
			u32::try_from(line).ok()?,
			u32::try_from(column).ok()?,
		))
	}

	/// Appends the markup for these attributes to `out`.
	///
	/// Reserved diagnostic keys are skipped and event handler attributes
	/// (names starting with `on`) are dropped with a warning, since no
	/// client-side bindings can be emitted from the server.
	pub fn write_html(&self, tag: &str, out: &mut String) {
		for (name, value) in &self.entries {
			if is_reserved_attr(name) {
				continue;
			}
			let clean = clean_attr_name(name);
			if clean.is_empty() {
				continue;
			}
			if clean
				.get(..2)
				.is_some_and(|prefix| prefix.eq_ignore_ascii_case("on"))
			{
				tracing::warn!(
					tag,
					attribute = %name,
					"dropping event handler attribute during server-side rendering"
				);
				continue;
			}
			if let Some(value) = value.to_attribute_string(&clean) {
				write_attribute(out, &clean, &value);
			}
		}
	}
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
	K: Into<Cow<'static, str>>,
	V: Into<AttrValue>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut attrs = Self::new();
		for (name, value) in iter {
			attrs.set(name, value);
		}
		attrs
	}
}

impl<K, V, const N: usize> From<[(K, V); N]> for Attributes
where
	K: Into<Cow<'static, str>>,
	V: Into<AttrValue>,
{
	fn from(entries: [(K, V); N]) -> Self {
		entries.into_iter().collect()
	}
}

/// Appends a single attribute to `out`.
///
/// The name is sanitized. An empty value produces a bare attribute
/// (` name`), anything else ` name="value"` with quotes escaped.
pub fn write_attribute(out: &mut String, name: &str, value: &str) {
	out.push(' ');
	out.push_str(&clean_attr_name(name));
	if !value.is_empty() {
		out.push_str("=\"");
		out.push_str(&escape_attr_value(value));
		out.push('"');
	}
}
