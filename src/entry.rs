//! Decoded LDIF entries and the builder that assembles them line by line.
use std::collections::HashMap;

use ldap3::SearchEntry;
use url::Url;

use crate::error::{Error, Result};

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
	/// A UTF-8 value, given inline, as base64 or loaded from a reference.
	Text(String),
	/// A base64 encoded or loaded value which is not valid UTF-8.
	Binary(Vec<u8>),
	/// A reference that was not dereferenced because autoload was disabled.
	Reference(Url),
}

impl Value {
	/// Text if `bytes` are valid UTF-8, binary otherwise.
	#[must_use]
	pub fn from_bytes(bytes: Vec<u8>) -> Self {
		match String::from_utf8(bytes) {
			Ok(text) => Value::Text(text),
			Err(err) => Value::Binary(err.into_bytes()),
		}
	}

	/// The value as text. `None` for binary values and references.
	#[must_use]
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Text(text) => Some(text),
			Value::Binary(_) | Value::Reference(_) => None,
		}
	}

	/// The raw bytes of the value. `None` for references.
	#[must_use]
	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			Value::Text(text) => Some(text.as_bytes()),
			Value::Binary(bytes) => Some(bytes),
			Value::Reference(_) => None,
		}
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::Text(value.to_owned())
	}
}

/// An attribute with all of its values, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
	/// The attribute name as first spelled in the input
	pub name: String,
	/// Values in input order
	pub values: Vec<Value>,
}

/// One directory record decoded from LDIF.
///
/// Attribute names keep the spelling of their first occurrence but are
/// compared ASCII case-insensitively, so `cn` and `CN` address the same
/// attribute. The `changetype` of a change record is kept apart from the
/// attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
	/// Distinguished name
	dn: String,
	/// Value of the `changetype` line, if any
	changetype: Option<String>,
	/// Attributes in order of first occurrence
	attributes: Vec<Attribute>,
}

impl Entry {
	/// The distinguished name of the entry. Never empty.
	#[must_use]
	pub fn dn(&self) -> &str {
		&self.dn
	}

	/// The change type, for entries which are change records.
	#[must_use]
	pub fn changetype(&self) -> Option<&str> {
		self.changetype.as_deref()
	}

	/// All values of an attribute.
	#[must_use]
	pub fn get(&self, attr: &str) -> Option<&[Value]> {
		self.attributes
			.iter()
			.find(|attribute| attribute.name.eq_ignore_ascii_case(attr))
			.map(|attribute| attribute.values.as_slice())
	}

	/// Whether the entry has an attribute of the given name. `changetype` is
	/// never considered an attribute.
	#[must_use]
	pub fn contains(&self, attr: &str) -> bool {
		self.get(attr).is_some()
	}

	/// Iterate over the attributes in order of first occurrence.
	pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
		self.attributes.iter()
	}

	/// Get the first value of an attribute. Will return `None` if the value
	/// is not text.
	#[must_use]
	pub fn attr_first(&self, attr: &str) -> Option<&str> {
		self.get(attr)?.first()?.as_str()
	}

	/// Get the first value of an attribute, in binary form
	#[must_use]
	pub fn bin_attr_first(&self, attr: &str) -> Option<&[u8]> {
		self.get(attr)?.first()?.as_bytes()
	}

	/// Get the first value of an attribute, interpreted as an LDAP boolean.
	#[must_use]
	pub fn bool_first(&self, attr: &str) -> Option<Result<bool, InvalidBoolean>> {
		match self.attr_first(attr) {
			Some("TRUE") => Some(Ok(true)),
			Some("FALSE") => Some(Ok(false)),
			Some(other) => Some(Err(InvalidBoolean(other.to_owned()))),
			None => None,
		}
	}
}

/// An attribute value was neither `TRUE` nor `FALSE`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Not a boolean: {0}")]
pub struct InvalidBoolean(pub String);

impl From<Entry> for SearchEntry {
	/// Text values (and unresolved references, as their URL) become `attrs`,
	/// binary values become `bin_attrs`.
	fn from(entry: Entry) -> Self {
		let mut attrs: HashMap<String, Vec<String>> = HashMap::new();
		let mut bin_attrs: HashMap<String, Vec<Vec<u8>>> = HashMap::new();
		for Attribute { name, values } in entry.attributes {
			for value in values {
				match value {
					Value::Text(text) => attrs.entry(name.clone()).or_default().push(text),
					Value::Reference(url) => attrs.entry(name.clone()).or_default().push(url.into()),
					Value::Binary(bytes) => bin_attrs.entry(name.clone()).or_default().push(bytes),
				}
			}
		}
		SearchEntry { dn: entry.dn, attrs, bin_attrs }
	}
}

/// Accumulates the lines of one entry.
#[derive(Debug, Default)]
pub(crate) struct EntryBuilder {
	/// The entry under construction, present once its `dn` line was seen
	entry: Option<Entry>,
}

impl EntryBuilder {
	/// Whether an entry is under construction.
	pub(crate) fn is_open(&self) -> bool {
		self.entry.is_some()
	}

	/// Start a new entry with the given distinguished name.
	pub(crate) fn open(&mut self, dn: String) {
		self.entry = Some(Entry { dn, changetype: None, attributes: Vec::new() });
	}

	/// Record the change type of the open entry. Returns `false` without
	/// changing anything if no entry is open or it already has one.
	pub(crate) fn set_changetype(&mut self, changetype: String) -> bool {
		match self.entry.as_mut() {
			Some(entry) if entry.changetype.is_none() => {
				entry.changetype = Some(changetype);
				true
			}
			_ => false,
		}
	}

	/// Append a value to an attribute of the open entry.
	pub(crate) fn push(&mut self, name: &str, value: Value, ordinal: usize) -> Result<()> {
		let entry =
			self.entry.as_mut().ok_or(Error::MissingDistinguishedName { entry: ordinal })?;
		match entry.attributes.iter_mut().find(|attribute| attribute.name.eq_ignore_ascii_case(name))
		{
			Some(attribute) => attribute.values.push(value),
			None => entry.attributes.push(Attribute { name: name.to_owned(), values: vec![value] }),
		}
		Ok(())
	}

	/// Close the open entry, if any.
	pub(crate) fn finish(&mut self) -> Option<Entry> {
		self.entry.take()
	}
}
