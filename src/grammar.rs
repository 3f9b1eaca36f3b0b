//! Classification of logical lines, following the grammar of RFC 2849.

/// What a logical line is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Line<'a> {
	/// `# ...`, ignored
	Comment,
	/// `version: N` as the first line of the stream
	Version(u32),
	/// An empty line, ends the current entry
	Blank,
	/// `name: value`, `name:: base64` or `name:< url`
	Pair(Pair<'a>),
}

/// An attribute value pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pair<'a> {
	/// Attribute description, including options
	pub(crate) name: &'a str,
	/// The still encoded value
	pub(crate) value: RawValue<'a>,
}

/// An attribute value as written in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawValue<'a> {
	/// Given inline
	Plain(&'a str),
	/// Base64 encoded
	Base64(&'a str),
	/// A URL to load the value from
	Reference(&'a str),
}

/// The line resembles no form of attribute value pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InvalidPair;

/// Classify a logical line. Forms are tried in order: comment, version
/// marker (only if `expect_version` is set), blank line, attribute value
/// pair.
pub(crate) fn classify(text: &str, expect_version: bool) -> Result<Line<'_>, InvalidPair> {
	if text.starts_with('#') {
		return Ok(Line::Comment);
	}
	if expect_version {
		if let Some(version) = version(text) {
			return Ok(Line::Version(version));
		}
	}
	if text.is_empty() {
		return Ok(Line::Blank);
	}
	pair(text).map(Line::Pair)
}

/// Parse a `version: N` line.
fn version(text: &str) -> Option<u32> {
	let (name, value) = text.split_once(':')?;
	let value = value.trim_start_matches(' ');
	if !name.eq_ignore_ascii_case("version")
		|| value.is_empty()
		|| !value.bytes().all(|b| b.is_ascii_digit())
	{
		return None;
	}
	value.parse().ok()
}

/// Split an attribute value pair.
fn pair(text: &str) -> Result<Pair<'_>, InvalidPair> {
	let (name, rest) = text.split_once(':').ok_or(InvalidPair)?;
	if !is_attribute_description(name) {
		return Err(InvalidPair);
	}
	let value = if let Some(encoded) = rest.strip_prefix(':') {
		RawValue::Base64(encoded.trim_start_matches(' '))
	} else if let Some(url) = rest.strip_prefix('<') {
		RawValue::Reference(url.trim_start_matches(' '))
	} else {
		let plain = rest.trim_start_matches(' ');
		if plain.starts_with([':', '<']) {
			return Err(InvalidPair);
		}
		RawValue::Plain(plain)
	};
	Ok(Pair { name, value })
}

/// `attributetype *(";" option)`
fn is_attribute_description(name: &str) -> bool {
	let mut parts = name.split(';');
	parts.next().is_some_and(is_attribute_type)
		&& parts.all(|option| !option.is_empty() && option.bytes().all(is_attr_type_char))
}

/// A keystring (`ALPHA *(ALPHA / DIGIT / "-")`) or a numeric OID.
fn is_attribute_type(kind: &str) -> bool {
	match kind.bytes().next() {
		Some(first) if first.is_ascii_alphabetic() => kind.bytes().all(is_attr_type_char),
		Some(first) if first.is_ascii_digit() => is_numeric_oid(kind),
		_ => false,
	}
}

/// Characters allowed after the first one of an attribute type or option.
fn is_attr_type_char(b: u8) -> bool {
	b.is_ascii_alphanumeric() || b == b'-'
}

/// Dot separated numbers without leading zeros.
fn is_numeric_oid(oid: &str) -> bool {
	oid.split('.').all(|number| {
		!number.is_empty()
			&& number.bytes().all(|b| b.is_ascii_digit())
			&& (number == "0" || !number.starts_with('0'))
	})
}

/// Check the string form of a distinguished name: relative names of the form
/// `type=value`, separated by unescaped `,` or `+`. Spaces around the
/// attribute types are tolerated. A value may not contain another attribute
/// value pair (`name: value`), which is what a lost line break looks like.
pub(crate) fn is_distinguished_name(dn: &str) -> bool {
	let mut components = Vec::new();
	let mut start = 0;
	let mut word = 0;
	let mut escaped = false;
	let mut quoted = false;
	for (i, c) in dn.char_indices() {
		if escaped {
			escaped = false;
			continue;
		}
		match c {
			'\\' => escaped = true,
			'"' => quoted = !quoted,
			',' | '+' if !quoted => {
				components.push(&dn[start..i]);
				start = i + 1;
				word = i + 1;
			}
			' ' | '=' => word = i + 1,
			':' if !quoted => {
				let rest = &dn[i + 1..];
				if is_attribute_description(&dn[word..i]) && (rest.is_empty() || rest.starts_with(' '))
				{
					return false;
				}
			}
			_ => {}
		}
	}
	if escaped || quoted {
		return false;
	}
	components.push(&dn[start..]);
	components.into_iter().all(|component| {
		component.split_once('=').is_some_and(|(kind, _)| is_attribute_type(kind.trim_matches(' ')))
	})
}
