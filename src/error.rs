//! Error codes

use crate::resource::LoadError;

/// Errors that can occur when decoding LDIF
#[derive(thiserror::Error, Debug)]
pub enum Error {
	/// A physical line exceeded the configured maximum length.
	#[error("Line {line} is too long: {length} characters, maximum is {max}")]
	TooLong {
		/// 1-indexed physical line number
		line: usize,
		/// Length of the line in characters, without the line terminator
		length: usize,
		/// The configured maximum
		max: usize,
	},
	/// The first attribute line of an entry was not a `dn` line.
	#[error("Missing distinguished name for entry #{entry}")]
	MissingDistinguishedName {
		/// 1-indexed ordinal of the entry under construction
		entry: usize,
	},
	/// A line looked like an attribute value pair but did not conform to the
	/// grammar.
	#[error("Invalid attribute value pair: \"{pair}\" for entry #{entry}")]
	InvalidAttributeValuePair {
		/// 1-indexed ordinal of the entry under construction
		entry: usize,
		/// The offending logical line
		pair: String,
	},
	/// The input could not be split into logical lines.
	#[error("Parser error at line {line}: {reason}")]
	Parser {
		/// 1-indexed physical line number
		line: usize,
		/// What went wrong
		reason: &'static str,
	},
	/// A configuration value violated its contract.
	#[error("Invalid configuration: {0}")]
	InvalidConfiguration(String),
	/// A value referenced a scheme no resource handler is registered for.
	#[error("No resource handler for scheme \"{scheme}\" in entry #{entry}")]
	UnknownScheme {
		/// 1-indexed ordinal of the entry under construction
		entry: usize,
		/// The URL scheme of the reference
		scheme: String,
	},
	/// A resource handler failed to load a referenced value.
	#[error("Failed to load {reference} for entry #{entry}: {source}")]
	Resource {
		/// 1-indexed ordinal of the entry under construction
		entry: usize,
		/// The reference as written in the input
		reference: String,
		/// The error returned by the handler
		#[source]
		source: LoadError,
	},
	/// A reference was encountered with autoload disabled and the reader
	/// configured to reject unloaded references.
	#[error("Unloaded reference {reference} in entry #{entry}")]
	UnloadedReference {
		/// 1-indexed ordinal of the entry under construction
		entry: usize,
		/// The reference as written in the input
		reference: String,
	},
	/// Reading from the underlying stream failed, or it was not valid UTF-8.
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

/// Result type with this crate's [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;
