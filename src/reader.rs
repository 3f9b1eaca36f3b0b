//! Pull based decoding of LDIF streams into entries

use std::{
	fs::File,
	io::{BufRead, BufReader},
	iter::FusedIterator,
	path::Path,
};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, warn};
use url::Url;

use crate::{
	config::{Config, ReferencePolicy},
	entry::{Entry, EntryBuilder, Value},
	error::{Error, Result},
	fold::{LineFolder, LogicalLine},
	grammar::{self, InvalidPair, Line, Pair, RawValue},
	resource::ResourceHandlers,
};

/// Keyword of the distinguished name line
const DN: &str = "dn";
/// Keyword of the change type line
const CHANGETYPE: &str = "changetype";

/// Decodes entries from an LDIF stream, one at a time.
///
/// The reader is single pass: once the stream is exhausted, or decoding failed,
/// it yields nothing more. Decoding stops at the first malformed line, no
/// partial entry is returned.
///
/// ```
/// # fn run() -> Result<(), ldif_decoder::Error> {
/// use ldif_decoder::LdifReader;
///
/// let text = "version: 1\ndn: cn=test\ncn: test\n";
/// let mut reader = LdifReader::new(text.as_bytes());
/// let entry = reader.next_entry()?.expect("one entry");
/// assert_eq!(entry.dn(), "cn=test");
/// assert_eq!(reader.version(), Some(1));
/// # Ok(())
/// # }
/// # run().unwrap();
/// ```
#[derive(Debug)]
pub struct LdifReader<R> {
	/// Source of logical lines
	folder: LineFolder<R>,
	/// Decoder settings
	config: Config,
	/// Loaders for referenced values
	handlers: ResourceHandlers,
	/// The entry under construction
	builder: EntryBuilder,
	/// Version given by the first line of the stream
	version: Option<u32>,
	/// Whether no line other than comments has been seen yet
	expect_version: bool,
	/// Number of entries started so far
	entry_ordinal: usize,
	/// Set once the stream is exhausted or decoding failed
	finished: bool,
}

impl LdifReader<BufReader<File>> {
	/// Open an LDIF file with the default configuration.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		Ok(Self::new(BufReader::new(File::open(path)?)))
	}
}

impl<R: BufRead> LdifReader<R> {
	/// Create a reader with the default configuration: no line length limit
	/// and autoload enabled with a `file` handler.
	#[must_use]
	pub fn new(input: R) -> Self {
		let config = Config::default();
		Self {
			folder: LineFolder::new(input, config.max_length),
			config,
			handlers: ResourceHandlers::default(),
			builder: EntryBuilder::default(),
			version: None,
			expect_version: true,
			entry_ordinal: 0,
			finished: false,
		}
	}

	/// Create a reader with the given configuration.
	pub fn with_config(input: R, config: Config) -> Result<Self> {
		config.validate()?;
		let mut reader = Self::new(input);
		reader.folder.set_max_length(config.max_length);
		reader.config = config;
		Ok(reader)
	}

	/// The active configuration.
	#[must_use]
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// The LDIF version declared by the stream, once its first line was read.
	#[must_use]
	pub fn version(&self) -> Option<u32> {
		self.version
	}

	/// Number of physical lines consumed so far.
	#[must_use]
	pub fn line_number(&self) -> usize {
		self.folder.line_number()
	}

	/// Number of entries started so far. While an entry is under construction
	/// this is its 1-indexed ordinal.
	#[must_use]
	pub fn entry_ordinal(&self) -> usize {
		self.entry_ordinal
	}

	/// Maximum physical line length.
	#[must_use]
	pub fn max_length(&self) -> Option<usize> {
		self.config.max_length
	}

	/// Change the maximum physical line length. Lines already consumed are not
	/// checked again.
	pub fn set_max_length(&mut self, max_length: Option<usize>) -> Result<()> {
		let config = Config { max_length, ..self.config.clone() };
		config.validate()?;
		self.folder.set_max_length(max_length);
		self.config = config;
		Ok(())
	}

	/// Whether references are loaded while decoding.
	#[must_use]
	pub fn autoload(&self) -> bool {
		self.config.autoload
	}

	/// Enable or disable loading references while decoding.
	pub fn set_autoload(&mut self, autoload: bool) {
		self.config.autoload = autoload;
	}

	/// Choose what happens to references while autoload is disabled.
	pub fn set_unloaded_references(&mut self, policy: ReferencePolicy) {
		self.config.unloaded_references = policy;
	}

	/// The registered resource handlers.
	#[must_use]
	pub fn resource_handlers(&self) -> &ResourceHandlers {
		&self.handlers
	}

	/// The registered resource handlers, for adding or removing schemes.
	pub fn resource_handlers_mut(&mut self) -> &mut ResourceHandlers {
		&mut self.handlers
	}

	/// Replace all resource handlers, returning the previous ones. The new
	/// handlers must include the `file` scheme, otherwise nothing is changed.
	pub fn set_resource_handlers(&mut self, handlers: ResourceHandlers) -> Result<ResourceHandlers> {
		handlers.validate()?;
		Ok(std::mem::replace(&mut self.handlers, handlers))
	}

	/// The underlying stream.
	#[must_use]
	pub fn get_ref(&self) -> &R {
		self.folder.get_ref()
	}

	/// The underlying stream, mutably. Reading from it directly will confuse
	/// the decoder.
	pub fn get_mut(&mut self) -> &mut R {
		self.folder.get_mut()
	}

	/// Unwrap the underlying stream.
	pub fn into_inner(self) -> R {
		self.folder.into_inner()
	}

	/// Switch to a new stream, returning the previous one. Decoding starts over:
	/// line and entry counters, the version and any partial entry are reset.
	pub fn set_input(&mut self, input: R) -> R {
		let folder =
			std::mem::replace(&mut self.folder, LineFolder::new(input, self.config.max_length));
		self.builder = EntryBuilder::default();
		self.version = None;
		self.expect_version = true;
		self.entry_ordinal = 0;
		self.finished = false;
		folder.into_inner()
	}

	/// Decode the next entry. Returns `None` at the end of the stream.
	pub fn next_entry(&mut self) -> Result<Option<Entry>> {
		if self.finished {
			return Ok(None);
		}
		let result = self.read_entry();
		if !matches!(result, Ok(Some(_))) {
			self.finished = true;
		}
		result
	}

	/// Consume lines until an entry is complete or the stream ends.
	fn read_entry(&mut self) -> Result<Option<Entry>> {
		while let Some(LogicalLine { line, text }) = self.folder.next_line()? {
			let classified = grammar::classify(&text, self.expect_version);
			if classified != Ok(Line::Comment) {
				self.expect_version = false;
			}
			match classified {
				Ok(Line::Comment) => {}
				Ok(Line::Version(version)) => {
					debug!(version, "LDIF version declared");
					self.version = Some(version);
				}
				Ok(Line::Blank) => {
					if let Some(entry) = self.builder.finish() {
						return Ok(Some(self.complete(entry, line)));
					}
				}
				Ok(Line::Pair(pair)) => {
					self.begin_entry();
					self.add_pair(pair, &text)?;
				}
				Err(InvalidPair) => {
					self.begin_entry();
					return Err(self.invalid_pair(&text));
				}
			}
		}
		let line = self.line_number();
		Ok(self.builder.finish().map(|entry| self.complete(entry, line)))
	}

	/// Count a new entry if none is under construction.
	fn begin_entry(&mut self) {
		if !self.builder.is_open() {
			self.entry_ordinal += 1;
		}
	}

	/// Log a finished entry.
	fn complete(&self, entry: Entry, line: usize) -> Entry {
		debug!(entry = self.entry_ordinal, line, dn = entry.dn(), "Decoded entry");
		entry
	}

	/// Add an attribute value pair to the entry under construction, opening
	/// the entry if the pair is its `dn`.
	fn add_pair(&mut self, pair: Pair<'_>, text: &str) -> Result<()> {
		if !self.builder.is_open() {
			if !pair.name.eq_ignore_ascii_case(DN) {
				return Err(Error::MissingDistinguishedName { entry: self.entry_ordinal });
			}
			let dn = self.text_value(pair.value, text)?;
			if !grammar::is_distinguished_name(&dn) {
				return Err(self.invalid_pair(text));
			}
			self.builder.open(dn);
			return Ok(());
		}

		if pair.name.eq_ignore_ascii_case(DN) {
			return Err(self.invalid_pair(text));
		}
		if pair.name.eq_ignore_ascii_case(CHANGETYPE) {
			let changetype = self.text_value(pair.value, text)?;
			if !self.builder.set_changetype(changetype) {
				return Err(self.invalid_pair(text));
			}
			return Ok(());
		}
		let value = self.value(pair.value, text)?;
		self.builder.push(pair.name, value, self.entry_ordinal)
	}

	/// Decode a value which has to be inline text.
	fn text_value(&self, value: RawValue<'_>, text: &str) -> Result<String> {
		match value {
			RawValue::Plain(plain) => Ok(plain.to_owned()),
			RawValue::Base64(encoded) => match self.decode_base64(encoded, text)? {
				Value::Text(decoded) => Ok(decoded),
				Value::Binary(_) | Value::Reference(_) => Err(self.invalid_pair(text)),
			},
			RawValue::Reference(_) => Err(self.invalid_pair(text)),
		}
	}

	/// Decode a value, loading it if it is a reference and autoload is on.
	fn value(&self, value: RawValue<'_>, text: &str) -> Result<Value> {
		match value {
			RawValue::Plain(plain) => Ok(Value::Text(plain.to_owned())),
			RawValue::Base64(encoded) => self.decode_base64(encoded, text),
			RawValue::Reference(reference) => {
				let url = Url::parse(reference).map_err(|_| self.invalid_pair(text))?;
				self.load(url, reference)
			}
		}
	}

	/// Decode standard base64.
	fn decode_base64(&self, encoded: &str, text: &str) -> Result<Value> {
		STANDARD.decode(encoded).map(Value::from_bytes).map_err(|_| self.invalid_pair(text))
	}

	/// Load a referenced value, or deal with it according to the
	/// [`ReferencePolicy`] if autoload is off.
	fn load(&self, url: Url, reference: &str) -> Result<Value> {
		let entry = self.entry_ordinal;
		if !self.config.autoload {
			return match self.config.unloaded_references {
				ReferencePolicy::Keep => {
					warn!(entry, "Keeping reference {reference}, autoload is disabled");
					Ok(Value::Reference(url))
				}
				ReferencePolicy::Reject => {
					Err(Error::UnloadedReference { entry, reference: reference.to_owned() })
				}
			};
		}
		let handler = self
			.handlers
			.get(url.scheme())
			.ok_or_else(|| Error::UnknownScheme { entry, scheme: url.scheme().to_owned() })?;
		handler
			.resolve(&url)
			.map_err(|source| Error::Resource { entry, reference: reference.to_owned(), source })
	}

	/// Error for a malformed line of the current entry.
	fn invalid_pair(&self, text: &str) -> Error {
		Error::InvalidAttributeValuePair { entry: self.entry_ordinal, pair: text.to_owned() }
	}
}

impl<R: BufRead> Iterator for LdifReader<R> {
	type Item = Result<Entry>;

	fn next(&mut self) -> Option<Self::Item> {
		self.next_entry().transpose()
	}
}

impl<R: BufRead> FusedIterator for LdifReader<R> {}
