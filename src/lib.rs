//! Decode LDAP Data Interchange Format (LDIF) streams into directory entries.
//!
//! LDIF ([RFC 2849]) is the text format used to import, export and back up
//! the contents of a directory server. This library reads it lazily: an
//! [`LdifReader`] wraps any buffered text stream and decodes one [`Entry`] at
//! a time, so arbitrarily large exports can be processed without loading
//! them into memory.
//!
//! Decoding handles folded lines, comments, the optional `version` line,
//! base64 encoded values and values given by reference (`attr:< url`). The
//! latter are loaded through pluggable [`ResourceHandlers`]; `file://` URLs
//! are supported out of the box. Any malformed input aborts decoding with an
//! [`Error`] naming the physical line or the entry it occurred in.
//!
//! [RFC 2849]: https://www.rfc-editor.org/rfc/rfc2849.html
//!
//! # Getting started
//! ```
//! # fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use ldif_decoder::{Config, LdifReader};
//!
//! let text = "\
//! version: 1
//! ## The first user
//! dn: uid=jdoe,ou=people,dc=example,dc=com
//! cn: John Doe
//! mail: jdoe@example.com
//! mail: john.doe@example.com
//!
//! dn: uid=mmuster,ou=people,dc=example,dc=com
//! changetype: add
//! cn:: TWF4IE11c3Rlcm1hbm4=
//! ";
//!
//! let config = Config { max_length: Some(76), ..Config::default() };
//! let reader = LdifReader::with_config(text.as_bytes(), config)?;
//! for entry in reader {
//! 	let entry = entry?;
//! 	println!("{}: {:?}", entry.dn(), entry.attr_first("cn"));
//! }
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```
//!
//! Decoded entries convert into [`ldap3::SearchEntry`], so they can be
//! handled by the same code as search results.
//!
//! # Limitations
//! * Change records are recognised by their `changetype`, but the lines of a
//!   `modify` record (including `-` separators) are not interpreted.
//! * Decoding stops at the first error, there is no way to skip a malformed
//!   entry and continue.
//! * Encoding entries back into LDIF is not supported.

pub mod config;
pub mod entry;
pub mod error;
mod fold;
mod grammar;
pub mod reader;
pub mod resource;

pub use ldap3::{self, SearchEntry};

pub use crate::{
	config::{Config, ReferencePolicy},
	entry::{Attribute, Entry, InvalidBoolean, Value},
	error::{Error, Result},
	reader::LdifReader,
	resource::{FileLoader, LoadError, ResourceHandler, ResourceHandlers, FILE_SCHEME},
};
