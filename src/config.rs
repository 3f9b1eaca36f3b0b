//! Config for the LDIF reader.
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Reader configuration.
///
/// Resource handlers are not part of the serializable configuration, they are
/// set on the [`LdifReader`](crate::LdifReader) directly.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
	/// Maximum length of a physical line in characters, excluding the line
	/// terminator. Unlimited if unset.
	pub max_length: Option<usize>,
	/// Whether values given by reference (`attr:< url`) are loaded while
	/// decoding
	pub autoload: bool,
	/// What to do with references while autoload is disabled
	pub unloaded_references: ReferencePolicy,
}

impl Default for Config {
	fn default() -> Self {
		Config { max_length: None, autoload: true, unloaded_references: ReferencePolicy::Keep }
	}
}

impl Config {
	/// Check the configuration for values that can never be satisfied.
	pub fn validate(&self) -> Result<()> {
		if self.max_length == Some(0) {
			return Err(Error::InvalidConfiguration(
				"max_length must be a positive integer".to_owned(),
			));
		}
		Ok(())
	}
}

/// Handling of references which are not loaded because autoload is disabled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePolicy {
	/// Store the reference as a [`Value::Reference`](crate::Value::Reference)
	#[default]
	Keep,
	/// Fail decoding with [`Error::UnloadedReference`]
	Reject,
}
