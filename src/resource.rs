//! Loaders for attribute values given by reference (`attr:< url`).
use std::{collections::HashMap, fmt, sync::Arc};

use url::Url;

use crate::{
	entry::Value,
	error::{Error, Result},
};

/// Error type returned by [`ResourceHandler`]s
pub type LoadError = Box<dyn std::error::Error + Send + Sync>;

/// Scheme of the built-in local file loader
pub const FILE_SCHEME: &str = "file";

/// Schemes a replacement registry has to provide
const REQUIRED_SCHEMES: &[&str] = &[FILE_SCHEME];

/// Resolves a reference into the content it points to.
///
/// Implemented for closures, so ad-hoc handlers can be registered without a
/// dedicated type:
/// ```
/// # use ldif_decoder::{ResourceHandlers, Value};
/// let mut handlers = ResourceHandlers::default();
/// handlers.insert("echo", |url: &url::Url| Ok(Value::Text(url.path().to_owned())));
/// assert!(handlers.contains("echo"));
/// ```
pub trait ResourceHandler: Send + Sync {
	/// Load the content `reference` points to.
	fn resolve(&self, reference: &Url) -> Result<Value, LoadError>;
}

impl<F> ResourceHandler for F
where
	F: Fn(&Url) -> Result<Value, LoadError> + Send + Sync,
{
	fn resolve(&self, reference: &Url) -> Result<Value, LoadError> {
		self(reference)
	}
}

/// Reads `file://` references from the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl ResourceHandler for FileLoader {
	fn resolve(&self, reference: &Url) -> Result<Value, LoadError> {
		let path = reference
			.to_file_path()
			.map_err(|()| format!("{reference} does not name a local file"))?;
		Ok(Value::from_bytes(std::fs::read(path)?))
	}
}

/// Mapping from URL scheme to the handler used to load references of that
/// scheme.
///
/// Cloning is cheap and shares the handlers, so one registry can back any
/// number of readers. Schemes are stored lowercase, matching what [`Url`]
/// produces when parsing.
#[derive(Clone)]
pub struct ResourceHandlers {
	/// Registered handlers by scheme
	handlers: HashMap<String, Arc<dyn ResourceHandler>>,
}

impl ResourceHandlers {
	/// A registry without any handlers. Not accepted by
	/// [`LdifReader::set_resource_handlers`](crate::LdifReader::set_resource_handlers)
	/// until a `file` handler is added.
	#[must_use]
	pub fn empty() -> Self {
		Self { handlers: HashMap::new() }
	}

	/// Register `handler` for `scheme`, returning the handler it replaces.
	pub fn insert(
		&mut self,
		scheme: impl Into<String>,
		handler: impl ResourceHandler + 'static,
	) -> Option<Arc<dyn ResourceHandler>> {
		self.handlers.insert(scheme.into().to_ascii_lowercase(), Arc::new(handler))
	}

	/// Remove the handler for `scheme`.
	pub fn remove(&mut self, scheme: &str) -> Option<Arc<dyn ResourceHandler>> {
		self.handlers.remove(&scheme.to_ascii_lowercase())
	}

	/// The handler registered for `scheme`, if any.
	#[must_use]
	pub fn get(&self, scheme: &str) -> Option<&Arc<dyn ResourceHandler>> {
		self.handlers.get(&scheme.to_ascii_lowercase())
	}

	/// Whether a handler is registered for `scheme`.
	#[must_use]
	pub fn contains(&self, scheme: &str) -> bool {
		self.get(scheme).is_some()
	}

	/// All registered schemes, in no particular order.
	pub fn schemes(&self) -> impl Iterator<Item = &str> {
		self.handlers.keys().map(String::as_str)
	}

	/// Load `reference` with the handler for its scheme. Useful for
	/// resolving [`Value::Reference`]s kept while autoload was disabled.
	pub fn resolve(&self, reference: &Url) -> Result<Value, LoadError> {
		let handler = self
			.get(reference.scheme())
			.ok_or_else(|| format!("no resource handler for scheme {}", reference.scheme()))?;
		handler.resolve(reference)
	}

	/// Check that every built-in scheme is still present.
	pub(crate) fn validate(&self) -> Result<()> {
		match REQUIRED_SCHEMES.iter().find(|scheme| !self.contains(scheme)) {
			Some(scheme) => Err(Error::InvalidConfiguration(format!(
				"resource handlers must include the \"{scheme}\" scheme"
			))),
			None => Ok(()),
		}
	}
}

impl Default for ResourceHandlers {
	fn default() -> Self {
		let mut handlers = Self::empty();
		handlers.insert(FILE_SCHEME, FileLoader);
		handlers
	}
}

impl fmt::Debug for ResourceHandlers {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut schemes: Vec<_> = self.schemes().collect();
		schemes.sort_unstable();
		f.debug_struct("ResourceHandlers").field("schemes", &schemes).finish()
	}
}
