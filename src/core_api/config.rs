//! Build configuration for [`DoxyIndex`](super::DoxyIndex).
//!
//! The XML directory can come from `DOXREF_XML_DIR` when the caller does not
//! name one.

use std::path::{Path, PathBuf};

use crate::loader::DEFAULT_INDEX_FILE;
use crate::resolver::DEFAULT_CHILDREN_LIMIT;

/// Environment variable naming the Doxygen XML output directory.
pub const XML_DIR_ENV: &str = "DOXREF_XML_DIR";

/// Default depth of hierarchy walks.
pub const DEFAULT_TREE_DEPTH: usize = 20;

/// XML directory named by the environment, if any.
pub fn xml_dir_from_env() -> Option<PathBuf> {
	let raw = std::env::var(XML_DIR_ENV).unwrap_or_default();
	let trimmed = raw.trim();
	(!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}

/// Settings for building one index.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
	/// Directory holding `index.xml` and the compound documents.
	pub(crate) xml_dir: PathBuf,

	/// File name of the root index inside `xml_dir`.
	pub(crate) index_file: String,

	/// Whether a skipped document fails the build.
	pub(crate) strict: bool,

	/// Breadth bound applied to `children_of` by default.
	pub(crate) children_limit: usize,
}

impl IndexBuilder {
	/// Start configuring an index over `xml_dir`.
	pub fn new(xml_dir: impl Into<PathBuf>) -> Self {
		Self {
			xml_dir: xml_dir.into(),
			index_file: DEFAULT_INDEX_FILE.to_string(),
			strict: false,
			children_limit: DEFAULT_CHILDREN_LIMIT,
		}
	}

	/// Configure from `DOXREF_XML_DIR`, if it is set.
	pub fn from_env() -> Option<Self> {
		xml_dir_from_env().map(Self::new)
	}

	/// Read the root index from a file other than `index.xml`.
	pub fn with_index_file(mut self, index_file: impl Into<String>) -> Self {
		self.index_file = index_file.into();
		self
	}

	/// Fail the build on the first unreadable or malformed compound document
	/// instead of collecting it as a warning.
	pub fn with_strict(mut self, strict: bool) -> Self {
		self.strict = strict;
		self
	}

	/// Set the default breadth bound of `children_of`.
	pub fn with_children_limit(mut self, limit: usize) -> Self {
		self.children_limit = limit;
		self
	}

	/// Configured XML directory.
	pub fn xml_dir(&self) -> &Path {
		&self.xml_dir
	}

	/// Build the index. See [`DoxyIndex::build`](super::DoxyIndex::build).
	pub fn build(self) -> crate::Result<super::DoxyIndex> {
		super::DoxyIndex::build(self)
	}
}
