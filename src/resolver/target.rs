//! Target string parsing.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core_api::error::{DoxrefError, Result};
use crate::model::{Kind, RefId, normalize_path};

/// `path::name`, where the last path component must carry an extension so
/// that `Outer::inner` alone is never mistaken for a path.
static PATH_TARGET: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"^(?:((?:[^/]+/)*[^/]+\.[^/:.]+)::)?(.+)$").expect("path target pattern is valid")
});

/// Declaring-file part of a `path::name` target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPath {
	/// Normalized path as typed.
	pub path: String,
	/// Written with a leading `./`: the whole declaring path must match.
	pub exact: bool,
}

/// A parsed target string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
	/// `!refid`
	RefId(RefId),
	/// `[name]` or `kind[name]`
	Named {
		/// Kind restriction, if one was given.
		kind: Option<Kind>,
		/// Bare or qualified name.
		name: String,
	},
	/// `path::name`, `path::*` or a bare `name`.
	Path {
		/// Declaring-file suffix, if one was given.
		path: Option<TargetPath>,
		/// Name, `Outer::inner`, or `*` for the file itself.
		name: String,
	},
}

impl Target {
	/// Parse a user-typed target.
	pub fn parse(input: &str) -> Result<Self> {
		let text = input.trim();
		if text.is_empty() {
			return Err(DoxrefError::MalformedTarget("empty target".to_string()));
		}

		if let Some(raw) = text.strip_prefix('!') {
			let raw = raw.trim();
			if raw.is_empty() {
				return Err(DoxrefError::MalformedTarget(format!("`{text}`: missing refid after `!`")));
			}
			return Ok(Self::RefId(RefId::from(raw)));
		}

		if let Some(inner) = text.strip_suffix(']') {
			let Some((kind_word, name)) = inner.split_once('[') else {
				return Err(DoxrefError::MalformedTarget(format!("`{text}`: unbalanced brackets")));
			};
			let name = name.trim();
			if name.is_empty() || name.contains(['[', ']']) {
				return Err(DoxrefError::MalformedTarget(format!("`{text}`: bad bracketed name")));
			}
			let kind = match kind_word.trim() {
				"" => None,
				word => Some(Kind::from_user(word).ok_or_else(|| {
					DoxrefError::MalformedTarget(format!("`{text}`: unknown kind `{word}`"))
				})?),
			};
			return Ok(Self::Named {
				kind,
				name: name.to_string(),
			});
		}

		let caps = PATH_TARGET
			.captures(text)
			.ok_or_else(|| DoxrefError::MalformedTarget(text.to_string()))?;
		let name = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
		if name.is_empty() || name.starts_with("::") || name.ends_with("::") {
			return Err(DoxrefError::MalformedTarget(format!("`{text}`: missing name")));
		}
		let path = caps.get(1).map(|m| {
			let raw = m.as_str();
			TargetPath {
				path: normalize_path(raw),
				exact: raw.starts_with("./"),
			}
		});
		Ok(Self::Path {
			path,
			name: name.to_string(),
		})
	}
}

impl FromStr for Target {
	type Err = DoxrefError;

	fn from_str(s: &str) -> Result<Self> {
		Self::parse(s)
	}
}

impl fmt::Display for Target {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::RefId(refid) => write!(f, "!{refid}"),
			Self::Named { kind: Some(kind), name } => write!(f, "{kind}[{name}]"),
			Self::Named { kind: None, name } => write!(f, "[{name}]"),
			Self::Path {
				path: Some(TargetPath { path, exact: true }),
				name,
			} => write!(f, "./{path}::{name}"),
			Self::Path {
				path: Some(TargetPath { path, exact: false }),
				name,
			} => write!(f, "{path}::{name}"),
			Self::Path { path: None, name } => f.write_str(name),
		}
	}
}
