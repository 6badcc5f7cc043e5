//! Pattern utilities for name filters.
//!
//! Name filters are shell-style: `*` matches any run of characters, `?` a
//! single one, and `|` separates alternatives. Everything else is literal.

use regex::{Regex, RegexBuilder};

/// Escape regex metacharacters, translating `*` and `?` to wildcards and
/// preserving `|` as the OR operator.
///
/// A query like `"foo_*|bar.h"` matches any name starting with `foo_` or the
/// literal `bar.h`, rather than treating `.` as a regex wildcard.
pub fn wildcard_to_regex(pattern: &str) -> String {
	let mut escaped = String::with_capacity(pattern.len() * 2);
	for ch in pattern.chars() {
		match ch {
			'|' => escaped.push(ch),
			'*' => escaped.push_str(".*"),
			'?' => escaped.push('.'),
			'\\' | '.' | '+' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' => {
				escaped.push('\\');
				escaped.push(ch);
			}
			_ => escaped.push(ch),
		}
	}
	escaped
}

/// Compile a name filter matching whole names only.
pub fn name_matcher(pattern: &str, case_sensitive: bool) -> Result<Regex, regex::Error> {
	RegexBuilder::new(&format!("^(?:{})$", wildcard_to_regex(pattern.trim())))
		.case_insensitive(!case_sensitive)
		.build()
}
