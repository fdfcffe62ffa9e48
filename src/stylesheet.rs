//! Lexical rewriting of class selectors in CSS and SCSS sources.
//!
//! This is deliberately not a CSS parser. A single pass walks the source and
//! substitutes every class selector through a caller-supplied scoping
//! function, leaving comments, string literals, `url(...)` payloads, and
//! `:global(...)` groups untouched. Malformed input passes through
//! unrewritten rather than failing; the rewrite is total over arbitrary text.

use std::collections::BTreeMap;

/// Result of rewriting one stylesheet.
#[derive(Debug, Clone, Default)]
pub struct RewriteOutcome {
	/// The rewritten source text.
	pub text: String,
	/// Local class name to scoped class name, one entry per distinct class.
	pub classes: BTreeMap<String, String>,
}

/// Rewrite every class selector in `source` through `scope`.
///
/// `scope` is invoked once per distinct local class name; repeated selectors
/// reuse the first result so the mapping stays consistent within a file.
pub fn rewrite_classes<F>(source: &str, mut scope: F) -> RewriteOutcome
where
	F: FnMut(&str) -> String,
{
	let bytes = source.as_bytes();
	let mut out = String::with_capacity(source.len() + source.len() / 8);
	let mut classes: BTreeMap<String, String> = BTreeMap::new();
	let mut i = 0;

	while i < bytes.len() {
		match bytes[i] {
			b'/' if bytes.get(i + 1) == Some(&b'*') => {
				let end = block_comment_end(bytes, i + 2);
				out.push_str(&source[i..end]);
				i = end;
			}
			// SCSS line comment.
			b'/' if bytes.get(i + 1) == Some(&b'/') => {
				let end = line_end(bytes, i + 2);
				out.push_str(&source[i..end]);
				i = end;
			}
			b'"' | b'\'' => {
				let end = string_end(bytes, i);
				out.push_str(&source[i..end]);
				i = end;
			}
			b':' if has_ci_prefix(bytes, i, b":global(") => {
				let end = balanced_paren_end(bytes, i + b":global(".len());
				out.push_str(&source[i..end]);
				i = end;
			}
			b'u' | b'U' if is_url_start(bytes, i) => {
				let end = balanced_paren_end(bytes, i + b"url(".len());
				out.push_str(&source[i..end]);
				i = end;
			}
			b'.' => {
				if let Some((start, end)) = class_ident_at(bytes, i) {
					let local = &source[start..end];
					let scoped = classes
						.entry(local.to_string())
						.or_insert_with(|| scope(local))
						.clone();
					out.push('.');
					out.push_str(&scoped);
					i = end;
				} else {
					out.push('.');
					i += 1;
				}
			}
			byte => {
				let len = utf8_len(byte);
				out.push_str(&source[i..i + len]);
				i += len;
			}
		}
	}

	RewriteOutcome { text: out, classes }
}

fn is_ident_start(byte: u8) -> bool {
	byte.is_ascii_alphabetic() || byte == b'_'
}

fn is_ident_char(byte: u8) -> bool {
	byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}

/// Locate the identifier following a `.` that forms a class selector.
///
/// Returns `None` when the dot is part of something else, most commonly a
/// decimal fraction such as `.5em`.
fn class_ident_at(bytes: &[u8], dot: usize) -> Option<(usize, usize)> {
	let first = *bytes.get(dot + 1)?;
	let valid = if is_ident_start(first) {
		true
	} else if first == b'-' {
		matches!(bytes.get(dot + 2), Some(&b) if is_ident_start(b) || b == b'-')
	} else {
		false
	};
	if !valid {
		return None;
	}

	let start = dot + 1;
	let mut end = start + 1;
	while end < bytes.len() && is_ident_char(bytes[end]) {
		end += 1;
	}
	Some((start, end))
}

fn has_ci_prefix(bytes: &[u8], at: usize, prefix: &[u8]) -> bool {
	bytes.len() >= at + prefix.len() && bytes[at..at + prefix.len()].eq_ignore_ascii_case(prefix)
}

fn is_url_start(bytes: &[u8], at: usize) -> bool {
	has_ci_prefix(bytes, at, b"url(")
		&& (at == 0 || (!is_ident_char(bytes[at - 1]) && bytes[at - 1] != b'.'))
}

fn block_comment_end(bytes: &[u8], mut i: usize) -> usize {
	while i < bytes.len() {
		if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
			return i + 2;
		}
		i += 1;
	}
	bytes.len()
}

fn line_end(bytes: &[u8], mut i: usize) -> usize {
	while i < bytes.len() && bytes[i] != b'\n' {
		i += 1;
	}
	i
}

fn string_end(bytes: &[u8], start: usize) -> usize {
	let quote = bytes[start];
	let mut i = start + 1;
	while i < bytes.len() {
		match bytes[i] {
			b'\\' => i += 2,
			byte if byte == quote => return i + 1,
			_ => i += 1,
		}
	}
	bytes.len()
}

/// Advance past a `(`-delimited group, honouring nesting and strings.
/// `i` points just past the opening parenthesis.
fn balanced_paren_end(bytes: &[u8], mut i: usize) -> usize {
	let mut depth = 1usize;
	while i < bytes.len() {
		match bytes[i] {
			b'(' => {
				depth += 1;
				i += 1;
			}
			b')' => {
				depth -= 1;
				i += 1;
				if depth == 0 {
					return i;
				}
			}
			b'"' | b'\'' => i = string_end(bytes, i),
			_ => i += 1,
		}
	}
	bytes.len()
}

fn utf8_len(byte: u8) -> usize {
	match byte {
		b if b < 0x80 => 1,
		b if b >> 5 == 0b110 => 2,
		b if b >> 4 == 0b1110 => 3,
		_ => 4,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tag(name: &str) -> String {
		format!("{name}__t35t")
	}

	#[test]
	fn rewrites_a_simple_class_selector() {
		let outcome = rewrite_classes(".button { color: red; }", tag);
		assert_eq!(outcome.text, ".button__t35t { color: red; }");
		assert_eq!(outcome.classes["button"], "button__t35t");
	}

	#[test]
	fn rewrites_compound_and_pseudo_selectors() {
		let outcome = rewrite_classes("div.button:hover, .icon.small {}", tag);
		assert_eq!(
			outcome.text,
			"div.button__t35t:hover, .icon__t35t.small__t35t {}"
		);
		assert_eq!(outcome.classes.len(), 3);
	}

	#[test]
	fn repeated_selectors_share_one_mapping() {
		let mut calls = 0;
		let outcome = rewrite_classes(".a {} .a .a {}", |name| {
			calls += 1;
			format!("{name}__n")
		});
		assert_eq!(outcome.text, ".a__n {} .a__n .a__n {}");
		assert_eq!(calls, 1);
	}

	#[test]
	fn scss_nesting_and_parent_selector() {
		let source = ".card {\n  &.active { border: 0; }\n}\n";
		let outcome = rewrite_classes(source, tag);
		assert_eq!(
			outcome.text,
			".card__t35t {\n  &.active__t35t { border: 0; }\n}\n"
		);
	}

	#[test]
	fn comments_are_left_alone() {
		let source = "/* .hidden */ .real {} // .nope\n.last {}";
		let outcome = rewrite_classes(source, tag);
		assert_eq!(
			outcome.text,
			"/* .hidden */ .real__t35t {} // .nope\n.last__t35t {}"
		);
		assert!(!outcome.classes.contains_key("hidden"));
		assert!(!outcome.classes.contains_key("nope"));
	}

	#[test]
	fn strings_and_urls_are_left_alone() {
		let source = ".a { content: \".fake\"; background: url(./img.icon.png); }";
		let outcome = rewrite_classes(source, tag);
		assert_eq!(
			outcome.text,
			".a__t35t { content: \".fake\"; background: url(./img.icon.png); }"
		);
		assert_eq!(outcome.classes.len(), 1);
	}

	#[test]
	fn global_groups_pass_through_unscoped() {
		let source = ":global(.app .theme-dark) .panel {}";
		let outcome = rewrite_classes(source, tag);
		assert_eq!(outcome.text, ":global(.app .theme-dark) .panel__t35t {}");
		assert_eq!(outcome.classes.len(), 1);
	}

	#[test]
	fn decimal_fractions_are_not_classes() {
		let source = ".m { margin: .5em 0.25rem; }";
		let outcome = rewrite_classes(source, tag);
		assert_eq!(outcome.text, ".m__t35t { margin: .5em 0.25rem; }");
	}

	#[test]
	fn unterminated_constructs_pass_through() {
		let outcome = rewrite_classes(".a { content: \"unclosed", tag);
		assert_eq!(outcome.text, ".a__t35t { content: \"unclosed");

		let outcome = rewrite_classes("/* runs off the end .b", tag);
		assert_eq!(outcome.text, "/* runs off the end .b");
		assert!(outcome.classes.is_empty());
	}

	#[test]
	fn non_ascii_content_is_preserved() {
		let source = "/* náv → */ .nav { content: \"→\"; }";
		let outcome = rewrite_classes(source, tag);
		assert_eq!(outcome.text, "/* náv → */ .nav__t35t { content: \"→\"; }");
	}

	#[test]
	fn empty_input_yields_empty_outcome() {
		let outcome = rewrite_classes("", tag);
		assert!(outcome.text.is_empty());
		assert!(outcome.classes.is_empty());
	}
}
