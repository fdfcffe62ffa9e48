//! Locating module stylesheets on disk.

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::Path;

use ignore::{Walk, WalkBuilder};

/// Configuration options for scanning a project tree for module stylesheets.
#[derive(Debug, Clone)]
pub struct ScanOptions {
	/// Include hidden files and directories.
	pub include_hidden: bool,
	/// Follow symbolic links during traversal.
	pub follow_symlinks: bool,
	/// Respect .ignore files.
	pub respect_ignore_files: bool,
	/// Respect .gitignore files.
	pub git_ignore: bool,
	/// Respect global gitignore settings.
	pub git_global: bool,
	/// Respect git exclude files.
	pub git_exclude: bool,
	/// Directory names to always skip.
	pub global_ignores: Vec<String>,
	/// Maximum directory traversal depth.
	pub max_depth: Option<usize>,
	/// File-name suffixes that mark a stylesheet as a CSS module.
	pub module_suffixes: Vec<String>,
}

impl Default for ScanOptions {
	fn default() -> Self {
		Self {
			include_hidden: false,
			follow_symlinks: false,
			respect_ignore_files: true,
			git_ignore: true,
			git_global: true,
			git_exclude: true,
			global_ignores: vec![
				".git".to_string(),
				"node_modules".to_string(),
				"target".to_string(),
				"dist".to_string(),
				"build".to_string(),
				"coverage".to_string(),
				".cache".to_string(),
				"vendor".to_string(),
			],
			max_depth: None,
			module_suffixes: vec!["module.css".to_string(), "module.scss".to_string()],
		}
	}
}

impl ScanOptions {
	/// Whether a file name denotes a module stylesheet.
	pub fn is_module_file(&self, file_name: &str) -> bool {
		self.module_suffixes.iter().any(|suffix| {
			let suffix = normalize_suffix(suffix);
			!suffix.is_empty()
				&& file_name.len() > suffix.len() + 1
				&& file_name.ends_with(&suffix)
				&& file_name.as_bytes()[file_name.len() - suffix.len() - 1] == b'.'
		})
	}

	/// Create a set of directory names to globally ignore.
	pub fn global_ignore_set(&self) -> HashSet<OsString> {
		self.global_ignores
			.iter()
			.map(|entry| OsString::from(entry.as_str()))
			.collect()
	}

	/// Build a directory walker over `root` honouring these options.
	pub fn walker(&self, root: &Path) -> Walk {
		let ignored = self.global_ignore_set();
		WalkBuilder::new(root)
			.hidden(!self.include_hidden)
			.follow_links(self.follow_symlinks)
			.ignore(self.respect_ignore_files)
			.git_ignore(self.git_ignore)
			.git_global(self.git_global)
			.git_exclude(self.git_exclude)
			.max_depth(self.max_depth)
			.filter_entry(move |entry| {
				entry.depth() == 0 || !ignored.contains(entry.file_name())
			})
			.build()
	}
}

/// Strip glob-style and leading-dot decoration from a configured suffix.
///
/// Accepts `module.css`, `.module.css`, and `*.module.css` interchangeably.
fn normalize_suffix(suffix: &str) -> String {
	suffix
		.trim()
		.trim_start_matches('*')
		.trim_start_matches('.')
		.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn recognises_default_module_suffixes() {
		let options = ScanOptions::default();
		assert!(options.is_module_file("style.module.css"));
		assert!(options.is_module_file("style.module.scss"));
		assert!(!options.is_module_file("style.css"));
		assert!(!options.is_module_file("module.css"));
		assert!(!options.is_module_file("style.scss"));
	}

	#[test]
	fn suffix_decoration_is_tolerated() {
		let options = ScanOptions {
			module_suffixes: vec!["*.module.sass".to_string(), ".module.less".to_string()],
			..ScanOptions::default()
		};
		assert!(options.is_module_file("a.module.sass"));
		assert!(options.is_module_file("b.module.less"));
		assert!(!options.is_module_file("a.module.css"));
	}

	#[test]
	fn global_ignores_cover_common_build_output() {
		let set = ScanOptions::default().global_ignore_set();
		assert!(set.contains(&OsString::from("node_modules")));
		assert!(set.contains(&OsString::from("dist")));
	}
}
