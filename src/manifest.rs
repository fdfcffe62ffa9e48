//! Manifest of local to scoped class-name mappings.
//!
//! Components resolve `styles.button` and friends through this manifest, so
//! its JSON shape is part of the tool's external contract: an object keyed by
//! root-relative source path, each value an object of local name to scoped
//! name. `BTreeMap` storage keeps the serialised form stable between runs.

use std::collections::BTreeMap;

use serde::Serialize;

/// Class mappings for every processed stylesheet.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ScopeManifest {
	files: BTreeMap<String, BTreeMap<String, String>>,
}

impl ScopeManifest {
	pub fn new() -> Self {
		Self::default()
	}

	/// Record the mappings for one source file, replacing any previous entry.
	pub fn insert_file(&mut self, source: impl Into<String>, classes: BTreeMap<String, String>) {
		self.files.insert(source.into(), classes);
	}

	/// Mappings keyed by root-relative source path.
	pub fn files(&self) -> &BTreeMap<String, BTreeMap<String, String>> {
		&self.files
	}

	pub fn is_empty(&self) -> bool {
		self.files.is_empty()
	}

	pub fn len(&self) -> usize {
		self.files.len()
	}

	/// Serialise the manifest as pretty-printed JSON.
	pub fn to_json_pretty(&self) -> serde_json::Result<String> {
		serde_json::to_string_pretty(self)
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;

	use serde_json::Value;

	use super::*;

	#[test]
	fn serialises_as_a_nested_object() {
		let mut manifest = ScopeManifest::new();
		let mut classes = BTreeMap::new();
		classes.insert("button".to_string(), "button__RDTC4".to_string());
		manifest.insert_file("src/components/Button/style.module.scss", classes);

		let json = manifest.to_json_pretty().expect("json");
		let value: Value = serde_json::from_str(&json).expect("parse");
		assert_eq!(
			value["src/components/Button/style.module.scss"]["button"],
			"button__RDTC4"
		);
	}

	#[test]
	fn inserting_a_file_twice_replaces_the_entry() {
		let mut manifest = ScopeManifest::new();
		manifest.insert_file("a.module.css", BTreeMap::new());

		let mut classes = BTreeMap::new();
		classes.insert("x".to_string(), "x__00000".to_string());
		manifest.insert_file("a.module.css", classes);

		assert_eq!(manifest.len(), 1);
		assert_eq!(manifest.files()["a.module.css"].len(), 1);
	}
}
