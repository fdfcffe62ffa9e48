use anyhow::Result;
use cssmod::PipelineReport;
use serde_json::json;

/// Print a plain-text summary of the pipeline report.
pub(crate) fn print_plain(report: &PipelineReport, dry_run: bool) {
	if report.files.is_empty() {
		println!("No module stylesheets found");
		return;
	}

	for file in &report.files {
		match &file.output {
			Some(path) => println!(
				"{} -> {} ({} classes)",
				file.source,
				path.display(),
				file.classes.len()
			),
			None => println!("{} ({} classes)", file.source, file.classes.len()),
		}
		if dry_run {
			for (local, scoped) in &file.classes {
				println!("  .{local} -> .{scoped}");
			}
		}
	}

	println!(
		"Scoped {} classes across {} files",
		report.classes_scoped,
		report.files.len()
	);
	if let Some(path) = &report.manifest_path {
		println!("Manifest written to {}", path.display());
	}
}

/// Format the pipeline report as a JSON string.
pub(crate) fn format_report_json(report: &PipelineReport) -> Result<String> {
	let files: Vec<_> = report
		.files
		.iter()
		.map(|file| {
			json!({
				"source": file.source,
				"output": file.output.as_ref().map(|path| path.display().to_string()),
				"classes": &file.classes,
			})
		})
		.collect();

	let payload = json!({
		"files": files,
		"classes_scoped": report.classes_scoped,
		"manifest": report.manifest_path.as_ref().map(|path| path.display().to_string()),
	});

	Ok(serde_json::to_string_pretty(&payload)?)
}

/// Print the JSON representation of the pipeline report.
pub(crate) fn print_json(report: &PipelineReport) -> Result<()> {
	println!("{}", format_report_json(report)?);
	Ok(())
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;

	use cssmod::{FileReport, PipelineReport, ScopeManifest};
	use serde_json::Value;

	use super::*;

	#[test]
	fn json_report_includes_class_mappings() {
		let mut classes = BTreeMap::new();
		classes.insert("button".to_string(), "button__RDTC4".to_string());
		let report = PipelineReport {
			files: vec![FileReport {
				source: "src/components/Button/style.module.scss".into(),
				output: None,
				classes,
			}],
			manifest: ScopeManifest::new(),
			manifest_path: None,
			classes_scoped: 1,
		};

		let json = format_report_json(&report).expect("json");
		let value: Value = serde_json::from_str(&json).expect("parse");
		assert_eq!(value["classes_scoped"], 1);
		assert_eq!(value["files"][0]["classes"]["button"], "button__RDTC4");
		assert!(value["files"][0]["output"].is_null());
		assert!(value["manifest"].is_null());
	}
}
