use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail, ensure};
use config::{Config, ConfigError, File};
use serde::Deserialize;

use cssmod::{ScanOptions, app_dirs};

use crate::cli::{CliArgs, OutputFormat};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    scan: ScanSection,
    output: OutputSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ScanSection {
    root: Option<PathBuf>,
    include_hidden: Option<bool>,
    follow_symlinks: Option<bool>,
    respect_ignore_files: Option<bool>,
    git_ignore: Option<bool>,
    git_global: Option<bool>,
    git_exclude: Option<bool>,
    max_depth: Option<usize>,
    global_ignores: Option<Vec<String>>,
    module_extensions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct OutputSection {
    dir: Option<PathBuf>,
    manifest: Option<PathBuf>,
    format: Option<String>,
}

pub(crate) struct ResolvedConfig {
    pub(crate) root: PathBuf,
    pub(crate) out_dir: PathBuf,
    pub(crate) manifest_path: Option<PathBuf>,
    pub(crate) options: ScanOptions,
    pub(crate) format: OutputFormat,
}

impl ResolvedConfig {
    pub(crate) fn print_summary(&self) {
        println!("Effective configuration:");
        println!("  Root: {}", self.root.display());
        println!("  Output directory: {}", self.out_dir.display());
        match &self.manifest_path {
            Some(path) => println!("  Manifest: {}", path.display()),
            None => println!("  Manifest: (disabled)"),
        }
        println!(
            "  Module suffixes: {}",
            self.options.module_suffixes.join(", ")
        );
        println!(
            "  Include hidden: {}",
            bool_to_word(self.options.include_hidden)
        );
        println!(
            "  Follow symlinks: {}",
            bool_to_word(self.options.follow_symlinks)
        );
        println!(
            "  Respect ignore files: {}",
            bool_to_word(self.options.respect_ignore_files)
        );
        println!("  Git ignore: {}", bool_to_word(self.options.git_ignore));
        println!("  Git global: {}", bool_to_word(self.options.git_global));
        println!("  Git exclude: {}", bool_to_word(self.options.git_exclude));
        match self.options.max_depth {
            Some(depth) => println!("  Max depth: {depth}"),
            None => println!("  Max depth: unlimited"),
        }
        if !self.options.global_ignores.is_empty() {
            println!(
                "  Global ignores: {}",
                self.options.global_ignores.join(", ")
            );
        }
        println!("  Report format: {}", self.format.as_str());
    }
}

pub(crate) fn load(cli: &CliArgs) -> Result<ResolvedConfig> {
    let builder = build_config(cli)?;
    let mut raw: RawConfig = builder
        .try_deserialize()
        .map_err(|err| anyhow!("failed to deserialize configuration: {err}"))?;
    raw.apply_cli_overrides(cli);
    raw.resolve()
}

fn build_config(cli: &CliArgs) -> Result<Config> {
    let mut builder = Config::builder();

    if !cli.no_config {
        for path in default_config_files() {
            builder = builder.add_source(File::from(path).required(false));
        }
    }

    for path in &cli.config {
        builder = builder.add_source(File::from(path.clone()).required(true));
    }

    builder = builder.add_source(
        config::Environment::with_prefix("cssmod")
            .separator("__")
            .try_parsing(true)
            .list_separator(","),
    );

    builder.build().map_err(|err| match err {
        ConfigError::Frozen => anyhow!("configuration builder is frozen"),
        other => other.into(),
    })
}

fn default_config_files() -> Vec<PathBuf> {
    let mut files = Vec::new();

    if let Ok(dir) = app_dirs::get_config_dir() {
        files.push(dir.join("config.toml"));
    }

    if let Ok(current_dir) = env::current_dir() {
        files.push(current_dir.join(".cssmod.toml"));
        files.push(current_dir.join("cssmod.toml"));
    }

    files
}

impl RawConfig {
    fn apply_cli_overrides(&mut self, cli: &CliArgs) {
        if let Some(root) = cli.root.clone() {
            self.scan.root = Some(root);
        }
        if let Some(value) = cli.hidden {
            self.scan.include_hidden = Some(value);
        }
        if let Some(value) = cli.follow_symlinks {
            self.scan.follow_symlinks = Some(value);
        }
        if let Some(value) = cli.respect_ignore_files {
            self.scan.respect_ignore_files = Some(value);
        }
        if let Some(value) = cli.git_ignore {
            self.scan.git_ignore = Some(value);
        }
        if let Some(value) = cli.git_global {
            self.scan.git_global = Some(value);
        }
        if let Some(value) = cli.git_exclude {
            self.scan.git_exclude = Some(value);
        }
        if let Some(value) = cli.max_depth {
            self.scan.max_depth = Some(value);
        }
        if let Some(value) = &cli.global_ignores {
            self.scan.global_ignores = Some(value.clone());
        }
        if let Some(value) = &cli.extensions {
            self.scan.module_extensions = Some(value.clone());
        }

        if let Some(dir) = cli.out_dir.clone() {
            self.output.dir = Some(dir);
        }
        if let Some(path) = cli.manifest.clone() {
            self.output.manifest = Some(path);
        }
        if let Some(format) = cli.output {
            self.output.format = Some(format.as_str().to_string());
        }
    }

    fn resolve(self) -> Result<ResolvedConfig> {
        let root = match self.scan.root {
            Some(root) => root,
            None => env::current_dir().context("unable to determine the current directory")?,
        };

        let mut options = ScanOptions::default();
        if let Some(value) = self.scan.include_hidden {
            options.include_hidden = value;
        }
        if let Some(value) = self.scan.follow_symlinks {
            options.follow_symlinks = value;
        }
        if let Some(value) = self.scan.respect_ignore_files {
            options.respect_ignore_files = value;
        }
        if let Some(value) = self.scan.git_ignore {
            options.git_ignore = value;
        }
        if let Some(value) = self.scan.git_global {
            options.git_global = value;
        }
        if let Some(value) = self.scan.git_exclude {
            options.git_exclude = value;
        }
        if let Some(depth) = self.scan.max_depth {
            options.max_depth = Some(depth);
        }
        if let Some(ignores) = self.scan.global_ignores {
            options.global_ignores = ignores;
        }
        if let Some(suffixes) = self.scan.module_extensions {
            ensure!(
                !suffixes.is_empty(),
                "module_extensions must name at least one suffix"
            );
            options.module_suffixes = suffixes;
        }

        let out_dir = self.output.dir.unwrap_or_else(|| root.join("dist"));
        let manifest_path = Some(
            self.output
                .manifest
                .unwrap_or_else(|| out_dir.join("cssmod.manifest.json")),
        );

        let format = match self.output.format.as_deref() {
            None => OutputFormat::Plain,
            Some(name) => parse_format(name)?,
        };

        Ok(ResolvedConfig {
            root,
            out_dir,
            manifest_path,
            options,
            format,
        })
    }
}

fn parse_format(name: &str) -> Result<OutputFormat> {
    match name.trim().to_ascii_lowercase().as_str() {
        "plain" => Ok(OutputFormat::Plain),
        "json" => Ok(OutputFormat::Json),
        other => bail!("unknown output format '{other}' (expected 'plain' or 'json')"),
    }
}

fn bool_to_word(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_take_precedence() {
        let mut raw = RawConfig::default();
        raw.scan.include_hidden = Some(false);
        raw.output.format = Some("plain".to_string());

        let cli = cli_with(|args| {
            args.root = Some(PathBuf::from("/tmp/project"));
            args.hidden = Some(true);
            args.output = Some(OutputFormat::Json);
        });
        raw.apply_cli_overrides(&cli);

        let resolved = raw.resolve().expect("resolves");
        assert_eq!(resolved.root, PathBuf::from("/tmp/project"));
        assert!(resolved.options.include_hidden);
        assert_eq!(resolved.format, OutputFormat::Json);
    }

    #[test]
    fn defaults_fill_in_output_paths() {
        let mut raw = RawConfig::default();
        raw.scan.root = Some(PathBuf::from("/tmp/project"));

        let resolved = raw.resolve().expect("resolves");
        assert_eq!(resolved.out_dir, PathBuf::from("/tmp/project/dist"));
        assert_eq!(
            resolved.manifest_path,
            Some(PathBuf::from("/tmp/project/dist/cssmod.manifest.json"))
        );
        assert_eq!(resolved.format, OutputFormat::Plain);
    }

    #[test]
    fn empty_module_extensions_are_rejected() {
        let mut raw = RawConfig::default();
        raw.scan.root = Some(PathBuf::from("/tmp/project"));
        raw.scan.module_extensions = Some(Vec::new());

        assert!(raw.resolve().is_err());
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(parse_format("yaml").is_err());
        assert_eq!(parse_format(" JSON ").expect("parses"), OutputFormat::Json);
    }

    fn cli_with(apply: impl FnOnce(&mut CliArgs)) -> CliArgs {
        use clap::{CommandFactory, FromArgMatches};

        let mut matches = CliArgs::command().get_matches_from(vec!["cssmod"]);
        let mut args = CliArgs::from_arg_matches_mut(&mut matches).expect("parses");
        apply(&mut args);
        args
    }
}
