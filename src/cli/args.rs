use std::fmt::Write;
use std::path::PathBuf;

use clap::{
    ArgAction, ColorChoice, CommandFactory, FromArgMatches, Parser, ValueEnum,
    builder::{
        BoolishValueParser, Styles,
        styling::{AnsiColor, Effects},
    },
};
use cssmod::app_dirs;

/// Produce the full version banner including the config directory.
fn long_version() -> &'static str {
    let config_dir = match app_dirs::get_config_dir() {
        Ok(path) => path.display().to_string(),
        Err(err) => format!("unavailable ({err})"),
    };

    let mut details = format!("cssmod {}", env!("CARGO_PKG_VERSION"));
    let _ = writeln!(details);
    let _ = writeln!(details, "config directory: {config_dir}");

    Box::leak(details.into_boxed_str())
}

/// Create the clap styles used for custom colour output.
fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
}

/// Parse command line arguments into the strongly typed [`CliArgs`] structure.
pub(crate) fn parse_cli() -> CliArgs {
    let mut matches = CliArgs::command().get_matches();
    CliArgs::from_arg_matches_mut(&mut matches).unwrap_or_else(|err| err.exit())
}

#[derive(Parser, Debug)]
#[command(
    name = "cssmod",
    version,
    long_version = long_version(),
    about = "Scope CSS module class names with deterministic fingerprints",
    color = ColorChoice::Auto,
    styles = cli_styles()
)]
/// Command-line arguments accepted by the `cssmod` binary.
pub(crate) struct CliArgs {
    #[arg(
        short,
        long = "config",
        value_name = "FILE",
        env = "CSSMOD_CONFIG",
        action = ArgAction::Append,
        help = "Additional configuration file to merge (default: none)"
    )]
    pub(crate) config: Vec<PathBuf>,
    #[arg(
        short = 'n',
        long = "no-config",
        help = "Skip loading default configuration files (default: disabled)"
    )]
    pub(crate) no_config: bool,
    #[arg(
        short = 'r',
        long,
        value_name = "PATH",
        help = "Override the project root to scan (default: current directory)"
    )]
    pub(crate) root: Option<PathBuf>,
    #[arg(
        short = 'd',
        long = "out-dir",
        value_name = "PATH",
        help = "Directory for rewritten stylesheets (default: <root>/dist)"
    )]
    pub(crate) out_dir: Option<PathBuf>,
    #[arg(
        long,
        value_name = "FILE",
        help = "Path for the JSON class-name manifest (default: <out-dir>/cssmod.manifest.json)"
    )]
    pub(crate) manifest: Option<PathBuf>,
    #[arg(
        short = 'e',
        long = "extensions",
        value_name = "SUFFIXES",
        value_delimiter = ',',
        help = "File suffixes treated as module stylesheets (default: module.css,module.scss)"
    )]
    pub(crate) extensions: Option<Vec<String>>,
    #[arg(
        short = 'H',
        long = "hidden",
        value_parser = BoolishValueParser::new(),
        help = "Include hidden files (default: disabled)"
    )]
    pub(crate) hidden: Option<bool>,
    #[arg(
        short = 's',
        long = "follow-symlinks",
        value_parser = BoolishValueParser::new(),
        help = "Follow symbolic links while scanning (default: disabled)"
    )]
    pub(crate) follow_symlinks: Option<bool>,
    #[arg(
        long = "respect-ignore-files",
        value_parser = BoolishValueParser::new(),
        help = "Respect .ignore files (default: enabled)"
    )]
    pub(crate) respect_ignore_files: Option<bool>,
    #[arg(
        long = "git-ignore",
        value_parser = BoolishValueParser::new(),
        help = "Respect .gitignore files (default: enabled)"
    )]
    pub(crate) git_ignore: Option<bool>,
    #[arg(
        long = "git-global",
        value_parser = BoolishValueParser::new(),
        help = "Respect global gitignore settings (default: enabled)"
    )]
    pub(crate) git_global: Option<bool>,
    #[arg(
        long = "git-exclude",
        value_parser = BoolishValueParser::new(),
        help = "Respect git exclude files (default: enabled)"
    )]
    pub(crate) git_exclude: Option<bool>,
    #[arg(
        long = "global-ignores",
        value_name = "NAMES",
        value_delimiter = ',',
        help = "Directory names to always skip (default: .git,node_modules,target,dist,...)"
    )]
    pub(crate) global_ignores: Option<Vec<String>>,
    #[arg(
        long = "max-depth",
        value_name = "NUM",
        help = "Limit directory traversal depth (default: unlimited)"
    )]
    pub(crate) max_depth: Option<usize>,
    #[arg(
        long = "dry-run",
        help = "Compute and print mappings without writing any files (default: disabled)"
    )]
    pub(crate) dry_run: bool,
    #[arg(
        short = 'p',
        long = "print-config",
        help = "Print the effective configuration and exit (default: disabled)"
    )]
    pub(crate) print_config: bool,
    #[arg(
        short = 'o',
        long,
        value_enum,
        value_name = "FORMAT",
        help = "Report format for the run summary (default: plain)"
    )]
    pub(crate) output: Option<OutputFormat>,
    #[arg(
        short = 'v',
        long,
        help = "Enable debug logging to stderr (default: disabled)"
    )]
    pub(crate) verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
/// Output formats supported by the CLI utility.
pub(crate) enum OutputFormat {
    Plain,
    Json,
}

impl OutputFormat {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Plain => "plain",
            OutputFormat::Json => "json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_describes_itself() {
        let command = CliArgs::command();
        assert!(command.get_about().is_some());
    }

    #[test]
    fn parse_cli_accepts_default_arguments() {
        let command = CliArgs::command();
        let mut matches = command.get_matches_from(vec!["cssmod"]);
        let parsed = CliArgs::from_arg_matches_mut(&mut matches).expect("parses");
        assert_eq!(parsed.output, None);
        assert!(!parsed.dry_run);
    }

    #[test]
    fn extensions_flag_accepts_a_comma_list() {
        let command = CliArgs::command();
        let mut matches =
            command.get_matches_from(vec!["cssmod", "--extensions", "module.css,module.less"]);
        let parsed = CliArgs::from_arg_matches_mut(&mut matches).expect("parses");
        assert_eq!(
            parsed.extensions.as_deref(),
            Some(&["module.css".to_string(), "module.less".to_string()][..])
        );
    }
}
