mod cli;
mod settings;
mod workflow;

use anyhow::Result;
use cli::{OutputFormat, parse_cli, print_json, print_plain};
use cssmod::logging;
use settings::ResolvedConfig;
use workflow::ScopeWorkflow;

fn main() -> Result<()> {
    let cli = parse_cli();
    logging::init(cli.verbose);

    let resolved = settings::load(&cli)?;

    if cli.print_config {
        resolved.print_summary();
        return Ok(());
    }

    run_pipeline(cli.dry_run, resolved)
}

/// Run the scoping pipeline and print the report in the chosen format.
fn run_pipeline(dry_run: bool, settings: ResolvedConfig) -> Result<()> {
    let format = settings.format;
    let workflow = ScopeWorkflow::from_config(settings, dry_run);
    let report = workflow.run()?;

    match format {
        OutputFormat::Plain => print_plain(&report, dry_run),
        OutputFormat::Json => print_json(&report)?,
    }

    Ok(())
}
