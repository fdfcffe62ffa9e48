use anyhow::Result;
use cssmod::{Pipeline, PipelineReport};

use crate::settings::ResolvedConfig;

/// Coordinates turning resolved configuration into a pipeline run.
pub(crate) struct ScopeWorkflow {
    pipeline: Pipeline,
}

impl ScopeWorkflow {
    pub(crate) fn from_config(config: ResolvedConfig, dry_run: bool) -> Self {
        let ResolvedConfig {
            root,
            out_dir,
            manifest_path,
            options,
            format: _,
        } = config;

        let pipeline = Pipeline::new(root, out_dir)
            .with_options(options)
            .with_manifest_path(manifest_path)
            .dry_run(dry_run);

        Self { pipeline }
    }

    pub(crate) fn run(self) -> Result<PipelineReport> {
        Ok(self.pipeline.run()?)
    }
}
