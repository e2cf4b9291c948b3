use anyhow::Result;
use lims_cli::config::resolve_options;
use lims_cli::pipeline::{PipelineReport, PipelineRequest, run_pipeline};
use lims_model::content_hash;
use tracing::info_span;

use crate::cli::RunArgs;

pub fn run_batch(args: &RunArgs) -> Result<PipelineReport> {
    let span = info_span!("run", input = %args.input.display());
    let _guard = span.enter();
    let options = resolve_options(args.config.as_deref(), args.sla_ms)?;
    let request = PipelineRequest {
        input: args.input.clone(),
        format: args.format.map(Into::into),
        options,
        output_dir: args.output_dir.clone(),
        reconcile: !args.no_reconcile,
    };
    run_pipeline(&request)
}

pub fn run_checksum(text: &str) -> u32 {
    content_hash(text)
}
