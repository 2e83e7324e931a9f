//! `polydoc build` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use polydoc_site::FsOutput;

use super::{SiteArgs, compilation_mode, content_type, site_builder};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    pub(crate) site: SiteArgs,

    /// Output directory for the generated site (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.site.load_config(self.output_dir)?;
        let output_dir = config.docs_resolved.output_dir.clone();

        output.info(&format!(
            "Source: {}",
            config.docs_resolved.source_dir.display()
        ));
        output.info(&format!("Output: {}", output_dir.display()));

        let sink = FsOutput::new(output_dir.clone())
            .with_content_type(content_type(&config))
            .with_mode(compilation_mode(&config))
            .with_root_url(config.site_resolved.root_url.clone());
        let site = site_builder(&config)?
            .with_output(Arc::new(sink))
            .build()?;

        let report = site.run()?;
        output.report(&report);
        output.success(&format!(
            "Site built successfully to {}",
            output_dir.display()
        ));
        Ok(())
    }
}
