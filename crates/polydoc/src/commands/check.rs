//! `polydoc check` command implementation.

use std::sync::Arc;

use clap::Args;
use polydoc_site::MemoryOutput;

use super::{SiteArgs, compilation_mode, content_type, site_builder};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub(crate) site: SiteArgs,
}

impl CheckArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.site.load_config(None)?;

        output.info(&format!(
            "Checking {}",
            config.docs_resolved.source_dir.display()
        ));

        let sink = MemoryOutput::new()
            .with_content_type(content_type(&config))
            .with_mode(compilation_mode(&config))
            .with_root_url(config.site_resolved.root_url.clone());
        let site = site_builder(&config)?
            .with_output(Arc::new(sink))
            .build()?;

        let report = site.run()?;
        output.report(&report);
        output.success("Documentation compiles");
        Ok(())
    }
}
