//! Bundled test events.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use hookview_core::error::AppError;
use hookview_core::samples::TestEventKind;

use crate::output::{self, OutputFormat};

/// Arguments for the samples command
#[derive(Debug, Args)]
pub struct SamplesArgs {
    /// Print the payload of one sample
    #[arg(long)]
    pub show: Option<TestEventKind>,
}

#[derive(Debug, Serialize, Tabled)]
struct SampleRow {
    label: &'static str,
    topic: &'static str,
}

/// Execute the samples command
pub fn execute(args: &SamplesArgs, format: OutputFormat) -> Result<(), AppError> {
    if let Some(kind) = args.show {
        output::print_json(&kind.payload(), true);
        return Ok(());
    }

    let rows: Vec<SampleRow> = TestEventKind::ALL
        .iter()
        .map(|kind| SampleRow {
            label: kind.label(),
            topic: kind.topic(),
        })
        .collect();
    output::print_rows(&rows, format);
    Ok(())
}
