#![allow(clippy::too_many_arguments)]

pub mod core;
pub mod errors;
pub mod input;
pub mod output;
pub mod project;
pub mod report_writer;
pub mod sizing_time;

pub use crate::core::load_components::report::LoadComponentSummary;
use crate::core::load_components::decay_curve::{
    compute_decay_curves, write_decay_curve_diagnostics,
};
use crate::core::load_components::report::LoadComponentSummaryBuilder;
use crate::core::units::UnitsStyle;
use crate::input::ingest_for_processing;
use crate::output::Output;
use crate::project::Project;
use crate::report_writer::{objects_by_scope, render_object_report, CsvTableWriter};
use std::io::{Read, Write};
use tracing::info;

/// Adjustments to the input document made when running, e.g. from the command line
#[derive(Clone, Copy, Debug, Default)]
pub struct ProjectFlags {
    /// Produce the load component summary even if the input does not ask for it
    pub force_report: bool,
    pub units_style: Option<UnitsStyle>,
    pub show_decay_curves: bool,
}

/// Build the load component summary for a recorded sizing run and write its tables.
///
/// Each zone, air loop and the facility get their own output location. Returns None when
/// the summary was not requested.
pub fn run_project(
    input: impl Read,
    output: impl Output,
    flags: ProjectFlags,
) -> Result<Option<LoadComponentSummary>, anyhow::Error> {
    let mut input_for_processing = ingest_for_processing(input)?;

    if flags.force_report {
        input_for_processing.request_load_component_summary();
    }
    if let Some(units_style) = flags.units_style {
        input_for_processing.set_units_style(units_style);
    }
    if flags.show_decay_curves {
        input_for_processing.set_show_decay_curves(true);
    }

    let Project {
        options,
        sizing_time,
        building,
        sizing,
        mut store,
    } = Project::from_input(input_for_processing.finalize())?;

    if !store.report_requested() {
        info!("Load component summary was not requested, nothing to do");
        return Ok(None);
    }

    let curves = compute_decay_curves(&mut store, &building, &sizing);
    if options.show_decay_curves && !output.is_noop() {
        let mut writer = output.writer_for_location_key("decay_curves", "csv")?;
        write_decay_curve_diagnostics(&curves, &building, &mut writer)?;
        writer.flush()?;
    }

    let summary =
        LoadComponentSummaryBuilder::new(&building, &sizing_time, &sizing, &curves, &options)
            .build(&mut store);

    if !output.is_noop() {
        for (scope, tables) in objects_by_scope(&summary) {
            let location_key = scope.location_key(&tables.name);
            info!(
                report = scope.report_name(),
                object = tables.name.as_str(),
                "writing out to {location_key}"
            );
            let mut writer =
                CsvTableWriter::new(output.writer_for_location_key(&location_key, "csv")?);
            for table in render_object_report(tables, scope, summary.units_style, &building) {
                table.write_to(&mut writer)?;
            }
            writer.flush()?;
        }
    }

    Ok(Some(summary))
}
