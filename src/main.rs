extern crate load_components;

use clap::Parser;
use load_components::core::units::UnitsStyle;
use load_components::output::FileOutput;
use load_components::{run_project, ProjectFlags};
use std::ffi::OsStr;
use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser, Default, Debug)]
#[clap(author, version, about, long_about = None)]
struct LoadComponentArgs {
    input_file: String,
    #[arg(
        long,
        short,
        help = "Directory to write report files to, defaults to <input file stem>__results"
    )]
    output_dir: Option<String>,
    #[arg(
        long,
        short,
        help = "Units style for the report tables, overriding the input file (None, JtoKWH, JtoMJ, JtoGJ, InchPound, InchPoundExceptElectricity)"
    )]
    units_style: Option<UnitsStyle>,
    #[arg(
        long,
        default_value_t = false,
        help = "Write the radiant to convective decay curves of every surface"
    )]
    show_decay_curves: bool,
    #[arg(
        long,
        default_value_t = false,
        help = "Produce the load component summary even if the input does not request it"
    )]
    force_report: bool,
    #[clap(long, short, default_value_t = false, help = "Log debug information")]
    verbose: bool,
    #[clap(long, default_value_t = false, help = "Whether to log out spans")]
    log_spans: bool,
}

fn main() -> anyhow::Result<()> {
    let args = LoadComponentArgs::parse();

    // set up basic tracing
    let tracing_subscriber = {
        let level = if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };
        let mut builder = tracing_subscriber::fmt::fmt().with_max_level(level);

        if args.log_spans {
            builder = builder.with_span_events(FmtSpan::CLOSE);
        }

        builder.finish()
    };
    tracing::subscriber::set_global_default(tracing_subscriber)?;

    let input_file = args.input_file.as_str();
    let input_file_ext = Path::new(input_file).extension().and_then(OsStr::to_str);
    let input_file_stem = match input_file_ext {
        Some(ext) => &input_file[..(input_file.len() - ext.len() - 1)],
        None => input_file,
    };
    let input_file_stem = PathBuf::from(input_file_stem);

    let output_path = match args.output_dir {
        Some(output_dir) => PathBuf::from(output_dir),
        None => PathBuf::from(format!("{}__results", input_file_stem.display())),
    };
    fs::create_dir_all(&output_path)?;
    let input_file_name = input_file_stem
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or("load_components");
    let file_output = FileOutput::new(output_path.clone(), format!("{input_file_name}__{{}}.{{}}"));
    debug!(output_path = %output_path.display(), "Writing reports");

    let flags = ProjectFlags {
        force_report: args.force_report,
        units_style: args.units_style,
        show_decay_curves: args.show_decay_curves,
    };

    let summary = run_project(BufReader::new(File::open(input_file)?), &file_output, flags)?;

    match summary {
        Some(summary) => info!(
            zones = summary.zones.len(),
            air_loops = summary.air_loops.len(),
            facility = summary.facility.is_some(),
            "Load component summary written"
        ),
        None => info!("No load component summary was produced"),
    }

    Ok(())
}
