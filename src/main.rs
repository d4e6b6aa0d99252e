extern crate solar_report;

use anyhow::Context;
use clap::Parser;
use solar_report::output::{FileOutput, SinkOutput};
use solar_report::{run_report, REPORT_LOCATION_KEY};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Default, Debug)]
#[clap(author, version, about, long_about = None)]
struct ReportArgs {
    /// delimited file of meter and irradiance readings
    input_file: String,
    /// directory to write the report to, defaults to the input file's directory
    #[arg(long, short)]
    output_dir: Option<String>,
    /// run every calculation but write no report
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    #[arg(long, short, default_value_t = false)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = ReportArgs::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let input_path = Path::new(args.input_file.as_str());
    let input_stem = input_path
        .file_stem()
        .ok_or_else(|| anyhow::anyhow!("Could not determine input file name"))?
        .to_string_lossy()
        .to_string();
    let output_dir = match args.output_dir {
        Some(dir) => PathBuf::from(dir),
        None => input_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };

    let input = BufReader::new(
        File::open(input_path)
            .with_context(|| format!("Could not open input file {}", input_path.display()))?,
    );

    if args.dry_run {
        run_report(input, SinkOutput)?;
    } else {
        let file_output = FileOutput::new(output_dir, format!("{input_stem}__{{}}.csv"));
        run_report(input, &file_output)?;
        info!(
            "report written to {}",
            file_output
                .path_for_location_key(REPORT_LOCATION_KEY)?
                .display()
        );
    }

    Ok(())
}
