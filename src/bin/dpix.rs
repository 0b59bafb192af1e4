use std::process::ExitCode;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use dpix::args::Cli;
use dpix::convert::{convert_file, ConversionResult};
use dpix::error::ConvertError;
use dpix::help;
use dpix::image_rs::ImageRsCodec;
use dpix::plan::{BatchOutcome, BatchPlan, FileOutcome, ProgressEvent};
use dpix::prefs::Preferences;
use dpix::report::format_bytes;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.version {
        help::print_version();
        return ExitCode::SUCCESS;
    }
    init_logging(cli.log_level());

    match real_main(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!();
            eprintln!("✗ Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn real_main(cli: &Cli) -> Result<ExitCode, ConvertError> {
    let remembered = match &cli.prefs {
        Some(path) => Preferences::load(path)?,
        None => Preferences::default(),
    };
    let plan = BatchPlan::new(cli.inputs.iter().cloned(), &cli.template(&remembered))
        .with_jobs(usize::from(cli.jobs));

    if cli.is_single_file() {
        println!("dpix - Image Optimizer");
        println!();
        let result = convert_file(&ImageRsCodec, &plan.requests()[0], |_| {})?;
        print_success(&result, cli.resize_requested());
        save_preferences(cli, &remembered);
        return Ok(ExitCode::SUCCESS);
    }

    let outcome = if cli.json {
        plan.execute(&ImageRsCodec, &dpix::plan::NoProgress)
    } else {
        println!("dpix - Image Optimizer");
        println!();
        plan.execute(&ImageRsCodec, &print_file_start)
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&outcome)
            .map_err(|e| ConvertError::filesystem("<stdout>", e.into()))?;
        println!("{json}");
    } else {
        print_batch(&outcome, cli.resize_requested());
    }

    if outcome.succeeded() > 0 {
        save_preferences(cli, &remembered);
    }
    Ok(if outcome.all_succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_file_start(event: ProgressEvent) {
    if event.file_progress == 0 {
        eprintln!(
            "[{}/{}] {}",
            event.file_index + 1,
            event.total_files,
            event.current_file
        );
    }
}

fn print_success(result: &ConversionResult, resized: bool) {
    println!("✓ Success!");
    println!("Input:  {}", result.input_path.display());
    println!("Output: {}", result.output_path.display());
    println!("Format: {}", result.format);
    println!(
        "Size:   {} → {} ({:.1}% savings)",
        format_bytes(result.original_size_bytes),
        format_bytes(result.new_size_bytes),
        result.savings_percent
    );
    if resized {
        println!(
            "Dimensions: {}x{} → {}x{}",
            result.original_width, result.original_height, result.new_width, result.new_height
        );
    }
}

fn print_batch(outcome: &BatchOutcome, resized: bool) {
    for entry in &outcome.entries {
        println!();
        match entry {
            FileOutcome::Success(result) => print_success(result, resized),
            FileOutcome::Failure {
                input_path, error, ..
            } => {
                println!("✗ Failed: {}", input_path.display());
                println!("Error:  {error}");
            }
        }
    }
    println!();
    println!(
        "Converted {} of {} files",
        outcome.succeeded(),
        outcome.entries.len()
    );
}

fn save_preferences(cli: &Cli, remembered: &Preferences) {
    let Some(path) = &cli.prefs else {
        return;
    };
    if let Err(e) = cli.preferences(remembered).save(path) {
        warn!("{e}");
    }
}
