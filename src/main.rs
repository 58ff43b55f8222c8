//! nsrl-convert - canonical NSRL hash lists from text and CSV exports
//!
//! Main entry point for the command-line application.

use clap::Parser;
use colored::*;
use std::process;

use nsrl_convert::catalog::HashCatalog;
use nsrl_convert::cli::Args;
use nsrl_convert::error::{exit_code, ConvertError};
use nsrl_convert::processor::{Converter, ConverterConfig};
use nsrl_convert::progress::{
    print_banner, print_bullet, print_error, print_header, print_info, print_success,
    print_warning, NullProgress, ProgressSink, SpinnerProgress,
};

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up logging
    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    } else if !args.quiet {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    if let Err(e) = run(&args) {
        print_error(&format!("{}", e));

        if args.verbose {
            let mut source = e.source();
            while let Some(err) = source {
                print_error(&format!("  Caused by: {}", err));
                source = err.source();
            }
        }

        process::exit(exit_code_for(&e));
    }
}

/// Process exit code for a failed run
fn exit_code_for(e: &anyhow::Error) -> i32 {
    e.downcast_ref::<ConvertError>()
        .map(ConvertError::exit_code)
        .unwrap_or(exit_code::FAILURE)
}

fn run(args: &Args) -> anyhow::Result<()> {
    // Print banner unless quiet mode
    if !args.quiet {
        print_banner();
    }

    let input = args.input_path()?;
    let config = ConverterConfig::from_args(args)?;

    if !args.quiet && args.verbose {
        print_config(args, &config);
    }

    let converter = Converter::new(config)?;

    if !args.quiet {
        print_header(&format!("Extracting hashes from {:?}...", input));
    }

    let mut progress = progress_sink(args.quiet, "Hashes processed");
    let stats = converter.convert(&input, progress.as_mut())?;

    if !args.quiet {
        stats.print_summary();
    }

    if args.needs_catalog() {
        if args.dry_run {
            print_warning("Dry run: nothing written, skipping --verify and --query");
        } else {
            let mut progress = progress_sink(args.quiet, "Hashes loaded");
            let catalog = converter.load_catalog(progress.as_mut())?;
            report_catalog(args, &catalog);
        }
    }

    Ok(())
}

fn progress_sink(quiet: bool, label: &str) -> Box<dyn ProgressSink> {
    if quiet {
        Box::new(NullProgress)
    } else {
        Box::new(SpinnerProgress::new(label))
    }
}

/// Print verification and lookup results
fn report_catalog(args: &Args, catalog: &HashCatalog) {
    if args.verify && !args.quiet {
        print_header("Verification");
        let algorithm = catalog
            .algorithm()
            .map(|a| a.to_string())
            .unwrap_or_else(|| "none".to_string());
        print_success(&format!(
            "{:?} is a valid hash list: {} unique {} hashes",
            args.output,
            catalog.len(),
            algorithm
        ));
    }

    if args.query.is_empty() {
        return;
    }

    if !args.quiet {
        print_header("Lookup");
    }
    for hash in &args.query {
        let found = catalog.contains(hash);
        if args.quiet {
            println!("{} {}", hash, if found { 1 } else { 0 });
        } else if found {
            print_bullet(&format!("{} {}", hash, "found".green()));
        } else {
            print_bullet(&format!("{} {}", hash, "not found".yellow()));
        }
    }
}

/// Print configuration summary
fn print_config(args: &Args, config: &ConverterConfig) {
    print_header("Configuration");

    print_info(&format!("Input:        {:?}", args.input));
    print_info(&format!("Output:       {:?}", config.output_path));
    print_info(&format!("Matcher:      {:?}", config.matcher));
    print_info(&format!("Sort:         {}", config.normalize.sort));
    print_info(&format!("Dedup:        {}", config.normalize.dedup));
    print_info(&format!("Dry run:      {}", config.dry_run));
    print_info(&format!("Progress:     every {} hashes", config.progress_interval));
}
