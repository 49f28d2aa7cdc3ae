use clap::Parser;
use rayon::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;

use funcprof::analysis::category_counts::{CategoryCounts, SampleCountTable};
use funcprof::analysis::profile_plots::{prepare_stacked_data, stacked_profile_plot, PlotOutput};
use funcprof::analysis::proportions::ProportionTable;
use funcprof::analysis::write_results::{write_count_table, write_proportion_table};
use funcprof::error::ProfileError;
use funcprof::parsers::annotation_parser::{read_categories, AnnotationSchema};
use funcprof::parsers::manifest_parser::read_manifest;

#[derive(Parser, Debug)]
#[command(
    name = "cog-compare",
    about = "Compare COG category profiles across annotated samples",
    version
)]
struct CliArgs {
    #[arg(
        short = 'm',
        long = "manifest",
        value_name = "FILE",
        help = "Tab-separated manifest with a `file` and a `sample` column, one annotation table per row.",
        required = true
    )]
    manifest: PathBuf,

    #[arg(
        short = 'd',
        long = "dir",
        value_name = "DIRECTORY",
        help = "Directory to write the figures and tables.",
        default_value = "figures"
    )]
    output_dir: PathBuf,

    #[arg(
        short = 't',
        long = "title",
        value_name = "TEXT",
        help = "Chart title.",
        default_value = "Relative Abundance of Top COG Categories"
    )]
    title: String,

    #[arg(
        short = 'p',
        long = "prefix",
        value_name = "NAME",
        help = "Base name of the chart and table files.",
        default_value = "COG_Profile"
    )]
    prefix: String,

    #[arg(
        short = 'n',
        long = "top",
        value_name = "COUNT",
        help = "Number of categories, ranked by total count across samples, to display.",
        default_value_t = 10
    )]
    top_n: usize,

    #[arg(
        long = "category-column",
        value_name = "INDEX",
        help = "Zero-based index of the category column.",
        default_value_t = 6
    )]
    category_column: usize,

    #[arg(
        long = "save-plots",
        value_enum,
        help = "How to save the profile chart.",
        default_value_t = PlotOutput::Static
    )]
    save_plots: PlotOutput,

    #[arg(
        long = "cores",
        value_name = "NUMBER",
        help = "Number of cores used to load annotation tables. Uses all available by default.",
        default_value_t = num_cpus::get()
    )]
    num_cores: usize,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli_args = CliArgs::parse();

    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(cli_args.num_cores)
        .build_global()
    {
        eprintln!("Failed to initialize Rayon global thread pool: {:?}", e);
    }

    let manifest = match read_manifest(&cli_args.manifest) {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("\nError reading manifest '{}':", cli_args.manifest.display());
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("\nTabulating category counts for {} sample(s)", manifest.len());

    let schema = AnnotationSchema {
        category: cli_args.category_column,
        ..AnnotationSchema::default()
    };

    let per_sample: Result<Vec<(String, CategoryCounts)>, (PathBuf, ProfileError)> = manifest
        .par_iter()
        .map(|entry| {
            read_categories(&entry.file, &schema)
                .map(|cells| (entry.sample.clone(), CategoryCounts::tabulate(&cells)))
                .map_err(|e| (entry.file.clone(), e))
        })
        .collect();

    let per_sample = match per_sample {
        Ok(per_sample) => per_sample,
        Err((file, e)) => {
            eprintln!("\nError reading annotation table '{}':", file.display());
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut table = SampleCountTable::new();
    for (sample, counts) in &per_sample {
        table.insert_sample(sample.clone(), counts);
    }

    println!(
        "Writing count and proportion tables to: {}",
        cli_args.output_dir.display()
    );

    if let Err(e) = write_count_table(&table, &cli_args.output_dir, &cli_args.prefix) {
        eprintln!("\nError writing count table: {}", e);
        return ExitCode::FAILURE;
    }
    let proportions = ProportionTable::from_counts(&table);
    if let Err(e) = write_proportion_table(&proportions, &cli_args.output_dir, &cli_args.prefix) {
        eprintln!("\nError writing proportion table: {}", e);
        return ExitCode::FAILURE;
    }

    if table.is_empty() {
        println!("No category annotations found in any sample; skipping the chart\n");
        return ExitCode::SUCCESS;
    }

    if cli_args.save_plots != PlotOutput::None {
        println!("Rendering stacked profile chart");
        let plot_data = prepare_stacked_data(&table, cli_args.top_n);
        if let Err(e) = stacked_profile_plot(
            &plot_data,
            &cli_args.title,
            &cli_args.prefix,
            &cli_args.output_dir,
            cli_args.save_plots,
        ) {
            eprintln!("\nError rendering profile chart: {}", e);
            return ExitCode::FAILURE;
        }
    }

    println!("Finished profile comparison\n");
    ExitCode::SUCCESS
}
